//! Scope report rendering (tree and JSON).

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use blockscope_binder::{DeclKind, Resolution, ScopeId, ScopeKind};

use crate::driver::Analysis;

#[derive(Serialize)]
struct ScopeReport {
    kind: ScopeKind,
    node: String,
    line: u32,
    bindings: Vec<BindingReport>,
    children: Vec<ScopeReport>,
}

#[derive(Serialize)]
struct BindingReport {
    name: String,
    kind: DeclKind,
    line: u32,
}

#[derive(Serialize)]
struct ReferenceReport {
    name: String,
    line: u32,
    column: u32,
    /// None means the reference is unresolved (global or undefined).
    binding: Option<BindingReport>,
}

#[derive(Serialize)]
struct FullReport {
    scopes: ScopeReport,
    references: Vec<ReferenceReport>,
}

fn scope_report(analysis: &Analysis, id: ScopeId) -> Option<ScopeReport> {
    let scope = analysis.scopes.get_scope(id)?;
    let node_kind = analysis
        .arena
        .get(scope.node)
        .map(|node| format!("{:?}", node.kind))
        .unwrap_or_default();
    let mut bindings: Vec<BindingReport> = scope
        .bindings()
        .filter_map(|(name, binding_id)| {
            let binding = analysis.scopes.get_binding(binding_id)?;
            Some(BindingReport {
                name: analysis.arena.interner().resolve(name).to_string(),
                kind: binding.kind,
                line: analysis.arena.position_of(binding.declaration).line,
            })
        })
        .collect();
    bindings.sort_by(|a, b| a.name.cmp(&b.name));
    let children = analysis
        .scopes
        .children_of(id)
        .into_iter()
        .filter_map(|child| scope_report(analysis, child))
        .collect();
    Some(ScopeReport {
        kind: scope.kind,
        node: node_kind,
        line: analysis.arena.position_of(scope.node).line,
        bindings,
        children,
    })
}

fn reference_reports(analysis: &Analysis) -> Vec<ReferenceReport> {
    let mut references: Vec<ReferenceReport> = analysis
        .resolutions
        .iter()
        .filter_map(|(node, resolution)| {
            let name = analysis.arena.identifier_text(node)?.to_string();
            let position = analysis.arena.position_of(node);
            let binding = match resolution {
                Resolution::Binding(id) => {
                    let binding = analysis.scopes.get_binding(id)?;
                    Some(BindingReport {
                        name: analysis
                            .arena
                            .interner()
                            .resolve(binding.name)
                            .to_string(),
                        kind: binding.kind,
                        line: analysis.arena.position_of(binding.declaration).line,
                    })
                }
                Resolution::Unresolved => None,
            };
            Some(ReferenceReport {
                name,
                line: position.line,
                column: position.column,
                binding,
            })
        })
        .collect();
    references.sort_by(|a, b| {
        (a.line, a.column, a.name.as_str()).cmp(&(b.line, b.column, b.name.as_str()))
    });
    references
}

/// Human-readable indented scope tree, with an optional per-reference
/// resolution listing.
pub fn render_tree(analysis: &Analysis, include_references: bool) -> String {
    let mut out = String::new();
    if let Some(root) = scope_report(analysis, analysis.scopes.root()) {
        render_scope(&root, 0, &mut out);
    }
    if include_references {
        let references = reference_reports(analysis);
        if !references.is_empty() {
            out.push_str("\nreferences:\n");
            for reference in references {
                match reference.binding {
                    Some(binding) => out.push_str(&format!(
                        "  line {}, col {}: {} -> {} (line {})\n",
                        reference.line,
                        reference.column,
                        reference.name,
                        binding.kind.as_str().green(),
                        binding.line
                    )),
                    None => out.push_str(&format!(
                        "  line {}, col {}: {} -> {}\n",
                        reference.line,
                        reference.column,
                        reference.name,
                        "unresolved".red()
                    )),
                }
            }
        }
    }
    out
}

fn render_scope(report: &ScopeReport, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let kind = match report.kind {
        ScopeKind::Hoist => "hoist".cyan().bold(),
        ScopeKind::Block => "block".yellow().bold(),
    };
    out.push_str(&format!(
        "{indent}{kind} {} (line {})\n",
        report.node, report.line
    ));
    for binding in &report.bindings {
        out.push_str(&format!(
            "{indent}  {}: {} (line {})\n",
            binding.name,
            binding.kind.as_str(),
            binding.line
        ));
    }
    for child in &report.children {
        render_scope(child, depth + 1, out);
    }
}

/// Machine-readable JSON report.
pub fn render_json(analysis: &Analysis) -> Result<String> {
    let report = FullReport {
        scopes: scope_report(analysis, analysis.scopes.root()).ok_or_else(|| {
            anyhow::anyhow!("scope tree has no root; was the build pass run?")
        })?,
        references: reference_reports(analysis),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
