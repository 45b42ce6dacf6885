//! Driver: file → ESTree JSON → arena → scope build → resolution.

use anyhow::{Context, Result};
use std::path::Path;

use blockscope_ast::{NodeArena, NodeIndex, lower_program};
use blockscope_binder::{Resolutions, ScopeTree, build_scopes, resolve_references};

use crate::args::{CliArgs, OutputFormat};
use crate::report;

/// Everything the two passes produced for one input file.
#[derive(Debug)]
pub struct Analysis {
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub scopes: ScopeTree,
    pub resolutions: Resolutions,
}

/// Analyze an ESTree JSON document.
pub fn analyze_value(value: &serde_json::Value) -> Result<Analysis> {
    let mut arena = NodeArena::new();
    let root = lower_program(value, &mut arena).context("failed to lower ESTree document")?;
    let scopes = build_scopes(&arena, root).context("failed to build scopes")?;
    let resolutions = resolve_references(&arena, root, &scopes);
    Ok(Analysis {
        arena,
        root,
        scopes,
        resolutions,
    })
}

/// Analyze an ESTree JSON file on disk.
pub fn analyze_file(path: &Path) -> Result<Analysis> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    analyze_value(&value)
}

/// Run the analyzer per CLI arguments and render the report.
pub fn run(args: &CliArgs) -> Result<String> {
    let analysis = analyze_file(&args.file)?;
    match args.format {
        OutputFormat::Tree => Ok(report::render_tree(&analysis, !args.no_references)),
        OutputFormat::Json => report::render_json(&analysis),
    }
}
