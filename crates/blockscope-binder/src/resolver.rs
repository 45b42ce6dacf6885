//! Reference resolver pass.
//!
//! Runs only after the scope tree is fully built: references may point at
//! declarations that appear later in source order, so no lookup can happen
//! during the builder pass.

use blockscope_ast::{NodeArena, NodeIndex, NodeKind, preorder};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::scope::{BindingId, ScopeTree};

/// Outcome of resolving one reference-position identifier.
///
/// `Unresolved` is information, not an error: the name may be a global, a
/// built-in, or genuinely undefined; the resolver does not distinguish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Binding(BindingId),
    Unresolved,
}

/// Side table mapping reference nodes to their resolution outcome.
#[derive(Debug, Default)]
pub struct Resolutions {
    map: FxHashMap<u32, Resolution>,
}

impl Resolutions {
    #[inline]
    pub fn get(&self, node: NodeIndex) -> Option<Resolution> {
        self.map.get(&node.0).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, Resolution)> + '_ {
        self.map
            .iter()
            .map(|(&node, &resolution)| (NodeIndex(node), resolution))
    }
}

/// Is this identifier in reference position?
///
/// True iff the node is an identifier and is not: a declarator's bound
/// name, the property side of a member access, an object-literal key, a
/// statement label, a catch-clause parameter, a function's own name, or
/// one of a function's parameters.
pub fn is_reference(arena: &NodeArena, idx: NodeIndex) -> bool {
    let Some(node) = arena.get(idx) else {
        return false;
    };
    if node.kind != NodeKind::Identifier {
        return false;
    }
    let parent_idx = arena.parent_of(idx);
    let Some(parent) = arena.get(parent_idx) else {
        return true;
    };
    match parent.kind {
        NodeKind::VariableDeclarator => arena
            .get_declarator(parent)
            .is_none_or(|declarator| declarator.name != idx),
        NodeKind::MemberExpression => arena
            .get_access_expr(parent)
            .is_none_or(|access| access.property != idx),
        NodeKind::Property => arena
            .get_property(parent)
            .is_none_or(|property| property.key != idx),
        NodeKind::LabeledStatement => arena
            .get_labeled(parent)
            .is_none_or(|labeled| labeled.label != idx),
        NodeKind::CatchClause => arena
            .get_catch(parent)
            .is_none_or(|catch| catch.param != idx),
        NodeKind::FunctionDeclaration | NodeKind::FunctionExpression => arena
            .get_function(parent)
            .is_none_or(|func| func.name != idx && !func.params.contains(idx)),
        _ => true,
    }
}

/// Resolve every reference in the program rooted at `root` against the
/// frozen scope tree. Read-only over both inputs; running it twice yields
/// identical results.
pub fn resolve_references(
    arena: &NodeArena,
    root: NodeIndex,
    scopes: &ScopeTree,
) -> Resolutions {
    let mut resolutions = Resolutions::default();
    preorder(arena, root, &mut |idx, _node| {
        if !is_reference(arena, idx) {
            return;
        }
        let Some(atom) = arena.identifier_atom(idx) else {
            return;
        };
        let outcome = scopes
            .scope_of(idx)
            .and_then(|scope| scopes.lookup(scope, atom))
            .map(Resolution::Binding)
            .unwrap_or(Resolution::Unresolved);
        debug!(
            node = idx.0,
            name = arena.interner().resolve(atom),
            resolved = matches!(outcome, Resolution::Binding(_)),
            "resolved reference"
        );
        resolutions.map.insert(idx.0, outcome);
    });
    resolutions
}
