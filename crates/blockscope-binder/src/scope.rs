//! Scope and binding arenas.
//!
//! Scopes and bindings are owned by a `ScopeTree` and addressed by integer
//! ids; parent links and the node→scope table are plain indices, so the
//! structure is an acyclic tree by construction. Scope/binding data is
//! attached to nodes through side tables rather than the nodes themselves.

use blockscope_ast::NodeIndex;
use blockscope_common::Atom;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

/// Index of a scope in the `ScopeTree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

/// Index of a binding in the `ScopeTree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BindingId(pub u32);

/// Hoist scopes belong to functions and the program root and receive
/// `var`/function declarations from any nesting depth within them; block
/// scopes receive only `let`/`const` bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Hoist,
    Block,
}

/// The declaration form that introduced a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Var,
    Let,
    Const,
    Param,
    Fun,
}

impl DeclKind {
    /// `var` and function declarations climb to the nearest hoist scope;
    /// everything else binds where it is declared.
    #[inline]
    pub fn hoists(self) -> bool {
        matches!(self, DeclKind::Var | DeclKind::Fun)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
            DeclKind::Param => "param",
            DeclKind::Fun => "fun",
        }
    }
}

/// A declared name's provenance. Immutable once created.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Binding {
    pub name: Atom,
    pub kind: DeclKind,
    /// The scope this binding actually landed in (after any hoist climb).
    pub scope: ScopeId,
    /// The declaration site (declarator, parameter identifier, or
    /// function node).
    pub declaration: NodeIndex,
}

/// One lexical scope.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    /// The node that introduced this scope.
    pub node: NodeIndex,
    /// Immediately enclosing scope; None only for the program root.
    pub parent: Option<ScopeId>,
    bindings: FxHashMap<Atom, BindingId>,
}

impl Scope {
    /// Binding declared directly in this scope, if any.
    #[inline]
    pub fn get(&self, name: Atom) -> Option<BindingId> {
        self.bindings.get(&name).copied()
    }

    #[inline]
    pub fn has(&self, name: Atom) -> bool {
        self.bindings.contains_key(&name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (Atom, BindingId)> + '_ {
        self.bindings.iter().map(|(&name, &id)| (name, id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The fully built scope structure: all scopes and bindings plus the
/// node→scope side table. Frozen after the builder pass; the resolver
/// only reads it.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    bindings: Vec<Binding>,
    /// Scope of every node, indexed by `NodeIndex`. Populated for each
    /// node during the builder's pre-order walk.
    node_scopes: Vec<ScopeId>,
    root: ScopeId,
}

impl ScopeTree {
    pub(crate) fn new(node_count: usize) -> ScopeTree {
        ScopeTree {
            scopes: Vec::new(),
            bindings: Vec::new(),
            node_scopes: vec![ScopeId::NONE; node_count],
            root: ScopeId::NONE,
        }
    }

    /// The program scope: unique ancestor of every other scope.
    #[inline]
    pub fn root(&self) -> ScopeId {
        self.root
    }

    #[inline]
    pub fn get_scope(&self, id: ScopeId) -> Option<&Scope> {
        if id.is_none() {
            None
        } else {
            self.scopes.get(id.0 as usize)
        }
    }

    #[inline]
    pub fn get_binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.0 as usize)
    }

    /// The scope a node belongs to (its own scope for scope-introducing
    /// nodes, the inherited one otherwise).
    #[inline]
    pub fn scope_of(&self, node: NodeIndex) -> Option<ScopeId> {
        let id = *self.node_scopes.get(node.0 as usize)?;
        if id.is_none() { None } else { Some(id) }
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Iterate all scopes in creation (pre-order) order.
    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, scope)| (ScopeId(i as u32), scope))
    }

    /// Direct child scopes of `id`, in creation order.
    pub fn children_of(&self, id: ScopeId) -> Vec<ScopeId> {
        self.scopes()
            .filter(|(_, scope)| scope.parent == Some(id))
            .map(|(child_id, _)| child_id)
            .collect()
    }

    /// Nearest enclosing hoist scope, including `from` itself. The root
    /// scope is a hoist scope, so the climb always terminates.
    pub fn closest_hoist_scope(&self, from: ScopeId) -> ScopeId {
        let mut current = from;
        while let Some(scope) = self.get_scope(current) {
            if scope.kind == ScopeKind::Hoist {
                return current;
            }
            match scope.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Innermost-wins chained lookup from `from` outward.
    pub fn lookup(&self, from: ScopeId, name: Atom) -> Option<BindingId> {
        let mut current = from;
        while let Some(scope) = self.get_scope(current) {
            if let Some(binding) = scope.get(name) {
                return Some(binding);
            }
            current = scope.parent?;
        }
        None
    }

    pub(crate) fn alloc_scope(
        &mut self,
        kind: ScopeKind,
        node: NodeIndex,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            node,
            parent,
            bindings: FxHashMap::default(),
        });
        if parent.is_none() && self.root.is_none() {
            self.root = id;
        }
        debug!(scope = id.0, ?kind, node = node.0, "created scope");
        id
    }

    pub(crate) fn set_node_scope(&mut self, node: NodeIndex, scope: ScopeId) {
        if let Some(slot) = self.node_scopes.get_mut(node.0 as usize) {
            *slot = scope;
        }
    }

    /// Register a declared name. `var` and `fun` declarations are routed
    /// to the nearest enclosing hoist scope; a block scope never holds
    /// them. A re-declaration of the same name in the same scope
    /// overwrites the scope's entry (newest binding wins).
    pub(crate) fn declare(
        &mut self,
        scope: ScopeId,
        name: Atom,
        kind: DeclKind,
        declaration: NodeIndex,
    ) -> BindingId {
        let target = if kind.hoists() {
            self.closest_hoist_scope(scope)
        } else {
            scope
        };
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding {
            name,
            kind,
            scope: target,
            declaration,
        });
        if let Some(entry) = self.scopes.get_mut(target.0 as usize) {
            entry.bindings.insert(name, id);
        }
        debug!(
            binding = id.0,
            scope = target.0,
            kind = kind.as_str(),
            "declared name"
        );
        id
    }
}
