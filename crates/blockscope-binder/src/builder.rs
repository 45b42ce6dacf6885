//! Scope builder pass.
//!
//! Pre-order walk: each node first inherits its parent's scope, then the
//! first matching rule of a priority-ordered classification may override
//! that with a fresh scope and/or register bindings. Hoisting is emergent:
//! the builder always registers a declaration into the *current* scope and
//! leaves the `var`/`fun` climb to `ScopeTree::declare`.

use blockscope_ast::{Node, NodeArena, NodeIndex, NodeKind, node_flags, try_preorder};
use blockscope_common::Position;
use tracing::debug;

use crate::scope::{DeclKind, ScopeKind, ScopeTree};

/// Fatal binder error; no partial scope tree survives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Named function expressions are outside the supported surface.
    NamedFunctionExpression { name: String, position: Position },
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindError::NamedFunctionExpression { name, position } => {
                write!(
                    f,
                    "named function expressions are not supported: `{name}` ({position})"
                )
            }
        }
    }
}

impl std::error::Error for BindError {}

/// Build the scope tree for the program rooted at `root`.
///
/// Every node in the tree is assigned a scope; scope-introducing nodes get
/// a fresh one, all others inherit from their parent. Declarations are
/// registered as they are encountered.
pub fn build_scopes(arena: &NodeArena, root: NodeIndex) -> Result<ScopeTree, BindError> {
    let mut builder = ScopeBuilder {
        arena,
        tree: ScopeTree::new(arena.len()),
    };
    try_preorder(arena, root, &mut |idx, node| builder.visit(idx, node))?;
    debug!(
        scopes = builder.tree.scope_count(),
        bindings = builder.tree.binding_count(),
        "scope build complete"
    );
    Ok(builder.tree)
}

struct ScopeBuilder<'a> {
    arena: &'a NodeArena,
    tree: ScopeTree,
}

impl ScopeBuilder<'_> {
    fn visit(&mut self, idx: NodeIndex, node: &Node) -> Result<(), BindError> {
        // Default assignment: inherit the parent's scope. The match below
        // overrides it for scope-introducing nodes. The walk is pre-order,
        // so the parent's scope is always already computed.
        let inherited = self.tree.scope_of(self.arena.parent_of(idx));
        if let Some(scope) = inherited {
            self.tree.set_node_scope(idx, scope);
        }

        match node.kind {
            NodeKind::Program => {
                let scope = self.tree.alloc_scope(ScopeKind::Hoist, idx, None);
                self.tree.set_node_scope(idx, scope);
            }

            NodeKind::FunctionDeclaration | NodeKind::FunctionExpression => {
                let Some(func) = self.arena.get_function(node) else {
                    return Ok(());
                };
                if func.name.is_some() {
                    if node.kind == NodeKind::FunctionExpression {
                        return Err(BindError::NamedFunctionExpression {
                            name: self
                                .arena
                                .identifier_text(func.name)
                                .unwrap_or_default()
                                .to_string(),
                            position: self.arena.position_of(idx),
                        });
                    }
                    // The function's name lives in the enclosing scope; its
                    // own scope never contains it.
                    if let (Some(scope), Some(atom)) =
                        (inherited, self.arena.identifier_atom(func.name))
                    {
                        self.tree.declare(scope, atom, DeclKind::Fun, idx);
                    }
                }
                let scope = self.tree.alloc_scope(ScopeKind::Hoist, idx, inherited);
                self.tree.set_node_scope(idx, scope);
                for &param in &func.params.nodes {
                    if let Some(atom) = self.arena.identifier_atom(param) {
                        self.tree.declare(scope, atom, DeclKind::Param, param);
                    }
                }
            }

            NodeKind::VariableDeclaration => {
                let Some(decl) = self.arena.get_variable_declaration(node) else {
                    return Ok(());
                };
                let kind = if node.has_flag(node_flags::LET) {
                    DeclKind::Let
                } else if node.has_flag(node_flags::CONST) {
                    DeclKind::Const
                } else {
                    DeclKind::Var
                };
                let Some(scope) = inherited else {
                    return Ok(());
                };
                for &declarator_idx in &decl.declarations.nodes {
                    if let Some(declarator) = self
                        .arena
                        .get(declarator_idx)
                        .and_then(|declarator| self.arena.get_declarator(declarator))
                        && let Some(atom) = self.arena.identifier_atom(declarator.name)
                    {
                        self.tree.declare(scope, atom, kind, declarator_idx);
                    }
                }
            }

            NodeKind::BlockStatement => {
                // A function's body block is covered by the function's own
                // hoist scope; only free-standing blocks open a block scope.
                let parent_kind = self
                    .arena
                    .get(self.arena.parent_of(idx))
                    .map(|parent| parent.kind);
                let is_function_body = matches!(parent_kind, Some(kind) if kind.is_function());
                if !is_function_body {
                    let scope = self.tree.alloc_scope(ScopeKind::Block, idx, inherited);
                    self.tree.set_node_scope(idx, scope);
                }
            }

            NodeKind::ForStatement => {
                // `for (let i = …; …)` binds `i` in a scope covering the
                // whole loop, header included.
                if let Some(data) = self.arena.get_loop(node)
                    && self.is_block_scoped_declaration(data.initializer)
                {
                    let scope = self.tree.alloc_scope(ScopeKind::Block, idx, inherited);
                    self.tree.set_node_scope(idx, scope);
                }
            }

            NodeKind::ForInStatement => {
                if let Some(data) = self.arena.get_for_in(node)
                    && self.is_block_scoped_declaration(data.left)
                {
                    let scope = self.tree.alloc_scope(ScopeKind::Block, idx, inherited);
                    self.tree.set_node_scope(idx, scope);
                }
            }

            NodeKind::CatchClause => {
                // TODO: catch(e) parameters are not scoped yet; the caught
                // name currently resolves like any outer/global reference.
            }

            _ => {}
        }
        Ok(())
    }

    /// Is `idx` a `let`/`const` variable declaration?
    fn is_block_scoped_declaration(&self, idx: NodeIndex) -> bool {
        self.arena
            .get(idx)
            .is_some_and(|node| {
                node.kind == NodeKind::VariableDeclaration && node_flags::is_block_scoped(node.flags)
            })
    }
}
