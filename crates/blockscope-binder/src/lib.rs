//! Scope builder and reference resolver for JavaScript ASTs.
//!
//! Two passes over a parent-linked tree, run strictly in order:
//!
//! 1. [`build_scopes`] visits every node in pre-order; scope-introducing
//!    nodes (program root, functions, non-function-body blocks, and
//!    `let`/`const`-headed loop headers) get a new scope chained to the
//!    enclosing one, and declarations register their names.
//! 2. [`resolve_references`] visits every node in pre-order; each
//!    reference-position identifier is looked up through the scope chain
//!    and the outcome (binding or unresolved) is recorded.
//!
//! The two-pass split is load-bearing: a reference may resolve to a
//! declaration that appears later in source order (`var`/function
//! hoisting), so the full scope tree must exist before any lookup runs.

pub mod builder;
pub mod resolver;
pub mod scope;

pub use builder::{BindError, build_scopes};
pub use resolver::{Resolution, Resolutions, is_reference, resolve_references};
pub use scope::{Binding, BindingId, DeclKind, Scope, ScopeId, ScopeKind, ScopeTree};
