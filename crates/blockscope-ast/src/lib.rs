//! Arena-based ESTree AST for the blockscope analyzer.
//!
//! This crate is organized into:
//! - `node` - Thin `Node` headers, `NodeKind`, typed data pools, `NodeArena`
//! - `arena` - Node creation (`add_*`) and access (`get_*`) methods
//! - `walk` - Pre-order traversal utilities over parent-linked trees
//! - `estree` - Lowering of esprima/acorn ESTree JSON into the arena
//!
//! Nodes are 16-byte headers stored contiguously; category-specific payloads
//! live in typed pools addressed by `data_index`. Parent back-references are
//! kept in a parallel `extended_info` pool and installed at creation time,
//! since lowering is bottom-up (children always exist before their parent).

pub mod arena;
pub mod estree;
pub mod node;
pub mod walk;

pub use estree::{LowerError, lower_program};
pub use node::{
    ExtendedNodeInfo, Node, NodeArena, NodeIndex, NodeKind, NodeList, node_flags,
};
pub use walk::{for_each_child, preorder, try_preorder};
