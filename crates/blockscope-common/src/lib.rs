//! Common types and utilities for the blockscope analyzer.
//!
//! This crate provides foundational types used across all blockscope crates:
//! - String interning (`Atom`, `Interner`)
//! - Line/column source positions (`Position`)

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Line/column positions for report output
pub mod position;
pub use position::Position;
