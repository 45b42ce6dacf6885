//! Command-line driver for the blockscope analyzer.
//!
//! - `args` - clap argument definitions
//! - `driver` - file ingestion and the two analysis passes
//! - `report` - tree and JSON rendering of the scope structure

pub mod args;
pub mod driver;
pub mod report;
