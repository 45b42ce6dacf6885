use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the blockscope binary.
#[derive(Parser, Debug)]
#[command(
    name = "blockscope",
    version,
    about = "Lexical scope analyzer for JavaScript ASTs (esprima/acorn JSON)"
)]
pub struct CliArgs {
    /// Path to an ESTree-format AST file (JSON, as produced by esprima
    /// or acorn with ranges and locations enabled).
    pub file: PathBuf,

    /// Output format for the scope report.
    #[arg(short = 'f', long, value_enum, default_value = "tree")]
    pub format: OutputFormat,

    /// Suppress the per-reference resolution listing (tree format only).
    #[arg(long = "no-references")]
    pub no_references: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented, human-readable scope tree.
    Tree,
    /// Machine-readable JSON report.
    Json,
}
