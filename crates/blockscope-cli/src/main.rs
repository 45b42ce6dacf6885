use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blockscope_cli::args::CliArgs;
use blockscope_cli::driver;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = CliArgs::parse();
    let output = driver::run(&args)?;
    println!("{output}");
    Ok(())
}
