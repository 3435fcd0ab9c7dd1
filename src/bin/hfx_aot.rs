use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use hyperfixi_aot::cli::{CliArgs, run};

fn main() -> Result<()> {
    // No-op unless HFX_LOG or RUST_LOG is set.
    hyperfixi_aot::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let output = run(&args)?;

    match &args.out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write output: {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(output.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}
