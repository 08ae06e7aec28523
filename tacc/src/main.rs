mod cli;
mod report;
mod util;

use anyhow::{bail, Context, Result};
use clap::Parser;

use std::io::Write;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let source = cli::open_input_source(&args)?;

    let opts = cli::extract_compile_opts(&args);
    match tacc_lib::compile::compile(source.source(), &opts) {
        Ok(output) => {
            cli::open_output(&args)?
                .write_all(&output)
                .with_context(|| "Failed to write to output".to_string())?;
            Ok(())
        }
        Err(diagnostic) => {
            report::eprint_diagnostic(&diagnostic, &source);
            bail!("couldn't compile due to the previous error");
        }
    }
}
