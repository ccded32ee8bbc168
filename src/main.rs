//! srcfacts
//!
//! Reads a srcML document from a file or standard input and prints a markdown
//! table of source metrics.

use std::fs::File;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use srcfacts::cli::CliArgs;
use srcfacts::report::{write_diagnostics, write_report};
use srcfacts::{analyze, DecodedInput, Error, Result};

fn main() -> ExitCode {
    // Quiet by default; RUST_LOG=debug shows refills, RUST_LOG=trace every construct
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("failed: {:?}", e);
            eprintln!("srcfacts: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let input: Box<dyn Read> = match args.input_path() {
        Some(path) => {
            log::debug!("reading {}", path.display());
            Box::new(File::open(path).map_err(Error::Open)?)
        }
        None => {
            log::debug!("reading standard input");
            Box::new(io::stdin().lock())
        }
    };

    let summary = analyze(DecodedInput::new(input), args.config())?;

    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, &summary).map_err(Error::Output)?;
    if !args.quiet {
        write_diagnostics(&mut io::stderr().lock(), &summary).map_err(Error::Output)?;
    }
    stdout.flush().map_err(Error::Output)
}
