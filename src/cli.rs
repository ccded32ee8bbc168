//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ParserConfig, BLOCK_SIZE, BUFFER_SIZE};

/// CLI arguments for srcfacts
#[derive(Parser, Debug, Clone)]
#[command(name = "srcfacts")]
#[command(version)]
#[command(about = "Source-code metrics from srcML, read from a file or standard input", long_about = None)]
pub struct CliArgs {
    /// srcML document, optionally gzip compressed; `-` or absent reads standard input
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Bytes kept available ahead of the parser, at least 16
    #[arg(long, value_name = "BYTES", default_value_t = BLOCK_SIZE)]
    pub block_size: usize,

    /// Capacity of the input window, at least twice the block size
    #[arg(long, value_name = "BYTES", default_value_t = BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Do not print throughput diagnostics
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Input file, or `None` for standard input
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }

    pub fn config(&self) -> ParserConfig {
        ParserConfig::new(self.block_size, self.buffer_size)
    }
}
