//! Crate-level error type
//!
//! I/O failures and grammar errors are kept apart so the message tells the
//! user which side went wrong.

use std::io;

use thiserror::Error;

use crate::core::error::ParseError;

#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be opened, or its format not determined
    #[error("input error: {0}")]
    Open(#[source] io::Error),

    /// A read failed after the input was opened
    #[error("file input error: {0}")]
    Read(#[source] io::Error),

    #[error("parser error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing the report failed
    #[error("output error: {0}")]
    Output(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
