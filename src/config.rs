//! Parser configuration

use log::debug;

use crate::error::{Error, Result};

/// Bytes that must stay available ahead of the parser between refills
pub const BLOCK_SIZE: usize = 4096;

/// Capacity of the input window
pub const BUFFER_SIZE: usize = 16 * 16 * BLOCK_SIZE;

/// Smallest block that still holds every fixed-width lookahead
/// (`<!DOCTYPE` plus a whitespace byte, `<![CDATA[`, `&amp;`, `xmlns:`)
pub const MIN_BLOCK_SIZE: usize = 16;

/// Window geometry for [`StreamingParser`](crate::strategy::StreamingParser)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Lookahead guaranteed before each construct (outside end of stream)
    pub block_size: usize,
    /// Total window capacity
    pub buffer_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            block_size: BLOCK_SIZE,
            buffer_size: BUFFER_SIZE,
        }
    }
}

impl ParserConfig {
    pub fn new(block_size: usize, buffer_size: usize) -> Self {
        ParserConfig {
            block_size,
            buffer_size,
        }
    }

    /// Check that a refill can always restore a full block
    pub fn validate(&self) -> Result<()> {
        if self.block_size < MIN_BLOCK_SIZE {
            return Err(Error::Config(format!(
                "block size {} is below the minimum of {MIN_BLOCK_SIZE}",
                self.block_size
            )));
        }
        if self.buffer_size < 2 * self.block_size {
            return Err(Error::Config(format!(
                "buffer size {} must be at least twice the block size {}",
                self.buffer_size, self.block_size
            )));
        }
        debug!(
            "parser config: block_size={} buffer_size={}",
            self.block_size, self.buffer_size
        );
        Ok(())
    }
}
