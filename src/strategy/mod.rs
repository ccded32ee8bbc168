//! Parsing strategies
//!
//! - StreamingParser: single pass over a byte source with a bounded window

pub mod streaming;

pub use streaming::StreamingParser;
