//! Input layer
//!
//! - ByteSource: where bytes come from (stdin, files, gzip, memory)
//! - RefillBuffer: the fixed-capacity window the parser slices

pub mod buffered;
pub mod source;

pub use buffered::RefillBuffer;
pub use source::{ByteSource, DecodedInput, SliceSource};
