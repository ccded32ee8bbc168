//! Core XML parsing primitives
//!
//! This module contains the fundamental building blocks for XML parsing:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: one XML construct at a time over the current window
//! - Entities: the predefined references srcML emits, and `strtol` decoding
//! - Attributes: attribute and namespace scanning
//! - Unicode: name character classification tables
//! - DTD: DOCTYPE extent scanning
//! - Handler: the ScanHandler event seam

pub mod attributes;
pub mod dtd;
pub mod entities;
pub mod error;
pub mod handler;
pub mod qname;
pub mod scanner;
pub mod tokenizer;
pub mod unicode;
