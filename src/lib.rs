//! srcfacts - source-code metrics from srcML
//!
//! A single-pass, zero-copy XML parser streams a srcML document through a
//! fixed-size window and reports what it sees to a [`ScanHandler`]. The
//! bundled handler, [`Metrics`], counts characters, lines of code and srcML
//! markup (units, classes, functions, declarations, expressions, comments).
//!
//! Layers:
//! - reader: byte sources and the refill buffer
//! - core: scanner, tokenizer and the handler seam
//! - strategy: the streaming driver
//! - stats / report: metric accumulation and rendering

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod reader;
pub mod report;
pub mod stats;
pub mod strategy;

use std::time::Instant;

pub use crate::config::ParserConfig;
pub use crate::core::error::{ParseError, ParseErrorKind};
pub use crate::core::handler::ScanHandler;
pub use crate::core::qname::QName;
pub use crate::error::{Error, Result};
pub use crate::reader::{ByteSource, DecodedInput, SliceSource};
pub use crate::stats::{Metrics, Summary};
pub use crate::strategy::StreamingParser;

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Peak heap usage so far, if the `memory_tracking` feature is enabled
#[cfg(feature = "memory_tracking")]
pub fn peak_allocated() -> Option<usize> {
    Some(tracking::PEAK_ALLOCATED.load(std::sync::atomic::Ordering::SeqCst))
}

/// Peak heap usage so far, if the `memory_tracking` feature is enabled
#[cfg(not(feature = "memory_tracking"))]
pub fn peak_allocated() -> Option<usize> {
    None
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse one srcML document from `source` and collect its metrics
pub fn analyze<S: ByteSource>(source: S, config: ParserConfig) -> Result<Summary> {
    let start = Instant::now();
    let mut parser = StreamingParser::with_config(source, config)?;
    let mut metrics = Metrics::new();
    let total_bytes = parser.parse(&mut metrics)?;
    Ok(metrics.summarize(total_bytes, start.elapsed()))
}
