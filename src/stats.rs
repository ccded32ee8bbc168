//! Source metrics collected from srcML markup
//!
//! [`Metrics`] is a [`ScanHandler`]: it classifies start tags by local name
//! and measures character data, never looking at the document structure.

use std::time::Duration;

use memchr::memchr_iter;

use crate::core::handler::ScanHandler;
use crate::core::qname::QName;

/// Running counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Bytes of character data, CDATA and entity references (one per reference)
    pub text_size: u64,
    /// Newlines in character data
    pub loc: u64,
    pub expressions: u64,
    pub declarations: u64,
    pub comments: u64,
    pub functions: u64,
    pub classes: u64,
    /// srcML `unit` elements, the archive root included
    pub units: u64,
    /// Value of the last `url` attribute seen
    pub url: String,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze the counters together with the run's totals
    pub fn summarize(self, total_bytes: u64, elapsed: Duration) -> Summary {
        let secs = elapsed.as_secs_f64();
        let mloc_per_sec = if secs > 0.0 {
            self.loc as f64 / secs / 1_000_000.0
        } else {
            0.0
        };
        Summary {
            files: file_count(self.units),
            metrics: self,
            total_bytes,
            elapsed,
            mloc_per_sec,
            peak_memory: crate::peak_allocated(),
        }
    }
}

impl ScanHandler for Metrics {
    fn start_element(&mut self, name: &QName<'_>) {
        match name.local {
            b"expr" => self.expressions += 1,
            b"decl" => self.declarations += 1,
            b"comment" => self.comments += 1,
            b"function" => self.functions += 1,
            b"unit" => self.units += 1,
            b"class" => self.classes += 1,
            _ => {}
        }
    }

    fn characters(&mut self, text: &[u8]) {
        self.text_size += text.len() as u64;
        self.loc += memchr_iter(b'\n', text).count() as u64;
    }

    fn entity(&mut self, _reference: &[u8], _unescaped: u8) {
        self.text_size += 1;
    }

    fn attribute(&mut self, name: &QName<'_>, value: &[u8]) {
        if name.local == b"url" {
            self.url = String::from_utf8_lossy(value).into_owned();
        }
    }
}

/// Number of source files in an archive with `units` unit elements
///
/// An archive wraps its files in one outer unit; a lone unit is one file.
pub fn file_count(units: u64) -> u64 {
    units.saturating_sub(1).max(1)
}

/// Final figures of one run
#[derive(Debug, Clone)]
pub struct Summary {
    pub metrics: Metrics,
    pub files: u64,
    /// Bytes read from the decoded input
    pub total_bytes: u64,
    pub elapsed: Duration,
    pub mloc_per_sec: f64,
    /// Peak heap usage, when the allocator tracks it
    pub peak_memory: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_count() {
        assert_eq!(file_count(0), 1);
        assert_eq!(file_count(1), 1);
        assert_eq!(file_count(5), 4);
    }

    #[test]
    fn test_dispatch_on_local_name() {
        let mut metrics = Metrics::new();
        let names: [(&[u8], Option<usize>); 8] = [
            (b"expr", None),
            (b"decl", None),
            (b"cpp:decl", Some(3)),
            (b"comment", None),
            (b"function", None),
            (b"unit", None),
            (b"class", None),
            (b"name", None),
        ];
        for (qualified, colon) in names {
            metrics.start_element(&QName::new(qualified, colon));
        }
        assert_eq!(metrics.expressions, 1);
        assert_eq!(metrics.declarations, 2);
        assert_eq!(metrics.comments, 1);
        assert_eq!(metrics.functions, 1);
        assert_eq!(metrics.units, 1);
        assert_eq!(metrics.classes, 1);
    }

    #[test]
    fn test_characters_and_entities() {
        let mut metrics = Metrics::new();
        metrics.characters(b"a\nb\nc");
        metrics.entity(b"&lt;", b'<');
        metrics.cdata(b"x\n");
        assert_eq!(metrics.text_size, 8);
        assert_eq!(metrics.loc, 3);
    }

    #[test]
    fn test_last_url_wins() {
        let mut metrics = Metrics::new();
        metrics.attribute(&QName::new(b"url", None), b"first");
        metrics.attribute(&QName::new(b"filename", None), b"other");
        metrics.attribute(&QName::new(b"url", None), b"second");
        assert_eq!(metrics.url, "second");
    }

    #[test]
    fn test_summarize() {
        let mut metrics = Metrics::new();
        metrics.loc = 2_000_000;
        metrics.units = 3;
        let summary = metrics.summarize(100, Duration::from_secs(2));
        assert_eq!(summary.files, 2);
        assert!((summary.mloc_per_sec - 1.0).abs() < 1e-9);

        let summary = Metrics::new().summarize(0, Duration::ZERO);
        assert_eq!(summary.mloc_per_sec, 0.0);
    }
}
