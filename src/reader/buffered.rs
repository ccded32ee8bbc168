//! Fixed-capacity refill buffer
//!
//! Holds the window the parser works on. A refill moves the unconsumed bytes
//! to the front and appends fresh input behind them, so the parser can keep
//! slicing one contiguous region.

use log::debug;

use super::source::ByteSource;
use crate::config::ParserConfig;
use crate::error::Result;

/// Input window of fixed capacity over a [`ByteSource`]
pub struct RefillBuffer {
    buffer: Vec<u8>,
    block_size: usize,
    /// First unconsumed byte
    pos: usize,
    /// End of valid data
    end: usize,
    /// Stream offset of `buffer[0]`
    base: u64,
    eof: bool,
}

impl RefillBuffer {
    pub fn new(config: &ParserConfig) -> Self {
        RefillBuffer {
            buffer: vec![0u8; config.buffer_size],
            block_size: config.block_size,
            pos: 0,
            end: 0,
            base: 0,
            eof: false,
        }
    }

    /// Compact and append input until a block is buffered, the window is
    /// full, or the source runs dry
    ///
    /// At least one read is attempted whenever there is room. Returns the
    /// number of bytes appended; the source is closed once it reports end of
    /// stream, after which refills return `Ok(0)` without reading.
    pub fn refill<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        self.read_until(source, self.block_size)
    }

    /// Compact and append input until the window is full or the source runs dry
    ///
    /// Used when a construct's terminator was not found in the window.
    pub fn refill_all<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        self.read_until(source, self.buffer.len())
    }

    fn read_until<S: ByteSource + ?Sized>(&mut self, source: &mut S, target: usize) -> Result<usize> {
        if self.eof {
            return Ok(0);
        }
        self.compact();

        let capacity = self.buffer.len();
        let max_read = capacity - self.block_size;
        let mut appended = 0;
        while self.end < capacity {
            let want = (capacity - self.end).min(max_read);
            let n = source.read(&mut self.buffer[self.end..self.end + want])?;
            if n == 0 {
                self.eof = true;
                source.close();
                break;
            }
            self.end += n;
            appended += n;
            if self.len() >= target {
                break;
            }
        }

        debug!(
            "refill: appended {} bytes, {} buffered, eof={}",
            appended,
            self.len(),
            self.eof
        );
        Ok(appended)
    }

    /// Move the unconsumed bytes to the start of the buffer
    fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }
        self.buffer.copy_within(self.pos..self.end, 0);
        self.base += self.pos as u64;
        self.end -= self.pos;
        self.pos = 0;
    }

    /// Unconsumed bytes
    #[inline]
    pub fn window(&self) -> &[u8] {
        &self.buffer[self.pos..self.end]
    }

    /// Mark `n` bytes of the window as parsed
    #[inline]
    pub fn consume(&mut self, n: usize) {
        self.pos += n.min(self.end - self.pos);
    }

    /// Number of unconsumed bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// The source has reported end of stream
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Fewer than a block of bytes remain and more input may follow
    #[inline]
    pub fn needs_refill(&self) -> bool {
        !self.eof && self.len() < self.block_size
    }

    /// Stream offset of the first unconsumed byte
    #[inline]
    pub fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::source::SliceSource;

    fn small() -> ParserConfig {
        ParserConfig::new(4, 16)
    }

    #[test]
    fn test_refill_preserves_unconsumed_prefix() {
        let data: Vec<u8> = (b'a'..=b'z').collect();
        let mut source = SliceSource::new(&data);
        let mut buffer = RefillBuffer::new(&small());

        // Reads are capped at capacity - block
        assert_eq!(buffer.refill(&mut source).unwrap(), 12);
        assert_eq!(buffer.window(), b"abcdefghijkl");

        buffer.consume(10);
        assert!(buffer.needs_refill());
        assert_eq!(buffer.refill(&mut source).unwrap(), 12);
        assert_eq!(buffer.window(), b"klmnopqrstuvwx");
        assert_eq!(buffer.offset(), 10);
    }

    #[test]
    fn test_refill_reads_until_block_available() {
        let mut source = SliceSource::with_chunk_size(b"0123456789", 1);
        let mut buffer = RefillBuffer::new(&small());
        assert_eq!(buffer.refill(&mut source).unwrap(), 4);
        assert_eq!(buffer.window(), b"0123");
    }

    #[test]
    fn test_refill_all_fills_window() {
        let data = [b'x'; 64];
        let mut source = SliceSource::with_chunk_size(&data, 3);
        let mut buffer = RefillBuffer::new(&small());
        assert_eq!(buffer.refill(&mut source).unwrap(), 6);
        assert_eq!(buffer.refill_all(&mut source).unwrap(), 10);
        assert_eq!(buffer.len(), 16);
    }

    #[test]
    fn test_eof_closes_source() {
        let mut source = SliceSource::new(b"<a/>");
        let mut buffer = RefillBuffer::new(&small());
        assert_eq!(buffer.refill(&mut source).unwrap(), 4);
        assert!(!buffer.is_eof());
        buffer.consume(4);
        assert_eq!(buffer.refill(&mut source).unwrap(), 0);
        assert!(buffer.is_eof());
        assert!(source.is_closed());
        assert!(!buffer.needs_refill());
        assert_eq!(buffer.refill(&mut source).unwrap(), 0);
    }

    #[test]
    fn test_full_window_appends_nothing() {
        let data = [b'x'; 64];
        let mut source = SliceSource::new(&data);
        let mut buffer = RefillBuffer::new(&small());
        buffer.refill(&mut source).unwrap();
        buffer.refill(&mut source).unwrap();
        assert_eq!(buffer.len(), 16);
        assert_eq!(buffer.refill(&mut source).unwrap(), 0);
        assert!(!buffer.is_eof());
    }

    #[test]
    fn test_empty_source() {
        let mut source = SliceSource::new(b"");
        let mut buffer = RefillBuffer::new(&small());
        assert_eq!(buffer.refill(&mut source).unwrap(), 0);
        assert!(buffer.is_eof());
        assert!(buffer.is_empty());
    }
}
