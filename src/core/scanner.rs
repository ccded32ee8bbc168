//! SIMD-accelerated cursor over the input window using memchr
//!
//! Uses memchr crate for fast byte searching with SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)
//!
//! Every lookahead is bounds checked: near the end of the window a lookup
//! answers `None`/`false` instead of reading past the data.

use memchr::{memchr, memchr2, memmem};

use super::qname::QName;
use super::unicode::{is_name_end, is_whitespace};

/// Borrowed view over the current window
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given window
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.input.len());
        self.pos = pos;
    }

    /// Check if we've reached the end of the window
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Get a slice from start to end positions
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && is_whitespace(self.input[self.pos]) {
            self.pos += 1;
        }
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.remaining().starts_with(needle)
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.remaining()).map(|i| self.pos + i)
    }

    /// Find next '<' or '&' (text content boundaries)
    #[inline]
    pub fn find_text_boundary(&self) -> Option<usize> {
        memchr2(b'<', b'&', self.remaining()).map(|i| self.pos + i)
    }

    /// Find a multi-byte terminator such as `-->`
    #[inline]
    pub fn find_subsequence(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(self.remaining(), needle).map(|i| self.pos + i)
    }

    /// Find the first name delimiter at or after `from`
    #[inline]
    pub fn find_name_end(&self, from: usize) -> Option<usize> {
        self.input
            .get(from..)?
            .iter()
            .position(|&b| is_name_end(b))
            .map(|i| from + i)
    }

    /// Read a qualified name, splitting at the first colon
    ///
    /// Returns `None` when no delimiter follows the name inside the window.
    /// The name may be empty; callers decide whether that is an error.
    pub fn read_qname(&mut self) -> Option<QName<'a>> {
        let start = self.pos;
        let mut end = self.find_name_end(start)?;
        let mut colon = None;
        if self.input[end] == b':' {
            colon = Some(end - start);
            end = self.find_name_end(end + 1)?;
        }
        self.pos = end;
        Some(QName::new(&self.input[start..end], colon))
    }
}
