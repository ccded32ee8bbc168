//! Byte sources feeding the input window
//!
//! A [`ByteSource`] hands out raw bytes in whatever chunk sizes it likes; the
//! [`RefillBuffer`](super::RefillBuffer) decides how much to ask for.

use std::io::{self, Chain, Cursor, Read};
use std::mem;

use flate2::read::MultiGzDecoder;
use log::debug;

use crate::error::{Error, Result};

/// Leading bytes of a gzip member
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Producer of the decoded input stream
pub trait ByteSource {
    /// Fill up to `buf.len()` bytes, returning how many were written
    ///
    /// `Ok(0)` means end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Release the underlying input; called once end of stream is seen
    fn close(&mut self) {}
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Sniffed bytes put back in front of the rest of the stream
type Rewound<R> = Chain<Cursor<Vec<u8>>, R>;

enum State<R> {
    /// Not opened yet; the format is unknown
    Pending(R),
    Plain(Rewound<R>),
    Gzip(MultiGzDecoder<Rewound<R>>),
    Closed,
}

/// Any [`Read`], transparently gunzipped when it starts with the gzip magic
///
/// The input is opened lazily on the first read. Failures while opening, and
/// on that first read, are reported as [`Error::Open`]; later ones as
/// [`Error::Read`].
pub struct DecodedInput<R: Read> {
    state: State<R>,
    started: bool,
}

impl<R: Read> DecodedInput<R> {
    pub fn new(inner: R) -> Self {
        DecodedInput {
            state: State::Pending(inner),
            started: false,
        }
    }

    /// Input was recognized as gzip
    pub fn is_gzip(&self) -> bool {
        matches!(self.state, State::Gzip(_))
    }

    fn open(mut inner: R) -> io::Result<State<R>> {
        let mut magic = [0u8; 2];
        let mut len = 0;
        while len < magic.len() {
            match inner.read(&mut magic[len..]) {
                Ok(0) => break,
                Ok(n) => len += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        let stream = Cursor::new(magic[..len].to_vec()).chain(inner);
        if magic[..len] == GZIP_MAGIC {
            debug!("input is gzip compressed");
            Ok(State::Gzip(MultiGzDecoder::new(stream)))
        } else {
            debug!("input is uncompressed");
            Ok(State::Plain(stream))
        }
    }
}

impl<R: Read> ByteSource for DecodedInput<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if matches!(self.state, State::Pending(_)) {
            if let State::Pending(inner) = mem::replace(&mut self.state, State::Closed) {
                self.state = Self::open(inner).map_err(Error::Open)?;
            }
        }

        let first = !self.started;
        self.started = true;
        let result = loop {
            let read = match &mut self.state {
                State::Plain(stream) => stream.read(buf),
                State::Gzip(decoder) => decoder.read(buf),
                State::Pending(_) | State::Closed => Ok(0),
            };
            match read {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };

        match result {
            Ok(0) => {
                self.close();
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) if first => Err(Error::Open(e)),
            Err(e) => Err(Error::Read(e)),
        }
    }

    fn close(&mut self) {
        if !matches!(self.state, State::Closed) {
            debug!("closing input");
            self.state = State::Closed;
        }
    }
}

/// In-memory source handing out at most `chunk_size` bytes per read
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
    closed: bool,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_chunk_size(data, usize::MAX)
    }

    /// Limit every read to `chunk_size` bytes (at least one)
    pub fn with_chunk_size(data: &'a [u8], chunk_size: usize) -> Self {
        SliceSource {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ByteSource for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = buf.len().min(self.chunk_size).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn drain<S: ByteSource>(source: &mut S, chunk: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; chunk];
        loop {
            let n = source.read(&mut buf)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_plain_passthrough() {
        let mut input = DecodedInput::new(&b"<unit/>"[..]);
        assert_eq!(drain(&mut input, 3).unwrap(), b"<unit/>");
        assert!(!input.is_gzip());
    }

    #[test]
    fn test_single_byte_input() {
        let mut input = DecodedInput::new(&b"<"[..]);
        assert_eq!(drain(&mut input, 16).unwrap(), b"<");
    }

    #[test]
    fn test_gzip_detected() {
        let compressed = gzip(b"<unit>text</unit>");
        let mut input = DecodedInput::new(&compressed[..]);
        let mut buf = [0u8; 64];
        let n = input.read(&mut buf).unwrap();
        assert!(input.is_gzip());
        let mut out = buf[..n].to_vec();
        out.extend(drain(&mut input, 64).unwrap());
        assert_eq!(out, b"<unit>text</unit>");
    }

    #[test]
    fn test_multi_member_gzip() {
        let mut compressed = gzip(b"<unit>");
        compressed.extend(gzip(b"</unit>"));
        let mut input = DecodedInput::new(&compressed[..]);
        assert_eq!(drain(&mut input, 5).unwrap(), b"<unit></unit>");
    }

    #[test]
    fn test_corrupt_gzip_is_open_error() {
        let mut input = DecodedInput::new(&[0x1f, 0x8b, 0xff, 0xff, 0x00][..]);
        let mut buf = [0u8; 64];
        assert!(matches!(input.read(&mut buf), Err(Error::Open(_))));
    }

    #[test]
    fn test_reads_after_close_return_zero() {
        let mut input = DecodedInput::new(&b"x"[..]);
        assert_eq!(drain(&mut input, 4).unwrap(), b"x");
        let mut buf = [0u8; 4];
        assert_eq!(input.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_slice_source_chunks() {
        let mut source = SliceSource::with_chunk_size(b"abcdefg", 3);
        let mut buf = [0u8; 16];
        assert_eq!(source.read(&mut buf).unwrap(), 3);
        assert_eq!(source.read(&mut buf).unwrap(), 3);
        assert_eq!(source.read(&mut buf).unwrap(), 1);
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }
}
