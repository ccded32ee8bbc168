//! Streaming XML Parser
//!
//! Single pass over a [`ByteSource`] with bounded memory. The parser owns a
//! [`RefillBuffer`] and walks the document in phases (prolog, DOCTYPE, root
//! element, trailing material), refilling whenever fewer than a block of bytes
//! remain ahead of it.

use log::{debug, trace};

use crate::config::ParserConfig;
use crate::core::error::{ParseError, ParseErrorKind};
use crate::core::handler::ScanHandler;
use crate::core::tokenizer::{Progress, Tokenizer};
use crate::error::Result;
use crate::reader::{ByteSource, RefillBuffer};

/// Part of the document being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Whitespace,
    Declaration,
    Doctype,
    Content,
    Trailing,
}

/// Stateful streaming XML parser
pub struct StreamingParser<S: ByteSource> {
    source: S,
    buffer: RefillBuffer,
    /// Current depth in element tree
    depth: usize,
    /// Bytes read from the source so far
    total_bytes: u64,
}

impl<S: ByteSource> StreamingParser<S> {
    /// Create a parser over `source` with the given window geometry
    pub fn with_config(source: S, config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(StreamingParser {
            source,
            buffer: RefillBuffer::new(&config),
            depth: 0,
            total_bytes: 0,
        })
    }

    /// Parse the whole document, reporting every construct to `handler`
    ///
    /// Returns the number of bytes read from the source. The first grammar
    /// or input error ends the parse.
    pub fn parse<H: ScanHandler>(&mut self, handler: &mut H) -> Result<u64> {
        if self.refill()? == 0 {
            return Err(ParseError::new(ParseErrorKind::EmptyInput, 0).into());
        }
        trace!("START DOCUMENT");

        for phase in [
            Phase::Whitespace,
            Phase::Declaration,
            Phase::Whitespace,
            Phase::Doctype,
            Phase::Whitespace,
            Phase::Content,
            Phase::Trailing,
        ] {
            self.run(phase, handler)?;
        }

        trace!("END DOCUMENT");
        debug!("parsed {} bytes", self.total_bytes);
        Ok(self.total_bytes)
    }

    fn refill(&mut self) -> Result<usize> {
        let read = self.buffer.refill(&mut self.source)?;
        self.total_bytes += read as u64;
        Ok(read)
    }

    fn refill_all(&mut self) -> Result<usize> {
        let read = self.buffer.refill_all(&mut self.source)?;
        self.total_bytes += read as u64;
        Ok(read)
    }

    /// Step through one phase until it reports completion
    ///
    /// Outside end of stream a step only runs with a full block ahead. A
    /// construct whose terminator is missing gets one refill that fills the
    /// whole window; if it is still incomplete afterwards the parse fails.
    fn run<H: ScanHandler>(&mut self, phase: Phase, handler: &mut H) -> Result<()> {
        let block_size = self.buffer.block_size();
        let mut retried = false;
        loop {
            if self.buffer.needs_refill() {
                self.refill()?;
            }

            let offset = self.buffer.offset();
            let last = self.buffer.is_eof();
            let mut tok = Tokenizer::new(self.buffer.window(), last);
            let mut progress = Progress::Continue;
            while last || tok.remaining().len() >= block_size {
                progress = step(phase, &mut tok, &mut self.depth, handler).map_err(|e| e.offset_by(offset))?;
                if progress != Progress::Continue {
                    break;
                }
                retried = false;
            }
            let consumed = tok.position();
            self.buffer.consume(consumed);

            match progress {
                Progress::Continue => {}
                Progress::Done => return Ok(()),
                Progress::Incomplete(kind) => {
                    if retried || last {
                        return Err(ParseError::new(kind, self.buffer.offset()).into());
                    }
                    debug!("{} at byte {}, refilling", kind, self.buffer.offset());
                    retried = true;
                    self.refill_all()?;
                }
            }
        }
    }
}

/// Run one step of `phase` on the current window
fn step<H: ScanHandler>(
    phase: Phase,
    tok: &mut Tokenizer<'_>,
    depth: &mut usize,
    handler: &mut H,
) -> std::result::Result<Progress, ParseError> {
    match phase {
        Phase::Whitespace => {
            tok.skip_whitespace();
            if tok.remaining().is_empty() && !tok.is_exhausted() {
                Ok(Progress::Continue)
            } else {
                Ok(Progress::Done)
            }
        }
        Phase::Declaration => {
            if tok.starts_with_keyword(b"<?xml") {
                tok.parse_xml_declaration(handler)?;
            }
            Ok(Progress::Done)
        }
        Phase::Doctype => {
            if tok.starts_with_keyword(b"<!DOCTYPE") {
                tok.parse_doctype(handler)
            } else {
                Ok(Progress::Done)
            }
        }
        Phase::Content => tok.parse_content(depth, handler),
        Phase::Trailing => {
            tok.skip_whitespace();
            if tok.is_exhausted() {
                Ok(Progress::Done)
            } else if tok.remaining().is_empty() {
                Ok(Progress::Continue)
            } else if tok.starts_with(b"<!--") {
                tok.parse_comment(handler)
            } else {
                Err(tok.error(ParseErrorKind::ExtraContent))
            }
        }
    }
}
