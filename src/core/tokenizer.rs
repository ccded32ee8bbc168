//! XML Tokenizer - recognizes one construct at a time in the input window
//!
//! Handles the XML subset srcML produces:
//! - XML declaration and DOCTYPE
//! - Element start/end tags, attributes, namespace declarations
//! - Text content and entity references
//! - CDATA sections
//! - Comments
//! - Processing instructions
//!
//! The tokenizer never looks past the window it was given. Constructs whose
//! terminator may legitimately lie beyond it (comments, CDATA, DOCTYPE)
//! report [`Progress::Incomplete`] without consuming anything, so the caller
//! can refill and retry. Everything else is fatal when cut short.

use log::trace;

use super::attributes::scan_attributes;
use super::dtd::find_doctype_end;
use super::entities::match_reference;
use super::error::{echo, ParseError, ParseErrorKind};
use super::handler::ScanHandler;
use super::qname::QName;
use super::scanner::Scanner;
use super::unicode::is_whitespace;

/// Outcome of one tokenizer step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A construct was consumed; keep going
    Continue,
    /// The terminator is not in the window; nothing was consumed.
    /// Carries the error to raise if a refill does not help.
    Incomplete(ParseErrorKind),
    /// The current phase is finished
    Done,
}

/// How a start tag was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClose {
    /// `>`: the element stays open
    Open,
    /// `/>`: the element is already complete
    SelfClosing,
}

/// Tokenizer over one window
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    /// No more input follows this window
    last: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer for `window`; `last` is set once the byte source is exhausted
    pub fn new(window: &'a [u8], last: bool) -> Self {
        Tokenizer {
            scanner: Scanner::new(window),
            last,
        }
    }

    /// Get the current position in the window
    #[inline]
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Bytes left in the window
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.scanner.remaining()
    }

    /// The window is the final one and has been fully consumed
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.last && self.scanner.is_eof()
    }

    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.scanner.starts_with(needle)
    }

    #[inline]
    pub fn skip_whitespace(&mut self) {
        self.scanner.skip_whitespace();
    }

    /// Keyword followed by whitespace (`<?xml `, `<!DOCTYPE `)
    pub fn starts_with_keyword(&self, keyword: &[u8]) -> bool {
        self.scanner.starts_with(keyword) && self.scanner.peek_at(keyword.len()).is_some_and(is_whitespace)
    }

    /// Error of `kind` at the current position
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.scanner.position() as u64)
    }

    /// Parse the XML declaration `<?xml version=".." encoding=".." standalone=".."?>`
    pub fn parse_xml_declaration<H: ScanHandler>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        debug_assert!(self.starts_with(b"<?xml"));
        self.scanner.advance(b"<?xml".len());
        self.scanner.skip_whitespace();

        if self.scanner.peek() == Some(b'?') {
            return Err(self.error(ParseErrorKind::MissingVersion));
        }
        let (name, version) = self.declaration_attribute()?;
        if name != b"version" {
            return Err(self.error(ParseErrorKind::MissingVersion));
        }

        let mut encoding = None;
        let mut standalone = None;
        if self.scanner.peek() != Some(b'?') {
            let (name, value) = self.declaration_attribute()?;
            match name {
                b"encoding" => encoding = Some(value),
                b"standalone" => standalone = Some(value),
                _ => return Err(self.error(ParseErrorKind::InvalidDeclarationAttribute(echo(name)))),
            }
        }
        if self.scanner.peek() != Some(b'?') {
            let (name, value) = self.declaration_attribute()?;
            if name == b"standalone" && standalone.is_none() {
                standalone = Some(value);
            } else {
                return Err(self.error(ParseErrorKind::InvalidDeclarationAttribute(echo(name))));
            }
        }

        if !self.scanner.starts_with(b"?>") {
            return Err(self.error(ParseErrorKind::UnterminatedDeclaration));
        }
        self.scanner.advance(2);

        trace!(
            "XML DECLARATION version={:?} encoding={:?} standalone={:?}",
            String::from_utf8_lossy(version),
            encoding.map(String::from_utf8_lossy),
            standalone.map(String::from_utf8_lossy)
        );
        handler.xml_declaration(version, encoding, standalone);
        Ok(())
    }

    /// One `name = "value"` pair of the XML declaration, followed by whitespace
    fn declaration_attribute(&mut self) -> Result<(&'a [u8], &'a [u8]), ParseError> {
        let start = self.scanner.position();
        let name_end = self
            .remaining()
            .iter()
            .position(|&b| b == b'=' || is_whitespace(b))
            .map(|i| start + i)
            .ok_or_else(|| self.error(ParseErrorKind::IncompleteDeclarationAttribute))?;
        let name = self.scanner.slice(start, name_end);
        self.scanner.set_position(name_end);
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'=') {
            return Err(self.error(ParseErrorKind::IncompleteDeclarationAttribute));
        }
        self.scanner.advance(1);
        self.scanner.skip_whitespace();

        let delimiter = match self.scanner.peek() {
            Some(d @ (b'"' | b'\'')) => d,
            _ => return Err(self.error(ParseErrorKind::DeclarationDelimiter(echo(name)))),
        };
        self.scanner.advance(1);
        let value_end = self
            .scanner
            .find_byte(delimiter)
            .ok_or_else(|| self.error(ParseErrorKind::IncompleteDeclarationAttribute))?;
        let value = self.scanner.slice(self.scanner.position(), value_end);
        self.scanner.set_position(value_end + 1);
        self.scanner.skip_whitespace();
        Ok((name, value))
    }

    /// Parse `<!DOCTYPE ...>`
    pub fn parse_doctype<H: ScanHandler>(&mut self, handler: &mut H) -> Result<Progress, ParseError> {
        let start = self.scanner.position();
        let content_start = start + b"<!DOCTYPE".len();
        let Some(end) = find_doctype_end(self.scanner.slice(content_start, start + self.remaining().len())) else {
            return Ok(Progress::Incomplete(ParseErrorKind::UnterminatedDoctype));
        };
        let content = self.scanner.slice(content_start, content_start + end);
        self.scanner.set_position(content_start + end + 1);

        trace!("DOCTYPE contents={:?}", String::from_utf8_lossy(content));
        handler.doctype(content);
        Ok(Progress::Done)
    }

    /// Parse one item of element content, tracking nesting depth
    ///
    /// Returns [`Progress::Done`] once the root element is closed, or when the
    /// stream ends with elements still open.
    pub fn parse_content<H: ScanHandler>(&mut self, depth: &mut usize, handler: &mut H) -> Result<Progress, ParseError> {
        match self.scanner.peek() {
            None if self.last => Ok(Progress::Done),
            None => Ok(Progress::Continue),
            Some(b'&') => {
                self.parse_reference(handler);
                Ok(Progress::Continue)
            }
            Some(b'<') => match self.scanner.peek_at(1) {
                Some(b'!') => {
                    if self.scanner.starts_with(b"<!--") {
                        self.parse_comment(handler)
                    } else if self.scanner.starts_with(b"<![CDATA[") {
                        self.parse_cdata(handler)
                    } else {
                        Err(self.error(ParseErrorKind::InvalidDocument))
                    }
                }
                Some(b'?') => {
                    self.parse_pi(handler)?;
                    Ok(Progress::Continue)
                }
                Some(b'/') => {
                    self.parse_end_tag(handler)?;
                    // A stray end tag outside the root leaves depth at 0
                    match *depth {
                        0 => Ok(Progress::Continue),
                        1 => {
                            *depth = 0;
                            Ok(Progress::Done)
                        }
                        _ => {
                            *depth -= 1;
                            Ok(Progress::Continue)
                        }
                    }
                }
                Some(_) => match self.parse_start_tag(handler)? {
                    TagClose::Open => {
                        *depth += 1;
                        Ok(Progress::Continue)
                    }
                    TagClose::SelfClosing if *depth == 0 => Ok(Progress::Done),
                    TagClose::SelfClosing => Ok(Progress::Continue),
                },
                None => Err(self.error(ParseErrorKind::UnterminatedStartTag(String::new()))),
            },
            Some(_) => {
                self.parse_text(handler);
                Ok(Progress::Continue)
            }
        }
    }

    /// Parse an entity reference, recognized or literal
    pub fn parse_reference<H: ScanHandler>(&mut self, handler: &mut H) {
        let (len, unescaped) = match_reference(self.remaining());
        let reference = &self.remaining()[..len];
        self.scanner.advance(len);
        trace!("CHARACTERS characters={:?}", unescaped as char);
        handler.entity(reference, unescaped);
    }

    /// Parse character data up to the next `<` or `&`
    pub fn parse_text<H: ScanHandler>(&mut self, handler: &mut H) {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_text_boundary()
            .unwrap_or(start + self.remaining().len());
        let characters = self.scanner.slice(start, end);
        self.scanner.set_position(end);
        trace!("CHARACTERS characters={:?}", String::from_utf8_lossy(characters));
        handler.characters(characters);
    }

    /// Parse a comment `<!--...-->`
    pub fn parse_comment<H: ScanHandler>(&mut self, handler: &mut H) -> Result<Progress, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(b"<!--".len());
        let Some(end) = self.scanner.find_subsequence(b"-->") else {
            self.scanner.set_position(start);
            return Ok(Progress::Incomplete(ParseErrorKind::UnterminatedComment));
        };
        let comment = self.scanner.slice(self.scanner.position(), end);
        self.scanner.set_position(end + b"-->".len());
        trace!("COMMENT content={:?}", String::from_utf8_lossy(comment));
        handler.comment(comment);
        Ok(Progress::Continue)
    }

    /// Parse a CDATA section `<![CDATA[...]]>`
    pub fn parse_cdata<H: ScanHandler>(&mut self, handler: &mut H) -> Result<Progress, ParseError> {
        let start = self.scanner.position();
        self.scanner.advance(b"<![CDATA[".len());
        let Some(end) = self.scanner.find_subsequence(b"]]>") else {
            self.scanner.set_position(start);
            return Ok(Progress::Incomplete(ParseErrorKind::UnterminatedCdata));
        };
        let characters = self.scanner.slice(self.scanner.position(), end);
        self.scanner.set_position(end + b"]]>".len());
        trace!("CDATA characters={:?}", String::from_utf8_lossy(characters));
        handler.cdata(characters);
        Ok(Progress::Continue)
    }

    /// Parse a processing instruction `<?target data?>`
    ///
    /// The closing `?>` must already be in the window; unlike comments and
    /// CDATA no refill is attempted.
    pub fn parse_pi<H: ScanHandler>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        self.scanner.advance(b"<?".len());
        let tag_end = self
            .scanner
            .find_subsequence(b"?>")
            .ok_or_else(|| self.error(ParseErrorKind::UnterminatedProcessingInstruction))?;
        let name_end = self
            .scanner
            .find_name_end(self.scanner.position())
            .ok_or_else(|| self.error(ParseErrorKind::UnterminatedProcessingInstruction))?
            .min(tag_end);
        let target = self.scanner.slice(self.scanner.position(), name_end);
        let data = self.scanner.slice(name_end, tag_end);
        self.scanner.set_position(tag_end + b"?>".len());
        trace!(
            "PI target={:?} data={:?}",
            String::from_utf8_lossy(target),
            String::from_utf8_lossy(data)
        );
        handler.processing_instruction(target, data);
        Ok(())
    }

    /// Parse an end tag `</name>`
    pub fn parse_end_tag<H: ScanHandler>(&mut self, handler: &mut H) -> Result<QName<'a>, ParseError> {
        self.scanner.advance(b"</".len());
        if self.scanner.peek() == Some(b':') {
            return Err(self.error(ParseErrorKind::InvalidEndTagName));
        }
        let name = self
            .scanner
            .read_qname()
            .ok_or_else(|| self.error(ParseErrorKind::UnterminatedEndTag(echo(self.remaining()))))?;
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::InvalidEndTagName));
        }
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(self.error(ParseErrorKind::UnterminatedEndTag(echo(name.qualified))));
        }
        self.scanner.advance(1);

        trace!(
            "END TAG qName={:?} prefix={:?} localName={:?}",
            String::from_utf8_lossy(name.qualified),
            name.prefix.map(String::from_utf8_lossy),
            String::from_utf8_lossy(name.local)
        );
        handler.end_element(&name);
        Ok(name)
    }

    /// Parse a start tag `<name attr="value" ...>` or `<name .../>`
    pub fn parse_start_tag<H: ScanHandler>(&mut self, handler: &mut H) -> Result<TagClose, ParseError> {
        self.scanner.advance(b"<".len());
        if self.scanner.peek() == Some(b':') {
            return Err(self.error(ParseErrorKind::InvalidStartTagName));
        }
        let name = self
            .scanner
            .read_qname()
            .ok_or_else(|| self.error(ParseErrorKind::UnterminatedStartTag(echo(self.remaining()))))?;
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::InvalidStartTagName));
        }

        trace!(
            "START TAG qName={:?} prefix={:?} localName={:?}",
            String::from_utf8_lossy(name.qualified),
            name.prefix.map(String::from_utf8_lossy),
            String::from_utf8_lossy(name.local)
        );
        handler.start_element(&name);

        let in_escape = name.local == b"escape";
        self.scanner.skip_whitespace();
        scan_attributes(&mut self.scanner, in_escape, handler)?;

        if self.scanner.peek() == Some(b'>') {
            self.scanner.advance(1);
            Ok(TagClose::Open)
        } else if self.scanner.starts_with(b"/>") {
            self.scanner.advance(2);
            handler.end_element(&name);
            Ok(TagClose::SelfClosing)
        } else {
            Err(self.error(ParseErrorKind::UnterminatedStartTag(echo(name.qualified))))
        }
    }
}
