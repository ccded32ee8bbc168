//! Grammar errors raised by the structural parser
//!
//! Every variant is fatal: the parser stops at the first violation and never
//! resynchronizes.

use thiserror::Error;

/// Longest name fragment echoed back in a diagnostic
const MAX_ECHO: usize = 64;

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("empty input")]
    EmptyInput,
    #[error("missing required first attribute version in XML declaration")]
    MissingVersion,
    #[error("invalid delimiter for attribute {0} in XML declaration")]
    DeclarationDelimiter(String),
    #[error("incomplete attribute in XML declaration")]
    IncompleteDeclarationAttribute,
    #[error("invalid attribute {0} in XML declaration")]
    InvalidDeclarationAttribute(String),
    #[error("unterminated XML declaration")]
    UnterminatedDeclaration,
    #[error("unterminated DOCTYPE")]
    UnterminatedDoctype,
    #[error("unterminated XML comment")]
    UnterminatedComment,
    #[error("unterminated CDATA")]
    UnterminatedCdata,
    #[error("unterminated processing instruction")]
    UnterminatedProcessingInstruction,
    #[error("invalid start tag name")]
    InvalidStartTagName,
    #[error("invalid end tag name")]
    InvalidEndTagName,
    #[error("unterminated start tag '{0}'")]
    UnterminatedStartTag(String),
    #[error("unterminated end tag '{0}'")]
    UnterminatedEndTag(String),
    #[error("empty attribute name")]
    EmptyAttributeName,
    #[error("attribute {0} missing =")]
    MissingEquals(String),
    #[error("attribute {0} missing delimiter")]
    MissingDelimiter(String),
    #[error("incomplete namespace")]
    IncompleteNamespace,
    #[error("extra content at end of document")]
    ExtraContent,
    #[error("invalid XML document")]
    InvalidDocument,
}

/// A grammar error and the byte offset where it was detected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {position}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Offset in the decoded input stream
    pub position: u64,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: u64) -> Self {
        ParseError { kind, position }
    }

    /// Shift a window-relative position to a stream offset
    pub fn offset_by(mut self, base: u64) -> Self {
        self.position += base;
        self
    }
}

/// Lossy, length-limited rendering of a name for diagnostics
pub(crate) fn echo(bytes: &[u8]) -> String {
    let end = bytes.len().min(MAX_ECHO);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
