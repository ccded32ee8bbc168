//! Attribute and namespace scanning inside a start tag
//!
//! Values are reported raw (no entity decoding). The scanner sits right after
//! the element name and whitespace on entry, and right before `>` or `/>` on
//! success.

use log::trace;

use super::entities::parse_c_integer;
use super::error::{echo, ParseError, ParseErrorKind};
use super::handler::ScanHandler;
use super::scanner::Scanner;
use super::unicode::is_name_char;

/// Scan all attributes and namespace declarations of a start tag
///
/// `in_escape` marks a srcML `escape` element, whose `char` attribute is
/// decoded and handed to [`ScanHandler::escape_char`].
pub fn scan_attributes<H: ScanHandler>(
    scanner: &mut Scanner<'_>,
    in_escape: bool,
    handler: &mut H,
) -> Result<(), ParseError> {
    while scanner.peek().is_some_and(is_name_char) {
        if scanner.starts_with(b"xmlns") && matches!(scanner.peek_at(5), Some(b':' | b'=')) {
            scan_namespace(scanner, handler)?;
        } else {
            scan_attribute(scanner, in_escape, handler)?;
        }
        scanner.skip_whitespace();
    }
    Ok(())
}

/// Parse `xmlns="uri"` or `xmlns:prefix="uri"`
fn scan_namespace<H: ScanHandler>(scanner: &mut Scanner<'_>, handler: &mut H) -> Result<(), ParseError> {
    let incomplete = |scanner: &Scanner<'_>| {
        ParseError::new(ParseErrorKind::IncompleteNamespace, scanner.position() as u64)
    };

    scanner.advance(b"xmlns".len());
    let equals = scanner.find_byte(b'=').ok_or_else(|| incomplete(scanner))?;
    let prefix = if scanner.peek() == Some(b':') {
        Some(scanner.slice(scanner.position() + 1, equals).trim_ascii_end())
    } else {
        None
    };
    scanner.set_position(equals + 1);
    scanner.skip_whitespace();

    let delimiter = match scanner.peek() {
        Some(d @ (b'"' | b'\'')) => d,
        _ => return Err(incomplete(scanner)),
    };
    scanner.advance(1);
    let end = scanner.find_byte(delimiter).ok_or_else(|| incomplete(scanner))?;
    let uri = scanner.slice(scanner.position(), end);
    scanner.set_position(end + 1);

    trace!(
        "NAMESPACE prefix={:?} uri={:?}",
        String::from_utf8_lossy(prefix.unwrap_or_default()),
        String::from_utf8_lossy(uri)
    );
    handler.namespace(prefix, uri);
    Ok(())
}

/// Parse `name="value"` or `name='value'`
fn scan_attribute<H: ScanHandler>(
    scanner: &mut Scanner<'_>,
    in_escape: bool,
    handler: &mut H,
) -> Result<(), ParseError> {
    let name = scanner
        .read_qname()
        .ok_or_else(|| ParseError::new(ParseErrorKind::EmptyAttributeName, scanner.position() as u64))?;
    let fail = |kind: ParseErrorKind, scanner: &Scanner<'_>| ParseError::new(kind, scanner.position() as u64);

    scanner.skip_whitespace();
    if scanner.peek() != Some(b'=') {
        return Err(fail(ParseErrorKind::MissingEquals(echo(name.qualified)), scanner));
    }
    scanner.advance(1);
    scanner.skip_whitespace();

    let delimiter = match scanner.peek() {
        Some(d @ (b'"' | b'\'')) => d,
        _ => return Err(fail(ParseErrorKind::MissingDelimiter(echo(name.qualified)), scanner)),
    };
    scanner.advance(1);
    let end = scanner
        .find_byte(delimiter)
        .ok_or_else(|| fail(ParseErrorKind::MissingDelimiter(echo(name.qualified)), scanner))?;
    let value = scanner.slice(scanner.position(), end);
    scanner.set_position(end + 1);

    trace!(
        "ATTRIBUTE qname={:?} value={:?}",
        String::from_utf8_lossy(name.qualified),
        String::from_utf8_lossy(value)
    );
    handler.attribute(&name, value);

    if in_escape && name.local == b"char" {
        handler.escape_char(parse_c_integer(value));
    }
    Ok(())
}
