//! DOCTYPE scanning
//!
//! The internal subset is not interpreted. The scanner only finds the `>`
//! that closes the declaration, balancing angle brackets while ignoring any
//! that appear inside quoted literals or `<!-- ... -->` comments.

use memchr::memmem;

/// Find the `>` closing a DOCTYPE
///
/// `input` starts right after the `<!DOCTYPE` keyword. Returns the offset of
/// the closing `>`, or `None` if the window ends first.
pub fn find_doctype_end(input: &[u8]) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_single = false;
    let mut in_double = false;
    let mut pos = 0;

    while pos < input.len() {
        let in_quote = in_single || in_double;
        match input[pos] {
            b'<' if !in_quote && input[pos..].starts_with(b"<!--") => {
                let end = memmem::find(&input[pos + 4..], b"-->")?;
                pos += 4 + end + 3;
                continue;
            }
            b'"' if !in_single => in_double = !in_double,
            b'\'' if !in_double => in_single = !in_single,
            b'<' if !in_quote => depth += 1,
            b'>' if !in_quote => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_doctype() {
        assert_eq!(find_doctype_end(b" unit>rest"), Some(5));
        assert_eq!(find_doctype_end(b" unit SYSTEM \"unit.dtd\">"), Some(23));
    }

    #[test]
    fn test_internal_subset() {
        let input = b" unit [<!ELEMENT unit (#PCDATA)><!ATTLIST unit a CDATA \"x\">]>";
        assert_eq!(find_doctype_end(input), Some(input.len() - 1));
    }

    #[test]
    fn test_brackets_inside_quotes_and_comments() {
        let input = b" unit [<!ENTITY e \"<>\"><!-- > < --><!ENTITY f 'it\"s'>]>";
        assert_eq!(find_doctype_end(input), Some(input.len() - 1));
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(find_doctype_end(b" unit [<!ELEMENT unit ANY>"), None);
        assert_eq!(find_doctype_end(b" unit [<!-- never closed"), None);
        assert_eq!(find_doctype_end(b" unit \"quoted >"), None);
    }
}
