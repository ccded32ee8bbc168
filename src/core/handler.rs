//! ScanHandler trait
//!
//! The structural parser reports what it recognizes through this trait
//! instead of building a tree. Every slice handed to a handler borrows the
//! input window and is only valid for the duration of the call.

use super::qname::QName;

/// Trait for handling scan events
///
/// Only `start_element` and `characters` are required; the remaining
/// callbacks default to doing nothing (or, for entities and CDATA, to
/// forwarding to `characters`).
pub trait ScanHandler {
    /// Called when a start tag (or self-closing tag) is recognized
    fn start_element(&mut self, name: &QName<'_>);

    /// Called for an end tag, and after the attributes of a self-closing tag
    fn end_element(&mut self, _name: &QName<'_>) {}

    /// Called for a run of character data
    ///
    /// A single text run may arrive in several pieces when it crosses a
    /// refill boundary.
    fn characters(&mut self, text: &[u8]);

    /// Called for an entity reference
    ///
    /// `reference` is the raw text (`&lt;`, or a lone `&` when the reference
    /// is not one of the recognized ones) and `unescaped` the byte it stands
    /// for.
    fn entity(&mut self, _reference: &[u8], unescaped: u8) {
        self.characters(std::slice::from_ref(&unescaped));
    }

    /// Called for the content of a CDATA section
    fn cdata(&mut self, content: &[u8]) {
        self.characters(content);
    }

    /// Called for each attribute of a start tag
    fn attribute(&mut self, _name: &QName<'_>, _value: &[u8]) {}

    /// Called for each namespace declaration of a start tag
    fn namespace(&mut self, _prefix: Option<&[u8]>, _uri: &[u8]) {}

    /// Called with the decoded `char` attribute of a srcML `escape` element
    fn escape_char(&mut self, _value: i64) {}

    /// Called for comments
    fn comment(&mut self, _content: &[u8]) {}

    /// Called for processing instructions
    fn processing_instruction(&mut self, _target: &[u8], _data: &[u8]) {}

    /// Called for the XML declaration
    fn xml_declaration(
        &mut self,
        _version: &[u8],
        _encoding: Option<&[u8]>,
        _standalone: Option<&[u8]>,
    ) {
    }

    /// Called for DOCTYPE (content between `<!DOCTYPE` and the final `>`)
    fn doctype(&mut self, _content: &[u8]) {}
}

impl<H: ScanHandler + ?Sized> ScanHandler for &mut H {
    fn start_element(&mut self, name: &QName<'_>) {
        (**self).start_element(name)
    }
    fn end_element(&mut self, name: &QName<'_>) {
        (**self).end_element(name)
    }
    fn characters(&mut self, text: &[u8]) {
        (**self).characters(text)
    }
    fn entity(&mut self, reference: &[u8], unescaped: u8) {
        (**self).entity(reference, unescaped)
    }
    fn cdata(&mut self, content: &[u8]) {
        (**self).cdata(content)
    }
    fn attribute(&mut self, name: &QName<'_>, value: &[u8]) {
        (**self).attribute(name, value)
    }
    fn namespace(&mut self, prefix: Option<&[u8]>, uri: &[u8]) {
        (**self).namespace(prefix, uri)
    }
    fn escape_char(&mut self, value: i64) {
        (**self).escape_char(value)
    }
    fn comment(&mut self, content: &[u8]) {
        (**self).comment(content)
    }
    fn processing_instruction(&mut self, target: &[u8], data: &[u8]) {
        (**self).processing_instruction(target, data)
    }
    fn xml_declaration(&mut self, version: &[u8], encoding: Option<&[u8]>, standalone: Option<&[u8]>) {
        (**self).xml_declaration(version, encoding, standalone)
    }
    fn doctype(&mut self, content: &[u8]) {
        (**self).doctype(content)
    }
}
