//! Byte classification tables for XML names
//!
//! Both tables are built at compile time and indexed directly by byte value,
//! keeping character-class checks branch free in the hot path.

/// Bytes that end a (possibly qualified) name: `> /":=` and whitespace
const NAME_END_BYTES: &[u8] = b"> /\":=\n\t\r";

const fn build_name_char_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        // Non-ASCII bytes belong to UTF-8 encoded name characters
        table[i] = b.is_ascii_alphanumeric() || b == b'-' || b == b'.' || b == b'_' || b >= 0x80;
        i += 1;
    }
    table
}

const fn build_name_end_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < NAME_END_BYTES.len() {
        table[NAME_END_BYTES[i] as usize] = true;
        i += 1;
    }
    table
}

/// Legal name-continuation bytes
static NAME_CHAR: [bool; 256] = build_name_char_table();

/// Name delimiter bytes
static NAME_END: [bool; 256] = build_name_end_table();

/// Check if byte may continue an XML name (attribute scanning)
#[inline(always)]
pub fn is_name_char(b: u8) -> bool {
    NAME_CHAR[b as usize]
}

/// Check if byte terminates a name
#[inline(always)]
pub fn is_name_end(b: u8) -> bool {
    NAME_END[b as usize]
}

/// XML whitespace: space, tab, newline, carriage return
#[inline(always)]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}
