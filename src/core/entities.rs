//! Entity references and srcML character escapes
//!
//! Only the references srcML emits are recognized:
//! - `&lt;` `&gt;` `&amp;`
//!
//! Any other `&` stands for itself. No general entity expansion is done.

/// Recognized references and the byte each one stands for
const PREDEFINED: [(&[u8], u8); 3] = [(b"&lt;", b'<'), (b"&gt;", b'>'), (b"&amp;", b'&')];

/// Match the reference at the start of `input` (which begins with `&`)
///
/// Returns the length of the reference and the byte it stands for. An
/// unrecognized reference is a one-byte literal `&`.
#[inline]
pub fn match_reference(input: &[u8]) -> (usize, u8) {
    debug_assert_eq!(input.first(), Some(&b'&'));
    for (reference, unescaped) in PREDEFINED {
        if input.starts_with(reference) {
            return (reference.len(), unescaped);
        }
    }
    (1, b'&')
}

/// Decode an integer the way C `strtol(value, NULL, 0)` does
///
/// Leading whitespace and a sign are accepted, `0x`/`0X` selects hex, a
/// leading `0` selects octal, anything else is decimal. Parsing stops at the
/// first byte that is not a digit of the radix; overflow saturates.
pub fn parse_c_integer(value: &[u8]) -> i64 {
    let mut i = 0;
    while i < value.len() && matches!(value[i], b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C) {
        i += 1;
    }

    let negative = match value.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let rest = &value[i..];
    let (radix, digits) = match rest {
        [b'0', b'x' | b'X', d, ..] if d.is_ascii_hexdigit() => (16, &rest[2..]),
        [b'0', ..] => (8, rest),
        _ => (10, rest),
    };

    let mut acc: i64 = 0;
    for &b in digits {
        let Some(d) = (b as char).to_digit(radix) else {
            break;
        };
        acc = acc.saturating_mul(radix as i64).saturating_add(d as i64);
    }

    if negative {
        -acc
    } else {
        acc
    }
}
