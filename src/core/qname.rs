//! Qualified names borrowed from the input window

/// An element or attribute name, split at its first colon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QName<'a> {
    /// Full name as written (`prefix:local` or `local`)
    pub qualified: &'a [u8],
    /// Namespace prefix (before the colon), if any
    pub prefix: Option<&'a [u8]>,
    /// Local part (after the colon)
    pub local: &'a [u8],
}

impl<'a> QName<'a> {
    /// Build from a qualified name and the offset of its colon within it
    #[inline]
    pub fn new(qualified: &'a [u8], colon: Option<usize>) -> Self {
        match colon {
            Some(c) => QName {
                qualified,
                prefix: Some(&qualified[..c]),
                local: &qualified[c + 1..],
            },
            None => QName {
                qualified,
                prefix: None,
                local: qualified,
            },
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.qualified.is_empty()
    }
}
