//! Byte helpers shared by the text parsers

/// Byte range of a field built one byte at a time by a state machine
///
/// Pushing a byte extends the range to cover it, so a field is always realised as one
/// contiguous slice of the input, from its first to its last accepted byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Span {
    range: Option<(usize, usize)>,
}

impl Span {
    #[inline]
    pub(crate) fn push(&mut self, pos: usize) {
        self.range = match self.range {
            Some((start, _)) => Some((start, pos + 1)),
            None => Some((pos, pos + 1)),
        };
    }

    /// Move the range out, leaving this span empty
    #[inline]
    pub(crate) fn take(&mut self) -> Span {
        Span {
            range: self.range.take(),
        }
    }

    /// Get the bytes covered by the span
    #[inline]
    pub(crate) fn slice<'a>(&self, v: &'a [u8]) -> &'a [u8] {
        match self.range {
            Some((start, end)) => &v[start..end],
            None => &[],
        }
    }
}

/// Remove leading and trailing ASCII whitespace
pub(crate) fn trim(v: &[u8]) -> &[u8] {
    let start = v
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(v.len());
    let end = v
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |p| p + 1);
    &v[start..end]
}

/// Test if `v[pos..]` starts with `prefix`, ignoring ASCII case
#[inline]
pub(crate) fn starts_with_at(v: &[u8], pos: usize, prefix: &[u8]) -> bool {
    v.get(pos..pos + prefix.len())
        .map_or(false, |s| s.eq_ignore_ascii_case(prefix))
}

/// Iterator over the lines of a buffer, split on CRLF
///
/// A trailing CRLF yields a final empty line. Bare LF is not a separator.
pub(crate) struct CrlfLines<'a> {
    rem: Option<&'a [u8]>,
}

impl<'a> CrlfLines<'a> {
    pub(crate) fn new(v: &'a [u8]) -> Self {
        CrlfLines { rem: Some(v) }
    }
}

impl<'a> Iterator for CrlfLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let rem = self.rem?;
        match rem.windows(2).position(|w| w == b"\r\n") {
            Some(p) => {
                self.rem = Some(&rem[p + 2..]);
                Some(&rem[..p])
            }
            None => {
                self.rem = None;
                Some(rem)
            }
        }
    }
}
