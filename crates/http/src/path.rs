/// The `/`-delimited segments of a request path.
///
/// Segment 0 is the empty string before the leading slash, segment 1 names
/// the operation and the rest are positional operands. Empty segments are
/// kept, so `/search/` yields an empty operand rather than a short path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathArgs<'a> {
    segments: Vec<&'a str>,
}

impl<'a> PathArgs<'a> {
    pub fn parse(path: &'a str) -> Self {
        Self {
            segments: path.split('/').collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn operation(&self) -> &'a str {
        self.segments.get(1).copied().unwrap_or("")
    }

    /// The first `n` operands, or `None` when the path has fewer than
    /// `n + 2` segments. Extra trailing segments are ignored.
    pub fn operands(&self, n: usize) -> Option<&[&'a str]> {
        self.segments.get(2..2 + n)
    }
}
