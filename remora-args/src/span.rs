/// Byte position in the flattened argument string.
pub type Pos = usize;

/// A byte range in the flattened argument string.
///
/// Populate errors carry one of these so diagnostics can point at the exact
/// value inside the space-joined input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// Starting byte of the span.
    pub start: Pos,
    /// Length of the span in bytes.
    pub len: usize,
}

impl Span {
    /// Creates a new span with the given start position and length.
    pub const fn new(start: Pos, len: usize) -> Self {
        Span { start, len }
    }

    /// Length of the span in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the span covers no bytes, as happens for an empty value
    /// after `=`.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
