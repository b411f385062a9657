//! Token to character offset table.

use crate::model::Token;

/// Half-open token index interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    /// Create a range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range covers no tokens.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Cumulative byte offsets of a token sequence.
///
/// Token `i` spans `[starts[i], ends[i])` of the concatenated token text.
/// Offsets assume the token strings concatenate to the completion text
/// verbatim; re-encoded tokens will misalign.
#[derive(Debug, Clone, Default)]
pub struct TokenOffsets {
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl TokenOffsets {
    /// Build the table for a token sequence.
    pub fn new(tokens: &[Token]) -> Self {
        let mut starts = Vec::with_capacity(tokens.len());
        let mut ends = Vec::with_capacity(tokens.len());
        let mut pos = 0;
        for token in tokens {
            starts.push(pos);
            pos += token.text.len();
            ends.push(pos);
        }
        Self { starts, ends }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Check if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Length of the concatenated token text.
    pub fn total_len(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Span of token `i`.
    pub fn span(&self, i: usize) -> Option<(usize, usize)> {
        Some((*self.starts.get(i)?, *self.ends.get(i)?))
    }

    /// Index of the token whose span contains `offset`.
    pub fn token_at(&self, offset: usize) -> Option<usize> {
        // First token ending after the offset; empty tokens never contain it
        let i = self.ends.partition_point(|&end| end <= offset);
        (i < self.len() && self.starts[i] <= offset).then_some(i)
    }

    /// One past the last token whose span ends at or before `offset`.
    ///
    /// A token straddling `offset` is excluded, so a value ending mid-token
    /// does not include that token.
    pub fn token_end(&self, offset: usize) -> usize {
        self.ends.partition_point(|&end| end <= offset)
    }

    /// Token range of the byte span `[start, end)`, if non-degenerate.
    pub fn char_range_to_tokens(&self, start: usize, end: usize) -> Option<Range> {
        let first = self.token_at(start)?;
        let last = self.token_end(end);
        (last > first).then(|| Range::new(first, last))
    }
}
