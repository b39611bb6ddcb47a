//! The read-only source model: raw bytes, a line index, and range/location
//! conversions (spec §3 "Source model").

use serde::{Deserialize, Serialize};

/// A half-open byte range `[begin, end)` into some buffer.
///
/// Empty ranges `[p, p)` are allowed and mean "insertion point p" (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    pub begin: usize,
    pub end: usize,
}

impl Range {
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "range begin must not exceed end");
        Self { begin, end }
    }

    /// An empty range at `p`, i.e. an insertion point.
    pub fn point(p: usize) -> Self {
        Self { begin: p, end: p }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn contains(&self, other: &Range) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    pub fn shift(&self, delta: isize) -> Range {
        let shift = |x: usize| (x as isize + delta) as usize;
        Range::new(shift(self.begin), shift(self.end))
    }
}

/// A position in source text: 1-indexed line, 0-indexed column, and the byte
/// offset it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Byte-offset-to-line/column index over some buffer, built once and reused
/// for every lookup. Grounded on `quarto-source-map::FileInformation`: an
/// index of newline byte offsets, binary-searched per lookup.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_breaks: Vec<usize>,
    total_length: usize,
}

impl LineIndex {
    pub fn new(content: &[u8]) -> Self {
        let line_breaks = content
            .iter()
            .enumerate()
            .filter_map(|(idx, &b)| if b == b'\n' { Some(idx) } else { None })
            .collect();
        Self {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset to a `Location`. Returns `None` if `offset` is
    /// out of bounds (`offset > total_length`).
    pub fn offset_to_location(&self, offset: usize) -> Option<Location> {
        if offset > self.total_length {
            return None;
        }
        let row0 = match self.line_breaks.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };
        let line_start = if row0 == 0 {
            0
        } else {
            self.line_breaks[row0 - 1] + 1
        };
        Some(Location {
            offset,
            line: row0 + 1,
            column: offset - line_start,
        })
    }

    /// Byte offset of the first byte of 1-indexed `line`.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        if line == 0 {
            return None;
        }
        if line == 1 {
            return Some(0);
        }
        self.line_breaks.get(line - 2).map(|&p| p + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}

/// A read-only view of the original template source.
#[derive(Debug, Clone)]
pub struct SourceModel {
    content: Vec<u8>,
    index: LineIndex,
}

impl SourceModel {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        let index = LineIndex::new(&content);
        Self { content, index }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn slice(&self, range: Range) -> &[u8] {
        &self.content[range.begin..range.end]
    }

    pub fn location(&self, offset: usize) -> Option<Location> {
        self.index.offset_to_location(offset)
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.index.line_start(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_is_point() {
        let r = Range::point(5);
        assert!(r.is_empty());
        assert_eq!(r.begin, 5);
        assert_eq!(r.end, 5);
    }

    #[test]
    fn range_contains() {
        let outer = Range::new(0, 10);
        let inner = Range::new(2, 5);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn offset_to_location_multiple_lines() {
        let idx = LineIndex::new(b"line 1\nline 2\nline 3");
        assert_eq!(idx.line_count(), 3);

        let loc = idx.offset_to_location(0).unwrap();
        assert_eq!((loc.line, loc.column), (1, 0));

        let loc = idx.offset_to_location(7).unwrap();
        assert_eq!((loc.line, loc.column), (2, 0));

        let loc = idx.offset_to_location(20).unwrap();
        assert_eq!((loc.line, loc.column), (3, 6));
    }

    #[test]
    fn offset_to_location_out_of_bounds() {
        let idx = LineIndex::new(b"hello");
        assert!(idx.offset_to_location(100).is_none());
    }

    #[test]
    fn line_start_round_trips_with_offset_to_location() {
        let idx = LineIndex::new(b"ab\ncd\nef");
        for offset in 0..=idx.total_length {
            if let Some(loc) = idx.offset_to_location(offset) {
                let start = idx.line_start(loc.line).unwrap();
                assert!(start <= offset);
            }
        }
    }

    #[test]
    fn source_model_slices_by_range() {
        let src = SourceModel::new(b"<div>hello</div>".to_vec());
        assert_eq!(src.slice(Range::new(5, 10)), b"hello");
    }
}
