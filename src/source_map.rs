//! The bidirectional source map (spec §4.2): a list of `(dest, origin)`
//! entries recording what the transpiler wrote into the IR in lieu of which
//! original bytes.
//!
//! Grounded on `quarto-source-map::mapping`'s `translate`-returns-`Option`
//! shape, adapted from quarto's recursive Original/Substring/Concat scheme to
//! the flat append-only entry list spec §3 describes — closer to how
//! `examples/SegaraRai-strip-whitespace` models a source map (it depends on
//! the `sourcemap` crate, itself a flat mapping-entry model).

use crate::error::EngineError;
use crate::source::Range;

/// One entry: `dest` bytes were emitted into the IR in lieu of `origin` bytes
/// from the template.
///
/// Per spec §3: entries are appended in order of increasing `dest.begin`,
/// `dest` ranges never overlap, and an entry is length-preserving (usable for
/// relative/containment lookup) exactly when `dest.len() == origin.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub dest: Range,
    pub origin: Range,
}

impl Entry {
    pub fn is_length_preserving(&self) -> bool {
        self.dest.len() == self.origin.len()
    }
}

/// An append-only log of IR-to-source mappings, queried via [`SourceMap::translate`].
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    entries: Vec<Entry>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dest` (an IR range) was emitted in lieu of `origin` (a
    /// source range). Entries must be appended in order of increasing
    /// `dest.begin`; this is a debug-only invariant check (spec §3), not a
    /// recoverable error — a caller violating it is a bug in this crate.
    pub fn add(&mut self, origin: Range, dest: Range) {
        if let Some(last) = self.entries.last() {
            debug_assert!(
                dest.begin >= last.dest.begin,
                "{}",
                EngineError::OutOfOrderSourceMapEntry(dest.begin)
            );
        }
        self.entries.push(Entry { dest, origin });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// First entry whose `dest.begin` equals `ir_offset`, giving its `origin.begin`.
    pub fn translate_beginning(&self, ir_offset: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.dest.begin == ir_offset)
            .map(|e| e.origin.begin)
    }

    /// First entry whose `dest.end` equals `ir_offset`, giving its `origin.end`.
    pub fn translate_ending(&self, ir_offset: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.dest.end == ir_offset)
            .map(|e| e.origin.end)
    }

    /// Map a single IR offset through a length-preserving entry whose `dest`
    /// contains it (used by both the relative and spanning fallback tiers).
    fn relative_point(&self, ir_offset: usize) -> Option<usize> {
        self.entries
            .iter()
            .filter(|e| e.is_length_preserving())
            .find(|e| e.dest.begin <= ir_offset && ir_offset <= e.dest.end)
            .map(|e| e.origin.begin + (ir_offset - e.dest.begin))
    }

    /// Translate an IR range back to a source range, per the fallback tiers
    /// in spec §4.2: exact match, endpoint match, empty-insertion, relative
    /// containment, spanning, or `None`.
    pub fn translate(&self, ir_range: Range) -> Option<Range> {
        // 1. Exact match.
        if let Some(entry) = self.entries.iter().find(|e| e.dest == ir_range) {
            return Some(entry.origin);
        }

        let begin = self.translate_beginning(ir_range.begin);

        // 3. Empty range with a known beginning: an insertion point.
        if ir_range.is_empty() {
            if let Some(b) = begin {
                return Some(Range::point(b));
            }
        }

        let end = self.translate_ending(ir_range.end);

        // 5. Both endpoints individually translated.
        if let (Some(b), Some(e)) = (begin, end) {
            return Some(Range::new(b, e));
        }

        // 6. Relative: a single length-preserving entry contains the whole range.
        if let Some(entry) = self
            .entries
            .iter()
            .filter(|e| e.is_length_preserving())
            .find(|e| e.dest.contains(&ir_range))
        {
            let delta = entry.origin.begin as isize - entry.dest.begin as isize;
            return Some(ir_range.shift(delta));
        }

        // 7. Spanning: both endpoints individually resolve via (possibly
        // different) length-preserving entries.
        if let (Some(s), Some(t)) = (
            self.relative_point(ir_range.begin),
            self.relative_point(ir_range.end),
        ) {
            return Some(Range::new(s, t));
        }

        // 8. Untranslatable.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        let mut map = SourceMap::new();
        map.add(Range::new(10, 14), Range::new(0, 4));
        assert_eq!(map.translate(Range::new(0, 4)), Some(Range::new(10, 14)));
    }

    #[test]
    fn endpoint_match_different_lengths() {
        let mut map = SourceMap::new();
        // IR emitted "x" (1 byte) in lieu of "hello" (5 bytes): endpoint-only.
        map.add(Range::new(5, 10), Range::new(20, 21));
        assert_eq!(map.translate(Range::new(20, 21)), Some(Range::new(5, 10)));
    }

    #[test]
    fn empty_range_insertion_point() {
        let mut map = SourceMap::new();
        map.add(Range::new(5, 10), Range::new(20, 25));
        assert_eq!(map.translate(Range::new(20, 20)), Some(Range::point(5)));
    }

    #[test]
    fn relative_lookup_inside_length_preserving_entry() {
        let mut map = SourceMap::new();
        // length-preserving: dest [100,110) <- origin [0,10)
        map.add(Range::new(0, 10), Range::new(100, 110));
        assert_eq!(map.translate(Range::new(102, 105)), Some(Range::new(2, 5)));
    }

    #[test]
    fn spanning_across_two_length_preserving_entries() {
        let mut map = SourceMap::new();
        map.add(Range::new(0, 5), Range::new(100, 105));
        map.add(Range::new(10, 15), Range::new(105, 110));
        // A range that starts in the first entry and ends in the second.
        let got = map.translate(Range::new(103, 108)).unwrap();
        assert_eq!(got.begin, 3);
        assert_eq!(got.end, 13);
    }

    #[test]
    fn untranslatable_returns_none() {
        let map = SourceMap::new();
        assert_eq!(map.translate(Range::new(0, 1)), None);
    }

    #[test]
    fn round_trip_property_for_length_preserving_entries() {
        let mut map = SourceMap::new();
        map.add(Range::new(7, 20), Range::new(200, 213));
        for b in 200..213 {
            for e in b..=213 {
                let sub = Range::new(b, e);
                let translated = map.translate(sub).unwrap();
                let delta = 7isize - 200isize;
                assert_eq!(translated, sub.shift(delta));
            }
        }
    }
}
