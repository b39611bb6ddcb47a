//! A line-oriented block-nesting scanner shared by the alignment rules
//! (spec §4.1's IR vocabulary: brace blocks from tag emission, `do`/`begin`
//! blocks and bare keyword blocks from verbatim embedded code, all closed by
//! `end` except brace blocks, closed by `}`).
//!
//! The IR has no parser of its own — tag braces are synthesized, but
//! embedded code is copied verbatim, so anything a template author wrote
//! (`if`, `unless`, `case`, a `do |i|` block) shows up as plain text. This
//! scanner recovers just enough structure to compare an opener's line
//! against its closer's: a single word-boundary pass per line, no real
//! Ruby grammar.

use crate::ir::Ir;
use crate::source::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Brace,
    Do,
    Begin,
    Keyword,
}

#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub kind: BlockKind,
    pub open_line: usize,
    pub close_line: usize,
}

struct Frame {
    kind: BlockKind,
    line: usize,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// A standalone `do` (optionally `do |args|`) ending the line, the way a
/// block-opening call reads once its trimmed code lands in the IR verbatim.
fn trailing_do(line: &str) -> bool {
    let bytes = line.as_bytes();
    let mut search_from = 0;
    while let Some(rel) = line[search_from..].find("do") {
        let abs = search_from + rel;
        let before_ok = abs == 0 || !is_word_byte(bytes[abs - 1]);
        let after = abs + 2;
        let after_ok = after >= bytes.len() || !is_word_byte(bytes[after]);
        if before_ok && after_ok {
            let rest = line[after..].trim();
            if rest.is_empty() || (rest.starts_with('|') && rest.ends_with('|') && rest.len() > 1) {
                return true;
            }
        }
        search_from = abs + 2;
    }
    false
}

fn word_at(line: &str, word: &str) -> bool {
    let bytes = line.as_bytes();
    let mut search_from = 0;
    while let Some(rel) = line[search_from..].find(word) {
        let abs = search_from + rel;
        let before_ok = abs == 0 || !is_word_byte(bytes[abs - 1]);
        let after = abs + word.len();
        let after_ok = after >= bytes.len() || !is_word_byte(bytes[after]);
        if before_ok && after_ok {
            return true;
        }
        search_from = abs + word.len();
    }
    false
}

fn starts_with_word(trimmed: &str, word: &str) -> bool {
    trimmed.strip_prefix(word).map_or(false, |rest| {
        rest.chars().next().map_or(true, |c| !c.is_alphanumeric() && c != '_')
    })
}

const CONDITIONAL_OPENERS: &[&str] = &["if", "unless", "while", "until"];
const UNCONDITIONAL_OPENERS: &[&str] = &["class", "module", "def"];

/// Byte offset and content of each physical line of `text` (no trailing `\n`).
pub fn ir_lines(text: &str) -> Vec<(usize, &str)> {
    let mut result = Vec::new();
    let mut offset = 0;
    for line in text.split('\n') {
        result.push((offset, line));
        offset += line.len() + 1;
    }
    result
}

pub fn leading_ws_len(line: &str) -> usize {
    line.len() - line.trim_start_matches(|c| c == ' ' || c == '\t').len()
}

/// Whether `trimmed` is exactly an attribute token (`line` repeated some
/// number of times, optionally comma-terminated) — what `transpile_attrs`
/// emits for each attribute. Attribute columns are [`super::argument_alignment`]'s
/// concern, checked directly against the AST; the width/consistency rules
/// skip these lines so the two don't fight over the same leading whitespace.
pub fn is_attribute_token_line(trimmed: &str) -> bool {
    let core = trimmed.strip_suffix(',').unwrap_or(trimmed);
    !core.is_empty() && core.len() % 4 == 0 && core.as_bytes().chunks(4).all(|c| c == b"line")
}

/// Scan balanced blocks out of `text`, in source order. Comment lines
/// (`#...`, the form both `__comment;` markers and inline `<%# %>` code
/// never produce on their own line — this guards the general case) are
/// skipped entirely so stray braces or keywords inside them don't corrupt
/// nesting. Unbalanced input is tolerated: unmatched frames are dropped.
pub fn scan_blocks(text: &str) -> Vec<Block> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut blocks = Vec::new();

    for (line_no, line) in text.split('\n').enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            continue;
        }

        if CONDITIONAL_OPENERS.iter().any(|kw| starts_with_word(trimmed, kw)) {
            stack.push(Frame {
                kind: BlockKind::Keyword,
                line: line_no,
            });
        }

        for kw in UNCONDITIONAL_OPENERS {
            if word_at(line, kw) {
                stack.push(Frame {
                    kind: BlockKind::Keyword,
                    line: line_no,
                });
            }
        }

        if word_at(line, "begin") {
            stack.push(Frame {
                kind: BlockKind::Begin,
                line: line_no,
            });
        }

        if trailing_do(line) {
            stack.push(Frame {
                kind: BlockKind::Do,
                line: line_no,
            });
        }

        for ch in line.chars() {
            if ch == '{' {
                stack.push(Frame {
                    kind: BlockKind::Brace,
                    line: line_no,
                });
            } else if ch == '}' {
                if let Some(pos) = stack.iter().rposition(|f| f.kind == BlockKind::Brace) {
                    let frame = stack.remove(pos);
                    blocks.push(Block {
                        kind: frame.kind,
                        open_line: frame.line,
                        close_line: line_no,
                    });
                }
            }
        }

        if starts_with_word(trimmed, "end") {
            if let Some(pos) = stack.iter().rposition(|f| f.kind != BlockKind::Brace) {
                let frame = stack.remove(pos);
                blocks.push(Block {
                    kind: frame.kind,
                    open_line: frame.line,
                    close_line: line_no,
                });
            }
        }
    }

    blocks
}

/// The block most tightly wrapping `line_no` (smallest span containing it
/// strictly between its opener and closer).
pub fn innermost_enclosing(blocks: &[Block], line_no: usize) -> Option<&Block> {
    blocks
        .iter()
        .filter(|b| b.open_line < line_no && line_no < b.close_line)
        .min_by_key(|b| b.close_line - b.open_line)
}

/// Whether `line_no` closes any block at all, not just the one
/// `innermost_enclosing` would pick for some other line. A closing line is
/// never a body statement of whatever textually encloses the block it
/// closes, however deeply nested that block is.
pub fn is_any_closer(blocks: &[Block], line_no: usize) -> bool {
    blocks.iter().any(|b| b.close_line == line_no)
}

/// Translate an IR range back to source, falling back to a point at its
/// translated beginning when the full range doesn't resolve (spec §4.4 step 5).
pub fn translate_with_fallback(ir: &Ir, range: Range) -> Option<Range> {
    if let Some(r) = ir.translate(range) {
        return Some(r);
    }
    ir.map().translate_beginning(range.begin).map(Range::point)
}

/// The trimmed text and range of 1-indexed source `line`, used by rules that
/// quote the offending original line in their message.
pub fn trimmed_line_range_and_text(source: &crate::source::SourceModel, line: usize) -> (Range, String) {
    let Some(start) = source.line_start(line) else {
        return (Range::point(0), String::new());
    };
    let bytes = source.bytes();
    let mut end = start;
    while end < bytes.len() && bytes[end] != b'\n' {
        end += 1;
    }
    let raw = String::from_utf8_lossy(&bytes[start..end]);
    let lead = raw.len() - raw.trim_start().len();
    let trail = raw.len() - raw.trim_end().len();
    let range = Range::new(start + lead, end - trail);
    (range, raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_a_brace_block() {
        let text = "div {\n  span;\n};\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Brace);
        assert_eq!(blocks[0].open_line, 0);
        assert_eq!(blocks[0].close_line, 2);
    }

    #[test]
    fn scans_a_do_block_with_args() {
        let text = "10.times do |i|\n  i\nend\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Do);
        assert_eq!(blocks[0].open_line, 0);
        assert_eq!(blocks[0].close_line, 2);
    }

    #[test]
    fn trailing_modifier_if_is_not_an_opener() {
        let text = "puts 1 if foo\nend\n";
        let blocks = scan_blocks(text);
        assert!(blocks.is_empty());
    }

    #[test]
    fn leading_if_is_an_opener() {
        let text = "if foo\n  bar\nend\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Keyword);
    }

    #[test]
    fn nested_blocks_pick_innermost() {
        let text = "if a\n  if b\n    x\n  end\nend\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 2);
        let inner = innermost_enclosing(&blocks, 2).unwrap();
        assert_eq!(inner.open_line, 1);
        assert_eq!(inner.close_line, 3);
    }

    #[test]
    fn comment_lines_do_not_corrupt_nesting() {
        let text = "if a\n  # end looks like a closer but isn't\n  x\nend\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].close_line, 3);
    }

    #[test]
    fn recognizes_attribute_token_lines() {
        assert!(is_attribute_token_line("line"));
        assert!(is_attribute_token_line("lineline,"));
        assert!(!is_attribute_token_line("linex"));
        assert!(!is_attribute_token_line(""));
        assert!(!is_attribute_token_line("end"));
    }

    #[test]
    fn do_only_recognized_when_trailing() {
        let text = "do_something\nend\n";
        assert!(scan_blocks(text).is_empty());
    }

    #[test]
    fn is_any_closer_catches_an_inner_blocks_closing_line() {
        // "tagt() {" / "  10.times do |i|" / "    i" / "    end" / "};"
        let text = "tagt() {\n  10.times do |i|\n    i\n    end\n};\n";
        let blocks = scan_blocks(text);
        assert_eq!(blocks.len(), 2);
        // line 3 ("    end") closes the Do block but is not itself the
        // close_line of the Brace block (line 4), yet it must still be
        // recognized as *a* closer so the outer block doesn't treat it as
        // one of its own body lines.
        assert!(is_any_closer(&blocks, 3));
        assert!(!is_any_closer(&blocks, 2));
    }
}
