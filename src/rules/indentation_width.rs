//! `Layout/IndentationWidth` (spec §4.1, §6): every line nested inside a
//! block should sit exactly `width` columns past the indentation of the
//! line that closes that block.
//!
//! Grounded on the worked examples in spec §8 (S2-S4): the comparison base
//! is the *closer's* line indentation, not the opener's — a line can be
//! correctly indented relative to where its block ends even when the
//! opener itself sits at a different column (see [`block_alignment`] for
//! that separate concern).

use super::scan::{
    innermost_enclosing, ir_lines, is_any_closer, is_attribute_token_line, leading_ws_len, scan_blocks,
    translate_with_fallback,
};
use super::RawOffense;
use crate::config::Config;
use crate::diagnostics::{Action, Correction, Severity};
use crate::ir::Ir;
use crate::source::Range;

pub(crate) fn check(ir: &Ir, config: &Config) -> Vec<RawOffense> {
    let text = ir.text();
    let lines = ir_lines(text);
    let blocks = scan_blocks(text);
    let width = config.width as i64;

    let mut raws = Vec::new();

    for line_no in 0..lines.len() {
        let Some(block) = innermost_enclosing(&blocks, line_no) else {
            continue;
        };
        if line_no <= block.open_line || line_no >= block.close_line {
            continue;
        }
        if is_any_closer(&blocks, line_no) {
            continue;
        }
        let (line_offset, line_text) = lines[line_no];
        let trimmed = line_text.trim();
        if trimmed.is_empty() || is_attribute_token_line(trimmed) {
            continue;
        }

        let actual = leading_ws_len(line_text) as i64;
        let (_, closer_text) = lines[block.close_line];
        let base = leading_ws_len(closer_text) as i64;
        let diff = actual - base;
        if diff == width {
            continue;
        }

        let range = if diff > 0 {
            Range::new(line_offset + base as usize, line_offset + actual as usize)
        } else {
            Range::point(line_offset + base as usize)
        };
        let Some(src_range) = translate_with_fallback(ir, range) else {
            continue;
        };

        let message = format!(
            "Layout/IndentationWidth: Use {} (not {}) spaces for indentation.",
            config.width, diff
        );

        let correction_range = Range::new(line_offset, line_offset + actual as usize);
        let correction = translate_with_fallback(ir, correction_range).map(|src_range| Correction {
            actions: vec![Action::Replace {
                range: src_range,
                text: " ".repeat((base + width).max(0) as usize),
            }],
        });

        raws.push(RawOffense {
            range: src_range,
            message,
            severity: Severity::Convention,
            correction,
        });
    }

    raws
}
