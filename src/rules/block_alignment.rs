//! `Layout/BlockAlignment` (spec §4.1, §4.3, §6): a `do...end` or `{...}`
//! block's closer should align with its opener.
//!
//! Scoped to [`super::scan::BlockKind::Do`] and `::Brace` only — bare
//! `begin...end` is [`super::begin_end_alignment`]'s concern and keyword
//! forms (`if`/`unless`/...) are [`super::end_alignment`]'s, so the same
//! opener/closer pair is never reported twice.
//!
//! This rule produces raw IR-line pairs only; [`super::block_alignment_adapter`]
//! does the coordinate and message translation spec §4.3 calls for.

use super::scan::{ir_lines, leading_ws_len, scan_blocks, BlockKind};
use crate::config::Config;
use crate::ir::Ir;

pub(crate) struct RawAlignment {
    pub opener_point: usize,
    pub closer_point: usize,
}

pub(crate) fn check(ir: &Ir, _config: &Config) -> Vec<RawAlignment> {
    let text = ir.text();
    let lines = ir_lines(text);
    let blocks = scan_blocks(text);

    blocks
        .iter()
        .filter(|b| matches!(b.kind, BlockKind::Do | BlockKind::Brace))
        .filter_map(|b| {
            let (open_offset, open_text) = lines[b.open_line];
            let (close_offset, close_text) = lines[b.close_line];
            let open_indent = leading_ws_len(open_text);
            let close_indent = leading_ws_len(close_text);
            if open_indent == close_indent {
                return None;
            }
            Some(RawAlignment {
                opener_point: open_offset + open_indent,
                closer_point: close_offset + close_indent,
            })
        })
        .collect()
}
