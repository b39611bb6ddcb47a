//! `Layout/BeginEndAlignment` (spec §4.1, §6): a bare `begin...end` block's
//! `end` should align with `begin`. Only reachable when an embedded tag's
//! code is multiline, starts on a newline, and doesn't open a trailing
//! block ([`super::scan::BlockKind::Begin`], built by the transpiler's case
//! B) — rare compared to [`super::block_alignment`]'s `do`/`{` blocks, but
//! structurally identical otherwise.

use super::scan::{ir_lines, leading_ws_len, scan_blocks, translate_with_fallback, BlockKind};
use super::RawOffense;
use crate::config::Config;
use crate::diagnostics::Severity;
use crate::ir::Ir;
use crate::source::Range;

pub(crate) fn check(ir: &Ir, _config: &Config) -> Vec<RawOffense> {
    let text = ir.text();
    let lines = ir_lines(text);
    let blocks = scan_blocks(text);

    let mut raws = Vec::new();
    for b in blocks.iter().filter(|b| b.kind == BlockKind::Begin) {
        let (open_offset, open_text) = lines[b.open_line];
        let (close_offset, close_text) = lines[b.close_line];
        let open_indent = leading_ws_len(open_text);
        let close_indent = leading_ws_len(close_text);
        if open_indent == close_indent {
            continue;
        }

        let range = Range::new(close_offset + close_indent, close_offset + close_indent + 3);
        let Some(src_range) = translate_with_fallback(ir, range) else {
            continue;
        };

        let message = format!(
            "Layout/BeginEndAlignment: `end` at line {}, column {} is not aligned with `begin` at line {}, column {}.",
            b.close_line + 1,
            close_indent,
            b.open_line + 1,
            open_indent
        );

        raws.push(RawOffense {
            range: src_range,
            message,
            severity: Severity::Convention,
            correction: None,
        });
    }
    raws
}
