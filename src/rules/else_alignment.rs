//! `Layout/ElseAlignment` (spec §4.1, §6): an `else`/`elsif` line should
//! align with the keyword that opened its enclosing block. Reachable
//! whenever a template writes `<% else %>` or `<% elsif ... %>` inside a
//! control-flow or `do`/`begin` block.

use super::scan::{innermost_enclosing, ir_lines, leading_ws_len, scan_blocks, translate_with_fallback};
use super::RawOffense;
use crate::config::Config;
use crate::diagnostics::Severity;
use crate::ir::Ir;
use crate::source::Range;

fn is_else_line(trimmed: &str) -> bool {
    trimmed == "else"
        || trimmed.starts_with("else ")
        || trimmed == "elsif"
        || trimmed.starts_with("elsif ")
}

pub(crate) fn check(ir: &Ir, _config: &Config) -> Vec<RawOffense> {
    let text = ir.text();
    let lines = ir_lines(text);
    let blocks = scan_blocks(text);

    let mut raws = Vec::new();
    for line_no in 0..lines.len() {
        let (offset, line_text) = lines[line_no];
        let trimmed = line_text.trim_start();
        if !is_else_line(trimmed) {
            continue;
        }
        let Some(block) = innermost_enclosing(&blocks, line_no) else {
            continue;
        };
        let (_, open_text) = lines[block.open_line];
        let open_indent = leading_ws_len(open_text);
        let else_indent = leading_ws_len(line_text);
        if else_indent == open_indent {
            continue;
        }

        let range = Range::new(offset + else_indent, offset + line_text.len());
        let Some(src_range) = translate_with_fallback(ir, range) else {
            continue;
        };

        let keyword = trimmed.split_whitespace().next().unwrap_or("else");
        let message = format!(
            "Layout/ElseAlignment: `{}` at line {}, column {} is not aligned with the keyword at line {}, column {}.",
            keyword,
            line_no + 1,
            else_indent,
            block.open_line + 1,
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
