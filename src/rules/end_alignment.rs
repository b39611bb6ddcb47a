//! `Layout/EndAlignment` (spec §4.1, §6): a keyword-form block's `end`
//! (`if`/`unless`/`while`/`until`/`class`/`module`/`def`) should align with
//! its opening keyword. The transpiler never emits these keywords itself,
//! but verbatim embedded code routinely does — a template author writing
//! `<% if cond %> ... <% end %>` leaves "if" as the first word of its IR
//! line via case D, reachable and checked just like any other control flow.

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
    for b in blocks.iter().filter(|b| b.kind == BlockKind::Keyword) {
        let (_, open_text) = lines[b.open_line];
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
            "Layout/EndAlignment: `end` at line {}, column {} is not aligned with the keyword at line {}, column {}.",
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
