//! `Layout/IndentationConsistency`: sibling lines at the same nesting depth
//! should share the exact same leading-whitespace bytes, not merely the
//! same column count (catches mixed tabs/spaces that [`super::indentation_width`]
//! alone wouldn't, since it only compares counts).

use super::scan::{
    innermost_enclosing, ir_lines, is_any_closer, is_attribute_token_line, leading_ws_len, scan_blocks,
    translate_with_fallback,
};
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

    for block in &blocks {
        let mut reference: Option<&str> = None;
        for line_no in (block.open_line + 1)..block.close_line {
            let (offset, line_text) = lines[line_no];
            let trimmed = line_text.trim();
            if trimmed.is_empty() || is_attribute_token_line(trimmed) {
                continue;
            }
            if is_any_closer(&blocks, line_no) {
                continue;
            }
            // Only compare lines belonging directly to this block, not ones
            // nested one level deeper inside a child block.
            let directly_owned = innermost_enclosing(&blocks, line_no)
                .map(|b| (b.open_line, b.close_line))
                == Some((block.open_line, block.close_line));
            if !directly_owned {
                continue;
            }

            let indent = &line_text[..leading_ws_len(line_text)];
            match reference {
                None => reference = Some(indent),
                Some(r) if r == indent => {}
                Some(_) => {
                    let range = Range::new(offset, offset + indent.len());
                    let Some(src_range) = translate_with_fallback(ir, range) else {
                        continue;
                    };
                    raws.push(RawOffense {
                        range: src_range,
                        message: "Layout/IndentationConsistency: Inconsistent indentation detected."
                            .to_string(),
                        severity: Severity::Convention,
                        correction: None,
                    });
                }
            }
        }
    }

    raws
}
