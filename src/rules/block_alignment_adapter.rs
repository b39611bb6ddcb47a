//! Rewrites [`block_alignment`]'s raw IR-line pairs into a final offense in
//! original-source coordinates, with the original (stripped) source lines
//! quoted in the message (spec §4.3) — grounded on
//! `quarto-lsp-core::diagnostics::convert_diagnostic`, which performs the
//! analogous job of turning a tool's internal-coordinate diagnostic into one
//! a client can show against the file the user actually wrote.
//!
//! The host rule's own message embeds *its* line/column numbers; the two
//! `map.add` calls `transpile_embedded` makes per tag put the whole-tag
//! endpoint entry before the code-body entry, so `translate_beginning` on an
//! opener/closer's first non-whitespace offset resolves to the original
//! `<%`/tag position, not into the trimmed code past it.

use super::block_alignment::RawAlignment;
use super::scan::trimmed_line_range_and_text;
use crate::diagnostics::{Offense, Severity};
use crate::ir::Ir;

pub(crate) fn adapt(raw: &RawAlignment, ir: &Ir) -> Option<Offense> {
    let opener_origin = ir.map().translate_beginning(raw.opener_point)?;
    let closer_origin = ir.map().translate_beginning(raw.closer_point)?;
    let opener_loc = ir.source().location(opener_origin)?;
    let closer_loc = ir.source().location(closer_origin)?;

    let (_, opener_text) = trimmed_line_range_and_text(ir.source(), opener_loc.line);
    let (closer_range, closer_text) = trimmed_line_range_and_text(ir.source(), closer_loc.line);

    let message = format!(
        "Layout/BlockAlignment: `{}` at {}, {} is not aligned with `{}` at {}, {}.",
        closer_text, closer_loc.line, closer_loc.column, opener_text, opener_loc.line, opener_loc.column
    );

    Some(Offense::new(closer_range, message, Severity::Convention))
}
