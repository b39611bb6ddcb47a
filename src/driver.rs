//! The linter driver (spec §4.4): parses, transpiles, runs the rule team,
//! and hands back offenses already translated to original-source
//! coordinates. Grounded on `quarto-lsp-core`'s top-level "run diagnostics
//! over a document" entry point — the thing a caller actually invokes,
//! wiring together the parser, the transpiler, and the rule team.

use crate::ast::Document;
use crate::config::Config;
use crate::diagnostics::Offense;
use crate::erb_parser;
use crate::ir::Ir;
use crate::rules;
use crate::source::SourceModel;
use crate::transpiler;

/// Run the full pipeline over `source_bytes` with `config`, returning every
/// offense the rule team reports, translated back to the original source.
pub fn run(source_bytes: &[u8], config: &Config) -> Vec<Offense> {
    let doc = erb_parser::parse(source_bytes);
    let ir = transpiler::transpile(SourceModel::new(source_bytes.to_vec()), &doc);
    run_with(&doc, &ir, config)
}

/// Same as [`run`], but reuses an already-parsed document and IR — useful
/// for callers (and tests) that need both the diagnostics and the
/// intermediate artifacts without transpiling twice.
pub fn run_with(doc: &Document, ir: &Ir, config: &Config) -> Vec<Offense> {
    let mut offenses = Vec::new();

    offenses.extend(rules::indentation_width::check(ir, config).into_iter().map(Offense::from));
    offenses.extend(
        rules::indentation_consistency::check(ir, config)
            .into_iter()
            .map(Offense::from),
    );
    offenses.extend(
        rules::block_alignment::check(ir, config)
            .iter()
            .filter_map(|raw| rules::block_alignment_adapter::adapt(raw, ir)),
    );
    offenses.extend(
        rules::begin_end_alignment::check(ir, config)
            .into_iter()
            .map(Offense::from),
    );
    offenses.extend(rules::end_alignment::check(ir, config).into_iter().map(Offense::from));
    offenses.extend(rules::else_alignment::check(ir, config).into_iter().map(Offense::from));
    offenses.extend(rules::argument_alignment::check(doc, ir.source(), config));

    offenses
}

/// Apply every offense's correction (if any) against `source_bytes`,
/// producing corrected source. Actions are applied in descending location
/// order so an edit never shifts the range of one still to be applied,
/// since every range was computed against the original buffer.
pub fn apply_corrections(source_bytes: &[u8], offenses: &[Offense]) -> Vec<u8> {
    let mut corrections: Vec<&crate::diagnostics::Action> = offenses
        .iter()
        .filter_map(|o| o.correction.as_ref())
        .flat_map(|c| c.actions.iter())
        .collect();
    corrections.sort_by_key(|a| std::cmp::Reverse(a.range().begin));

    let mut buffer = source_bytes.to_vec();
    for action in corrections {
        action.apply(&mut buffer);
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Action, Correction, Severity};
    use crate::source::Range;

    #[test]
    fn corrections_at_different_offsets_do_not_shift_each_other() {
        let src = b"aaaa bbbb cccc".to_vec();
        let offenses = vec![
            Offense::new(Range::point(0), "first", Severity::Convention).with_correction(Correction {
                actions: vec![Action::Replace {
                    range: Range::new(0, 4),
                    text: "x".into(),
                }],
            }),
            Offense::new(Range::point(10), "second", Severity::Convention).with_correction(Correction {
                actions: vec![Action::Replace {
                    range: Range::new(10, 14),
                    text: "y".into(),
                }],
            }),
        ];
        let corrected = apply_corrections(&src, &offenses);
        assert_eq!(corrected, b"x bbbb y".to_vec());
    }

    #[test]
    fn offenses_without_corrections_are_ignored() {
        let src = b"hello".to_vec();
        let offenses = vec![Offense::new(Range::point(0), "no fix", Severity::Convention)];
        assert_eq!(apply_corrections(&src, &offenses), src);
    }
}
