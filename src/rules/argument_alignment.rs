//! `Layout/ArgumentAlignment` (spec §4.1, §6, worked example S5): a tag's
//! attributes, once they span more than one source line, should each start
//! at the same column as the first.
//!
//! Unlike the other rules here, this one never touches the IR: attribute
//! positions are already exact byte ranges in the original AST, and
//! `transpile_attrs` just mirrors whatever gaps it finds rather than
//! reasoning about their alignment — so it's simplest, and most directly
//! grounded, to check the thing template authors actually wrote.

use crate::ast::{Document, Node, Tag};
use crate::config::{ArgumentAlignStyle, Config};
use crate::diagnostics::{Action, Correction, Offense, Severity};
use crate::source::{Range, SourceModel};

pub(crate) fn check(doc: &Document, source: &SourceModel, config: &Config) -> Vec<Offense> {
    let mut offenses = Vec::new();
    walk(&doc.children, source, config, &mut offenses);
    offenses
}

fn walk(nodes: &[Node], source: &SourceModel, config: &Config, offenses: &mut Vec<Offense>) {
    for node in nodes {
        if let Node::Tag(tag) = node {
            check_tag(tag, source, config, offenses);
            walk(&tag.children, source, config, offenses);
        }
    }
}

fn check_tag(tag: &Tag, source: &SourceModel, config: &Config, offenses: &mut Vec<Offense>) {
    if tag.attrs.len() < 2 {
        return;
    }
    let first = &tag.attrs[0];
    let Some(first_loc) = source.location(first.range.begin) else {
        return;
    };
    let spans_multiple_lines = tag.attrs[1..]
        .iter()
        .any(|a| source.location(a.range.begin).map(|l| l.line) != Some(first_loc.line));
    if !spans_multiple_lines {
        return;
    }

    let target_column = match config.enforced_style_argument_alignment {
        ArgumentAlignStyle::WithFirstArgument => first_loc.column,
        ArgumentAlignStyle::WithFixedIndentation => {
            let tag_line = source.location(tag.range.begin).map(|l| l.line).unwrap_or(first_loc.line);
            let tag_line_start = source.line_start(tag_line).unwrap_or(0);
            let bytes = source.bytes();
            let mut i = tag_line_start;
            while i < tag.range.begin && (bytes[i] == b' ' || bytes[i] == b'\t') {
                i += 1;
            }
            (i - tag_line_start) + config.width as usize
        }
    };

    for attr in &tag.attrs[1..] {
        let Some(loc) = source.location(attr.range.begin) else {
            continue;
        };
        if loc.line == first_loc.line || loc.column == target_column {
            continue;
        }
        let Some(line_start) = source.line_start(loc.line) else {
            continue;
        };
        let range = Range::new(line_start, attr.range.begin);
        let message = format!(
            "Layout/ArgumentAlignment: Use {} (not {}) spaces for indentation.",
            target_column, loc.column
        );
        let correction = Correction {
            actions: vec![Action::Replace {
                range,
                text: " ".repeat(target_column),
            }],
        };
        offenses.push(Offense::new(range, message, Severity::Convention).with_correction(correction));
    }
}
