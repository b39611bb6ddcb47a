//! End-to-end scenarios (worked examples from spec §8) plus a handful of the
//! testable-property invariants from the same section.

use erb_indent::config::Config;
use erb_indent::driver;
use erb_indent::source::Range;

fn offenses(src: &[u8]) -> Vec<erb_indent::Offense> {
    driver::run(src, &Config::default())
}

#[test]
fn s1_already_valid_html_has_no_offenses() {
    let src = b"<div>\n  <span class=\"foo\">bar</span>\n  <%= hello_world %>\n</div>\n";
    let found = offenses(src);
    assert!(found.is_empty(), "expected no offenses, got {found:?}");

    let corrected = driver::apply_corrections(src, &found);
    assert_eq!(corrected, src);
}

#[test]
fn s2_html_child_over_indented() {
    let src = b"<div>\n   <span class=\"foo\">bar</span>\n</div>\n";
    let found = offenses(src);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].location, Range::new(6, 9));
    assert_eq!(
        found[0].message,
        "Layout/IndentationWidth: Use 2 (not 3) spaces for indentation."
    );
    assert_eq!(found[0].severity, erb_indent::Severity::Convention);

    let corrected = driver::apply_corrections(src, &found);
    assert_eq!(
        corrected,
        b"<div>\n  <span class=\"foo\">bar</span>\n</div>\n".to_vec()
    );
}

#[test]
fn s3_embedded_block_child_over_indented() {
    let src = b"<div>\n  <% 10.times do |i| %>\n     <%= i %>\n  <% end %>\n</div>\n";
    let found = offenses(src);
    assert_eq!(found.len(), 1, "expected one offense, got {found:?}");
    assert_eq!(found[0].location, Range::new(32, 35));
    assert_eq!(
        found[0].message,
        "Layout/IndentationWidth: Use 2 (not 3) spaces for indentation."
    );
}

#[test]
fn s4_block_end_misaligned() {
    let src = b"<div>\n  <% 10.times do |i| %>\n    <%= i %>\n    <% end %>\n</div>\n";
    let found = offenses(src);
    assert_eq!(found.len(), 2, "expected two offenses, got {found:?}");

    let width_offense = found
        .iter()
        .find(|o| o.message.starts_with("Layout/IndentationWidth"))
        .expect("an IndentationWidth offense");
    assert_eq!(width_offense.location, Range::new(34, 34));
    assert_eq!(
        width_offense.message,
        "Layout/IndentationWidth: Use 2 (not 0) spaces for indentation."
    );

    let alignment_offense = found
        .iter()
        .find(|o| o.message.starts_with("Layout/BlockAlignment"))
        .expect("a BlockAlignment offense");
    assert_eq!(alignment_offense.location, Range::new(47, 56));
    assert_eq!(
        alignment_offense.message,
        "Layout/BlockAlignment: `<% end %>` at 4, 4 is not aligned with `<% 10.times do |i| %>` at 2, 2."
    );
}

#[test]
fn s5_multiline_attribute_alignment() {
    let src = b"<span>\n  <a class=\"class1 class2\"\n    href=\"foo\"\n    target=\"_blank\">\n    Link text\n  </a>\n</span>\n";
    let found = offenses(src);
    let arg_offenses: Vec<_> = found
        .iter()
        .filter(|o| o.message.starts_with("Layout/ArgumentAlignment"))
        .collect();
    assert_eq!(arg_offenses.len(), 2, "expected two offenses, got {found:?}");

    let corrected = driver::apply_corrections(src, &found);
    let corrected_text = String::from_utf8(corrected).unwrap();
    let column_of = |needle: &str| {
        let byte_offset = corrected_text.find(needle).unwrap();
        let line_start = corrected_text[..byte_offset].rfind('\n').map_or(0, |p| p + 1);
        byte_offset - line_start
    };
    assert_eq!(column_of("href="), column_of("class="));
    assert_eq!(column_of("target="), column_of("class="));
}

#[test]
fn s6_pre_opacity_reports_nothing() {
    let src = b"<pre>\n<%= foo %>\n</pre>\n";
    assert!(offenses(src).is_empty());
}

#[test]
fn range_soundness_every_offense_is_in_bounds() {
    let src = b"<div>\n   <span class=\"foo\">bar</span>\n</div>\n";
    for offense in offenses(src) {
        assert!(offense.location.begin <= offense.location.end);
        assert!(offense.location.end <= src.len());
    }
}

#[test]
fn idempotence_second_pass_is_clean() {
    let src = b"<div>\n   <span class=\"foo\">bar</span>\n</div>\n";
    let first_pass = offenses(src);
    let corrected = driver::apply_corrections(src, &first_pass);
    let second_pass = offenses(&corrected);
    assert!(
        second_pass.is_empty(),
        "expected a clean second pass, got {second_pass:?}"
    );
}

#[test]
fn tolerance_for_stray_void_closes() {
    let with_stray = b"<div>\n  <br></br>\n</div>\n";
    let without_stray = b"<div>\n  <br>\n</div>\n";
    assert_eq!(offenses(with_stray), offenses(without_stray));
}
