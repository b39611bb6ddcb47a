//! A hand-written scanner from template bytes to [`ast::Node`] trees.
//!
//! The ERB lexer/parser proper is an external collaborator (spec §1); this is
//! the minimal stand-in needed to exercise [`crate::transpiler`] end to end in
//! this crate's own test suite. Grounded on `quarto-doctemplate::parser`'s
//! traversal style — match-on-byte, recursive descent, explicit cursor — but
//! without a grammar library, since the grammar here is small enough for a
//! direct scan.

use crate::ast::{
    Attribute, ClosingTag, Comment, Document, Embedded, Indicator, Literal, Node, Tag, TagForm,
    Text, TextPart,
};
use crate::source::Range;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_space_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Accumulates literal text and embedded children into a single [`Text`] node.
struct TextAccumulator {
    parts: Vec<TextPart>,
    start: Option<usize>,
    end: usize,
}

impl TextAccumulator {
    fn new(pos: usize) -> Self {
        Self {
            parts: Vec::new(),
            start: None,
            end: pos,
        }
    }

    fn push_literal(&mut self, src: &[u8], begin: usize, end: usize) {
        if begin >= end {
            return;
        }
        let text = String::from_utf8_lossy(&src[begin..end]).into_owned();
        if self.start.is_none() {
            self.start = Some(begin);
        }
        self.parts.push(TextPart::Literal(Literal {
            text,
            range: Range::new(begin, end),
        }));
        self.end = end;
    }

    fn push_embedded(&mut self, embedded: Embedded) {
        if self.start.is_none() {
            self.start = Some(embedded.range.begin);
        }
        self.end = embedded.range.end;
        self.parts.push(TextPart::Embedded(embedded));
    }

    fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn take_node(&mut self) -> Option<Node> {
        if self.parts.is_empty() {
            return None;
        }
        let range = Range::new(self.start.take().unwrap(), self.end);
        Some(Node::Text(Text {
            range,
            parts: std::mem::take(&mut self.parts),
        }))
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn at(&self, needle: &str) -> bool {
        self.src[self.pos..].starts_with(needle.as_bytes())
    }

    fn skip_ws(&mut self) {
        while !self.eof() && is_space_byte(self.src[self.pos]) {
            self.pos += 1;
        }
    }

    fn find(&self, needle: &str) -> Option<usize> {
        let needle = needle.as_bytes();
        self.src[self.pos..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|i| self.pos + i)
    }

    /// Whether only whitespace-then-newline follows the cursor (peek only).
    fn peek_whitespace_then_newline(&self) -> bool {
        let mut i = self.pos;
        while i < self.src.len() && matches!(self.src[i], b' ' | b'\t') {
            i += 1;
        }
        i < self.src.len() && self.src[i] == b'\n'
    }

    fn consume_closing_tag(&mut self) -> (String, Range) {
        let start = self.pos;
        self.pos += 2; // "</"
        let name_start = self.pos;
        while !self.eof() && is_name_byte(self.src[self.pos]) {
            self.pos += 1;
        }
        let name = String::from_utf8_lossy(&self.src[name_start..self.pos]).into_owned();
        self.skip_ws();
        if self.at(">") {
            self.pos += 1;
        }
        (name, Range::new(start, self.pos))
    }

    fn parse_embedded(&mut self) -> Embedded {
        let start = self.pos;
        self.pos += 2; // "<%"
        let indicator = if self.at("=") {
            self.pos += 1;
            Indicator::Output
        } else if self.at("#") {
            self.pos += 1;
            Indicator::Comment
        } else {
            Indicator::None
        };
        let code_start = self.pos;
        let code_end = self.find("%>").unwrap_or(self.src.len());
        let code = String::from_utf8_lossy(&self.src[code_start..code_end]).into_owned();
        let code_range = Range::new(code_start, code_end);
        self.pos = code_end;
        if self.at("%>") {
            self.pos += 2;
        }
        let tag_ends_on_newline = self.peek_whitespace_then_newline();
        Embedded {
            range: Range::new(start, self.pos),
            indicator,
            code,
            code_range,
            tag_ends_on_newline,
        }
    }

    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attrs = Vec::new();
        loop {
            self.skip_ws();
            if self.eof() {
                break;
            }
            let b = self.src[self.pos];
            if b == b'>' || self.at("/>") {
                break;
            }
            let attr_start = self.pos;
            while !self.eof() && !matches!(self.src[self.pos], b'=' | b'>' | b'/') && !is_space_byte(self.src[self.pos]) {
                self.pos += 1;
            }
            if self.pos == attr_start {
                // Unexpected byte (stray '/', stray '='); skip it to avoid looping forever.
                self.pos += 1;
                continue;
            }
            if self.at("=") {
                self.pos += 1;
                if self.at("\"") || self.at("'") {
                    let quote = self.src[self.pos];
                    self.pos += 1;
                    while !self.eof() && self.src[self.pos] != quote {
                        self.pos += 1;
                    }
                    if !self.eof() {
                        self.pos += 1;
                    }
                } else {
                    while !self.eof() && !matches!(self.src[self.pos], b'>' | b'/') && !is_space_byte(self.src[self.pos]) {
                        self.pos += 1;
                    }
                }
            }
            attrs.push(Attribute {
                range: Range::new(attr_start, self.pos),
            });
        }
        attrs
    }

    fn parse_tag(&mut self) -> Tag {
        let start = self.pos;
        self.pos += 1; // '<'
        let name_start = self.pos;
        while !self.eof() && is_name_byte(self.src[self.pos]) {
            self.pos += 1;
        }
        let name = String::from_utf8_lossy(&self.src[name_start..self.pos]).into_owned();
        let name_range = Range::new(start, self.pos);

        let attrs = self.parse_attributes();
        self.skip_ws();

        if self.at("/>") {
            self.pos += 2;
            let open_tag_range = Range::new(start, self.pos);
            return Tag {
                range: open_tag_range,
                name,
                name_range,
                attrs,
                open_tag_range,
                children: Vec::new(),
                close_tag_range: None,
                form: TagForm::SelfClosing,
            };
        }

        if self.at(">") {
            self.pos += 1;
        }
        let open_tag_range = Range::new(start, self.pos);

        if is_void_element(&name) {
            return Tag {
                range: open_tag_range,
                name,
                name_range,
                attrs,
                open_tag_range,
                children: Vec::new(),
                close_tag_range: None,
                form: TagForm::Void,
            };
        }

        let (children, matched_close) = self.parse_children(Some(name.as_str()));
        let (range, close_tag_range) = match matched_close {
            Some(close_range) => (Range::new(start, close_range.end), Some(close_range)),
            None => (Range::new(start, self.pos), None),
        };
        Tag {
            range,
            name,
            name_range,
            attrs,
            open_tag_range,
            children,
            close_tag_range,
            form: TagForm::Normal,
        }
    }

    /// Parse a run of children until EOF or a closing tag matching `stop_name`.
    /// Stray closing tags that don't match `stop_name` are tolerated (spec §7)
    /// and surface as [`Node::ClosingTag`].
    fn parse_children(&mut self, stop_name: Option<&str>) -> (Vec<Node>, Option<Range>) {
        let mut children = Vec::new();
        let mut text = TextAccumulator::new(self.pos);
        let mut literal_start = self.pos;
        let mut matched_close = None;

        loop {
            if self.eof() {
                break;
            }

            if self.at("</") {
                text.push_literal(self.src, literal_start, self.pos);
                let (name, close_range) = self.consume_closing_tag();
                if stop_name == Some(name.as_str()) {
                    matched_close = Some(close_range);
                    break;
                }
                if let Some(node) = text.take_node() {
                    children.push(node);
                }
                children.push(Node::ClosingTag(ClosingTag {
                    range: close_range,
                    name,
                }));
                literal_start = self.pos;
                continue;
            }

            if self.at("<%") {
                text.push_literal(self.src, literal_start, self.pos);
                let embedded = self.parse_embedded();
                // A comment tag is "outside text" (and becomes a standalone
                // Comment node) only when nothing has been accumulated into
                // the current text run yet; otherwise it's an embedded
                // comment mixed into the surrounding prose.
                if matches!(embedded.indicator, Indicator::Comment) && text.is_empty() {
                    children.push(Node::Comment(Comment {
                        range: embedded.range,
                        text: embedded.code.clone(),
                    }));
                } else {
                    text.push_embedded(embedded);
                }
                literal_start = self.pos;
                continue;
            }

            if self.pos + 1 < self.src.len()
                && self.src[self.pos] == b'<'
                && self.src[self.pos + 1].is_ascii_alphabetic()
            {
                text.push_literal(self.src, literal_start, self.pos);
                if let Some(node) = text.take_node() {
                    children.push(node);
                }
                let tag = self.parse_tag();
                literal_start = self.pos;
                children.push(Node::Tag(tag));
                continue;
            }

            self.pos += 1;
        }

        text.push_literal(self.src, literal_start, self.pos);
        if let Some(node) = text.take_node() {
            children.push(node);
        }

        (children, matched_close)
    }
}

/// Parse a whole template into a [`Document`].
pub fn parse(source: &[u8]) -> Document {
    let mut parser = Parser { src: source, pos: 0 };
    let (children, _) = parser.parse_children(None);
    Document {
        range: Range::new(0, source.len()),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag<'a>(doc: &'a Document, i: usize) -> &'a Tag {
        match &doc.children[i] {
            Node::Tag(t) => t,
            other => panic!("expected Tag, got {other:?}"),
        }
    }

    #[test]
    fn parses_simple_nested_elements() {
        let doc = parse(b"<div>\n  <span class=\"foo\">bar</span>\n</div>\n");
        assert_eq!(doc.children.len(), 1);
        let div = tag(&doc, 0);
        assert_eq!(div.name, "div");
        assert_eq!(div.form, TagForm::Normal);
        assert!(div.close_tag_range.is_some());
    }

    #[test]
    fn parses_void_element_without_close() {
        let doc = parse(b"<div><br></div>");
        let div = tag(&doc, 0);
        let br = div
            .children
            .iter()
            .find_map(|n| match n {
                Node::Tag(t) if t.name == "br" => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(br.form, TagForm::Void);
        assert!(br.close_tag_range.is_none());
    }

    #[test]
    fn tolerates_stray_void_close() {
        let doc = parse(b"<div><br></br></div>");
        let div = tag(&doc, 0);
        let has_stray = div
            .children
            .iter()
            .any(|n| matches!(n, Node::ClosingTag(c) if c.name == "br"));
        assert!(has_stray);
    }

    #[test]
    fn parses_self_closing_tag() {
        let doc = parse(b"<input type=\"text\"/>");
        let t = tag(&doc, 0);
        assert_eq!(t.form, TagForm::SelfClosing);
        assert_eq!(t.attrs.len(), 1);
    }

    #[test]
    fn parses_embedded_output_tag() {
        let doc = parse(b"<%= hello_world %>");
        match &doc.children[0] {
            Node::Text(text) => match &text.parts[0] {
                TextPart::Embedded(e) => {
                    assert_eq!(e.indicator, Indicator::Output);
                    assert_eq!(e.code, " hello_world ");
                }
                other => panic!("expected embedded part, got {other:?}"),
            },
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn standalone_comment_on_its_own_line_becomes_comment_node() {
        let doc = parse(b"<%# a note %>\n<div></div>");
        assert!(matches!(doc.children[0], Node::Comment(_)));
    }

    #[test]
    fn inline_comment_after_text_becomes_embedded_part() {
        let doc = parse(b"hello <%# note %> world");
        match &doc.children[0] {
            Node::Text(text) => {
                let has_embedded_comment = text
                    .parts
                    .iter()
                    .any(|p| matches!(p, TextPart::Embedded(e) if e.indicator == Indicator::Comment));
                assert!(has_embedded_comment);
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn pre_contains_embedded_child_for_opacity_test() {
        let doc = parse(b"<pre>\n<%= foo %>\n</pre>\n");
        let pre = tag(&doc, 0);
        assert_eq!(pre.name, "pre");
        assert!(!pre.children.is_empty());
    }

    #[test]
    fn multiline_attribute_list() {
        let doc = parse(
            b"<span>\n  <a class=\"class1 class2\"\n    href=\"foo\"\n    target=\"_blank\">\n    Link text\n  </a>\n</span>\n",
        );
        let span = tag(&doc, 0);
        let a = span
            .children
            .iter()
            .find_map(|n| match n {
                Node::Tag(t) if t.name == "a" => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(a.attrs.len(), 3);
    }
}
