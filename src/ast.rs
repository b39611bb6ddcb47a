//! The ERB AST consumed by the transpiler (spec §3).
//!
//! Node variants: [`Document`], [`Tag`], [`Embedded`], [`Text`], [`Comment`],
//! plus [`ClosingTag`] for a stray close the parser could not match to an
//! opener (tolerated per spec §7). Every node carries the half-open byte
//! [`Range`] it occupies in the original source.
//!
//! Grounded on `quarto-doctemplate::ast`'s style: a tagged enum of node
//! kinds, dispatch by `match`, no inheritance.

use crate::source::Range;

/// A node in the ERB AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Document(Document),
    Tag(Tag),
    ClosingTag(ClosingTag),
    Text(Text),
    Embedded(Embedded),
    Comment(Comment),
}

impl Node {
    pub fn range(&self) -> Range {
        match self {
            Node::Document(d) => d.range,
            Node::Tag(t) => t.range,
            Node::ClosingTag(c) => c.range,
            Node::Text(t) => t.range,
            Node::Embedded(e) => e.range,
            Node::Comment(c) => c.range,
        }
    }
}

/// The root of the tree: a sequence of top-level children.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub range: Range,
    pub children: Vec<Node>,
}

/// How an element relates to a closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagForm {
    /// `<name attrs>...</name>`, with a matching close.
    Normal,
    /// A void element (`br`, `img`, ...): no children, no close expected.
    Void,
    /// `<name attrs />`.
    SelfClosing,
}

/// A single attribute's full span, e.g. `class="foo"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub range: Range,
}

/// An opening tag, its attributes, and (for [`TagForm::Normal`]) its children
/// and matching close.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// Whole element span: from `<` to the end of the matching close tag
    /// (or the end of the open tag itself for void/self-closing elements).
    pub range: Range,
    pub name: String,
    /// Span of the `<name` prefix, used for same-length token substitution.
    pub name_range: Range,
    pub attrs: Vec<Attribute>,
    /// Span of `<name attrs>` or `<name attrs/>`, the open tag only.
    pub open_tag_range: Range,
    pub children: Vec<Node>,
    /// Span of `</name>`, present only for [`TagForm::Normal`].
    pub close_tag_range: Option<Range>,
    pub form: TagForm,
}

/// A closing tag with no matching opener in the current stack — tolerated,
/// never errors (spec §7).
#[derive(Debug, Clone, PartialEq)]
pub struct ClosingTag {
    pub range: Range,
    pub name: String,
}

/// The indicator character of an embedded code tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// `<% ... %>`
    None,
    /// `<%= ... %>`
    Output,
    /// `<%# ... %>`
    Comment,
}

/// An embedded code tag `<% … %>` that appears inside a [`Text`] run, mixed
/// with literal prose on the same line.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    /// Whole `<% … %>` span, including delimiters.
    pub range: Range,
    pub indicator: Indicator,
    /// The raw code body, exactly as written (its own leading/trailing
    /// whitespace included).
    pub code: String,
    /// Span of `code` within the original source.
    pub code_range: Range,
    /// Whether whitespace-then-newline follows `%>` in the source.
    pub tag_ends_on_newline: bool,
}

impl Embedded {
    pub fn starts_on_newline(&self) -> bool {
        self.code.starts_with('\n')
    }

    pub fn ends_on_newline(&self) -> bool {
        self.code.trim_end_matches(|c: char| c == ' ' || c == '\t')
            .ends_with('\n')
    }

    pub fn is_multiline(&self) -> bool {
        self.code.trim().contains('\n')
    }

    /// Whether the trimmed code ends opening a block (`do`, `do |x|`, `{`).
    pub fn trailing_block(&self) -> bool {
        let trimmed = self.code.trim_end();
        trimmed.ends_with('{')
            || trimmed.ends_with("do")
            || trailing_do_with_block_args(trimmed)
    }
}

fn trailing_do_with_block_args(trimmed: &str) -> bool {
    // matches a trailing `do |args|`
    if let Some(pipe_end) = trimmed.rfind('|') {
        let before = &trimmed[..pipe_end];
        if let Some(pipe_start) = before.rfind('|') {
            let head = trimmed[..pipe_start].trim_end();
            return head.ends_with("do");
        }
    }
    false
}

/// A `<%# … %>` comment appearing directly among a [`Document`]/[`Tag`]'s
/// children, outside any [`Text`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub range: Range,
    pub text: String,
}

/// One piece of a [`Text`] run: either literal bytes or an embedded code tag
/// interleaved with them.
#[derive(Debug, Clone, PartialEq)]
pub enum TextPart {
    Literal(Literal),
    Embedded(Embedded),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub text: String,
    pub range: Range,
}

/// A run of literal text, possibly with embedded code tags interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub range: Range,
    pub parts: Vec<TextPart>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(b: usize, e: usize) -> Range {
        Range::new(b, e)
    }

    #[test]
    fn node_range_dispatches_by_variant() {
        let n = Node::Comment(Comment {
            range: r(3, 9),
            text: " hi".to_string(),
        });
        assert_eq!(n.range(), r(3, 9));
    }

    #[test]
    fn trailing_block_detects_do_with_args() {
        let e = Embedded {
            range: r(0, 0),
            indicator: Indicator::None,
            code: " 10.times do |i| ".to_string(),
            code_range: r(0, 0),
            tag_ends_on_newline: true,
        };
        assert!(e.trailing_block());
        assert!(!e.is_multiline());
    }

    #[test]
    fn trailing_block_detects_bare_do() {
        let e = Embedded {
            range: r(0, 0),
            indicator: Indicator::None,
            code: " items.each do ".to_string(),
            code_range: r(0, 0),
            tag_ends_on_newline: true,
        };
        assert!(e.trailing_block());
    }

    #[test]
    fn multiline_detection() {
        let e = Embedded {
            range: r(0, 0),
            indicator: Indicator::None,
            code: "\n  foo\n".to_string(),
            code_range: r(0, 0),
            tag_ends_on_newline: true,
        };
        assert!(e.is_multiline());
        assert!(e.starts_on_newline());
    }
}
