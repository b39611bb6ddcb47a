//! `IRTranspiler`: the AST visitor that emits IR text and builds the source
//! map as it goes (spec §4.1). Grounded on `quarto-doctemplate::parser`'s
//! node-dispatch style (match on variant, explicit recursive descent).

use crate::ast::{Attribute, Comment, Document, Embedded, Indicator, Literal, Node, Tag, TagForm, Text};
use crate::ir::Ir;
use crate::source::{Range, SourceModel};
use crate::source_map::SourceMap;

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Split `bytes` into maximal whitespace/non-whitespace runs, as
/// `(start, end, is_whitespace)` offsets relative to `bytes`.
fn split_runs(bytes: &[u8]) -> Vec<(usize, usize, bool)> {
    let mut runs = Vec::new();
    if bytes.is_empty() {
        return runs;
    }
    let mut start = 0;
    let mut cur_ws = is_ws(bytes[0]);
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        let w = is_ws(b);
        if w != cur_ws {
            runs.push((start, i, cur_ws));
            start = i;
            cur_ws = w;
        }
    }
    runs.push((start, bytes.len(), cur_ws));
    runs
}

/// Build a byte string of exactly `len` bytes by repeating `token`.
fn repeat_token(token: &[u8], len: usize) -> Vec<u8> {
    if token.is_empty() || len == 0 {
        return Vec::new();
    }
    token.iter().copied().cycle().take(len).collect()
}

fn leading_ws_len(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

fn trailing_ws_len(s: &str) -> usize {
    s.len() - s.trim_end().len()
}

/// The origin range of `e.code` once its own leading/trailing whitespace is
/// trimmed off — this is what gets copied verbatim into the IR in cases
/// B/C/D/E, so it's the range the length-preserving "code bytes" source-map
/// entry points at.
fn trimmed_code_origin(e: &Embedded) -> Range {
    let lead = leading_ws_len(&e.code);
    let trail = trailing_ws_len(&e.code);
    let begin = e.code_range.begin + lead;
    let end = e.code_range.end.saturating_sub(trail).max(begin);
    Range::new(begin, end)
}

fn indicator_prefix_len(indicator: Indicator) -> usize {
    match indicator {
        Indicator::None => 2,      // "<%"
        Indicator::Output => 3,    // "<%="
        Indicator::Comment => 3,   // "<%#"
    }
}

/// The trailing block-opener substring of an already-trimmed-at-the-end code
/// string (`do`, `do |args|`, or `{`).
fn trailing_block_opener(trimmed_end: &str) -> String {
    let trimmed = trimmed_end.trim_end();
    if trimmed.ends_with('{') {
        return "{".to_string();
    }
    if let Some(pipe_end) = trimmed.rfind('|') {
        let before = &trimmed[..pipe_end];
        if let Some(pipe_start) = before.rfind('|') {
            let head = trimmed[..pipe_start].trim_end();
            if head.ends_with("do") {
                return trimmed[head.len() - 2..].trim().to_string();
            }
        }
    }
    if trimmed.ends_with("do") {
        return "do".to_string();
    }
    "do".to_string()
}

/// A piece of produced content naming the local offset of the verbatim code
/// bytes within it, for the length-preserving source-map entry.
type CodePiece = Option<(usize, usize, Range)>;

struct Transpiler<'a> {
    source: &'a SourceModel,
    text: Vec<u8>,
    map: SourceMap,
    tag_stack: Vec<String>,
    inside_pre: bool,
}

impl<'a> Transpiler<'a> {
    fn new(source: &'a SourceModel) -> Self {
        Self {
            source,
            text: Vec::new(),
            map: SourceMap::new(),
            tag_stack: Vec::new(),
            inside_pre: false,
        }
    }

    fn finish(self) -> (String, SourceMap) {
        (String::from_utf8_lossy(&self.text).into_owned(), self.map)
    }

    /// The single emission primitive: append `bytes` to the IR buffer and
    /// record a source-map entry for the range it landed in.
    fn emit(&mut self, origin: Range, bytes: Vec<u8>) {
        let start = self.text.len();
        self.text.extend_from_slice(&bytes);
        let end = self.text.len();
        self.map.add(origin, Range::new(start, end));
    }

    /// Append bytes without recording a map entry; the caller is responsible
    /// for adding whatever entries apply (used by the embedded-tag cases,
    /// which coalesce into exactly two entries per tag).
    fn append_unmapped(&mut self, bytes: &[u8]) -> Range {
        let start = self.text.len();
        self.text.extend_from_slice(bytes);
        Range::new(start, self.text.len())
    }

    fn copy_verbatim(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }
        let bytes = self.source.slice(range).to_vec();
        self.emit(range, bytes);
    }

    fn copy_leading_ws_of_next_line(&mut self, after_offset: usize) {
        let bytes = self.source.bytes();
        let mut i = after_offset;
        while i < bytes.len() && bytes[i] != b'\n' {
            i += 1;
        }
        if i < bytes.len() {
            i += 1;
        }
        let start = i;
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        self.copy_verbatim(Range::new(start, i));
    }

    fn copy_leading_ws_of_line_containing(&mut self, offset: usize) {
        if let Some(loc) = self.source.location(offset) {
            if let Some(start) = self.source.line_start(loc.line) {
                if start < offset {
                    self.copy_verbatim(Range::new(start, offset));
                }
            }
        }
    }

    fn starts_own_line(&self, offset: usize) -> bool {
        if let Some(loc) = self.source.location(offset) {
            if let Some(start) = self.source.line_start(loc.line) {
                let prefix = self.source.slice(Range::new(start, offset));
                return prefix.iter().all(|&b| b == b' ' || b == b'\t');
            }
        }
        false
    }

    fn visit_document(&mut self, doc: &Document) {
        for child in &doc.children {
            self.visit(child);
        }
    }

    fn visit(&mut self, node: &Node) {
        match node {
            Node::Document(d) => self.visit_document(d),
            Node::Tag(t) => self.transpile_tag(t),
            Node::ClosingTag(_) => {
                // Stray close with no matching opener: tolerated, ignored (spec §7).
            }
            Node::Text(t) => self.transpile_text(t),
            Node::Embedded(e) => self.transpile_embedded(e),
            Node::Comment(c) => self.transpile_standalone_comment(c),
        }
    }

    fn emit_tag_name_prefix(&mut self, tag: &Tag) {
        let mut out = repeat_token(b"tag", tag.name_range.len());
        out.push(b'(');
        self.emit(tag.name_range, out);
    }

    fn transpile_attrs(&mut self, attrs: &[Attribute]) {
        for (i, attr) in attrs.iter().enumerate() {
            let mut out = repeat_token(b"line", attr.range.len());
            if i + 1 < attrs.len() {
                out.push(b',');
            }
            self.emit(attr.range, out);
            if i + 1 < attrs.len() {
                let gap = Range::new(attr.range.end, attrs[i + 1].range.begin);
                self.copy_verbatim(gap);
            }
        }
    }

    fn emit_tag_close(&mut self, tag: &Tag, leaf: bool) {
        let delim_len = if tag.form == TagForm::SelfClosing { 2 } else { 1 };
        let point = Range::point(tag.open_tag_range.end.saturating_sub(delim_len));
        let bytes: &[u8] = if leaf { b");" } else { b") {" };
        self.emit(point, bytes.to_vec());
    }

    fn transpile_tag(&mut self, tag: &Tag) {
        if self.inside_pre {
            return;
        }
        match tag.form {
            TagForm::SelfClosing | TagForm::Void => {
                self.emit_tag_name_prefix(tag);
                self.transpile_attrs(&tag.attrs);
                self.emit_tag_close(tag, true);
            }
            TagForm::Normal => {
                self.tag_stack.push(tag.name.clone());
                self.emit_tag_name_prefix(tag);
                self.transpile_attrs(&tag.attrs);
                let is_pre = tag.name.eq_ignore_ascii_case("pre");
                self.emit_tag_close(tag, false);
                if is_pre {
                    self.inside_pre = true;
                    self.copy_leading_ws_of_next_line(tag.open_tag_range.end);
                } else {
                    for child in &tag.children {
                        self.visit(child);
                    }
                }
                self.tag_stack.pop();
                if is_pre {
                    self.inside_pre = false;
                    if let Some(close_range) = tag.close_tag_range {
                        self.copy_leading_ws_of_line_containing(close_range.begin);
                    }
                }
                if let Some(close_range) = tag.close_tag_range {
                    self.emit(close_range, b"};".to_vec());
                }
            }
        }
    }

    fn transpile_text(&mut self, text: &Text) {
        if self.inside_pre {
            return;
        }
        for part in &text.parts {
            match part {
                crate::ast::TextPart::Literal(lit) => self.transpile_literal(lit),
                crate::ast::TextPart::Embedded(e) => self.transpile_embedded(e),
            }
        }
    }

    fn transpile_literal(&mut self, lit: &Literal) {
        let bytes = self.source.slice(lit.range).to_vec();
        for (s, e, ws) in split_runs(&bytes) {
            let sub = Range::new(lit.range.begin + s, lit.range.begin + e);
            if ws {
                self.copy_verbatim(sub);
            } else {
                let len = e - s;
                if len >= 2 {
                    let mut out = repeat_token(b"text", len);
                    out.push(b';');
                    self.emit(sub, out);
                } else {
                    self.emit(sub, b";".to_vec());
                }
            }
        }
    }

    fn transpile_standalone_comment(&mut self, c: &Comment) {
        if self.inside_pre {
            return;
        }
        if self.starts_own_line(c.range.begin) {
            self.emit(c.range, b"__comment;".to_vec());
        }
    }

    fn transpile_embedded(&mut self, e: &Embedded) {
        if self.inside_pre {
            return;
        }
        if matches!(e.indicator, Indicator::Comment) {
            let ir = format!("#{}", e.code).into_bytes();
            self.emit(e.range, ir);
            return;
        }

        let is_multiline = e.is_multiline();
        let starts_on_newline = e.starts_on_newline();
        let trailing_block = e.trailing_block();

        let (content, code_piece): (Vec<u8>, CodePiece) = if is_multiline && starts_on_newline && trailing_block {
            build_case_a(e)
        } else if is_multiline && starts_on_newline {
            build_case_b(e)
        } else if is_multiline {
            build_case_c(e)
        } else if e.tag_ends_on_newline {
            build_case_d(e)
        } else {
            build_case_e(e)
        };

        let dest = self.append_unmapped(&content);
        self.map.add(e.range, dest);
        if let Some((offset, len, origin)) = code_piece {
            let code_dest = Range::new(dest.begin + offset, dest.begin + offset + len);
            self.map.add(origin, code_dest);
        }
    }
}

fn build_case_a(e: &Embedded) -> (Vec<u8>, CodePiece) {
    let opener = trailing_block_opener(e.code.trim_end());
    (format!("__with_block {opener}").into_bytes(), None)
}

fn build_case_b(e: &Embedded) -> (Vec<u8>, CodePiece) {
    let lead = leading_ws_len(&e.code);
    let leading_ws = &e.code[..lead];
    let trimmed = e.code.trim();
    let mut content = Vec::new();
    content.extend_from_slice(b"begin\n");
    content.extend_from_slice(leading_ws.as_bytes());
    let code_offset = content.len();
    content.extend_from_slice(trimmed.as_bytes());
    let code_len = trimmed.len();
    content.extend_from_slice(b"\nend");
    (content, Some((code_offset, code_len, trimmed_code_origin(e))))
}

fn build_case_c(e: &Embedded) -> (Vec<u8>, CodePiece) {
    let placeholder = repeat_token(b"x", indicator_prefix_len(e.indicator));
    let trimmed = e.code.trim();
    let mut content = placeholder;
    content.push(b';');
    let code_offset = content.len();
    content.extend_from_slice(trimmed.as_bytes());
    (content, Some((code_offset, trimmed.len(), trimmed_code_origin(e))))
}

fn build_case_d(e: &Embedded) -> (Vec<u8>, CodePiece) {
    let trimmed = e.code.trim();
    (
        trimmed.as_bytes().to_vec(),
        Some((0, trimmed.len(), trimmed_code_origin(e))),
    )
}

fn build_case_e(e: &Embedded) -> (Vec<u8>, CodePiece) {
    let prefix_len = indicator_prefix_len(e.indicator) + leading_ws_len(&e.code);
    let placeholder = repeat_token(b"x", prefix_len.saturating_sub(1));
    let trimmed = e.code.trim();
    let mut content = placeholder;
    content.push(b';');
    let code_offset = content.len();
    content.extend_from_slice(trimmed.as_bytes());
    (content, Some((code_offset, trimmed.len(), trimmed_code_origin(e))))
}

/// Transpile a parsed document into an [`Ir`]: IR text plus the source map
/// relating it back to `source`.
pub fn transpile(source: SourceModel, doc: &Document) -> Ir {
    let mut transpiler = Transpiler::new(&source);
    transpiler.visit_document(doc);
    let (text, map) = transpiler.finish();
    Ir::new(source, text, map)
}
