//! The IR bundle: original source, IR text, and the source map that relates
//! them (spec §3). Grounded on `quarto-doctemplate::doc::Doc` — "the thing
//! the transpiler builds and the downstream consumer reads back."

use crate::source::{Range, SourceModel};
use crate::source_map::SourceMap;

/// The triple a transpilation session produces: the original source it was
/// built from, the synthesized IR text, and the map between them.
pub struct Ir {
    source: SourceModel,
    text: String,
    map: SourceMap,
}

impl Ir {
    pub fn new(source: SourceModel, text: String, map: SourceMap) -> Self {
        Self { source, text, map }
    }

    pub fn source(&self) -> &SourceModel {
        &self.source
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn map(&self) -> &SourceMap {
        &self.map
    }

    /// Translate an IR range back to an original-source range (spec §4.2).
    pub fn translate(&self, ir_range: Range) -> Option<Range> {
        self.map.translate(ir_range)
    }
}
