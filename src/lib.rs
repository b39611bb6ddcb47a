//! A source-mapped indentation and alignment checker for ERB templates.
//!
//! The pipeline: parse ERB into an [`ast::Document`], transpile it into a
//! Ruby-like [`ir::Ir`] whose whitespace mirrors the template, run a team
//! of indentation/alignment rules against that IR, then translate their
//! diagnostics back through the [`source_map::SourceMap`] onto the original
//! bytes. [`driver::run`] is the entry point.

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod erb_parser;
pub mod error;
pub mod ir;
pub mod rules;
pub mod source;
pub mod source_map;
pub mod transpiler;

pub use config::Config;
pub use diagnostics::{Action, Correction, Offense, Severity};
pub use driver::run;
pub use error::EngineError;
pub use ir::Ir;
pub use source::{Location, Range, SourceModel};
