//! Top-level programmer-error taxonomy entry (spec §7). Grounded on
//! `quarto-doctemplate::error::TemplateError`: a `thiserror` enum whose
//! variants back assertion sites, not a `Result` thread through normal
//! control flow.

use thiserror::Error;

/// A bug in this crate, not a problem with caller input. Referenced from
/// `debug_assert!` call sites so the message names a stable type.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("source map entry for dest offset {0} was appended out of order (dest.begin must be non-decreasing)")]
    OutOfOrderSourceMapEntry(usize),
}
