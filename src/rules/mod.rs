//! The rule team (spec §4.4 step 2): one module per host rule, each
//! operating on the IR (or, for [`argument_alignment`], directly on the
//! original AST). Each rule resolves its own IR-to-source translation
//! (spec §4.4 step 5, via [`scan::translate_with_fallback`]) before handing
//! back a [`RawOffense`] already in source coordinates; [`crate::driver`]
//! just assembles those into [`crate::diagnostics::Offense`]s.

mod scan;

pub mod argument_alignment;
pub mod begin_end_alignment;
pub mod block_alignment;
pub mod block_alignment_adapter;
pub mod else_alignment;
pub mod end_alignment;
pub mod indentation_consistency;
pub mod indentation_width;

use crate::diagnostics::{Correction, Offense, Severity};
use crate::source::Range;

/// An offense, already in source coordinates, awaiting assembly into an
/// [`Offense`] by the driver.
pub(crate) struct RawOffense {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
    pub correction: Option<Correction>,
}

impl From<RawOffense> for Offense {
    fn from(raw: RawOffense) -> Self {
        let mut offense = Offense::new(raw.range, raw.message, raw.severity);
        if let Some(correction) = raw.correction {
            offense = offense.with_correction(correction);
        }
        offense
    }
}
