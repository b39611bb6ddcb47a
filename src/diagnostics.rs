//! Offenses and corrections (spec §6): the output contract of a run.
//!
//! Trimmed down from `quarto-error-reporting::diagnostic`'s
//! `DiagnosticKind`/location-carrying-message pattern — this engine reports
//! offenses, it doesn't render them as markdown or catalog them by code.

use serde::{Deserialize, Serialize};

use crate::source::Range;

/// How serious an offense is, matching the host analyzer's severity scale
/// (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Convention,
    Warning,
    Refactor,
    Error,
    Fatal,
}

/// A single text-edit primitive against the original source buffer (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Remove { range: Range },
    InsertBefore { range: Range, text: String },
    InsertAfter { range: Range, text: String },
    Replace { range: Range, text: String },
}

impl Action {
    /// The range this action applies against (for translation purposes).
    pub fn range(&self) -> Range {
        match self {
            Action::Remove { range }
            | Action::InsertBefore { range, .. }
            | Action::InsertAfter { range, .. }
            | Action::Replace { range, .. } => *range,
        }
    }

    fn with_range(&self, range: Range) -> Action {
        match self {
            Action::Remove { .. } => Action::Remove { range },
            Action::InsertBefore { text, .. } => Action::InsertBefore {
                range,
                text: text.clone(),
            },
            Action::InsertAfter { text, .. } => Action::InsertAfter {
                range,
                text: text.clone(),
            },
            Action::Replace { text, .. } => Action::Replace {
                range,
                text: text.clone(),
            },
        }
    }

    /// Apply this action, translated to an original-source range, against
    /// `buffer`. Returns `None` (no-op) only if `range.end` exceeds the
    /// buffer length — callers are expected to have already dropped actions
    /// whose ranges failed to translate.
    pub fn apply(&self, buffer: &mut Vec<u8>) {
        let range = self.range();
        if range.end > buffer.len() {
            return;
        }
        match self {
            Action::Remove { .. } => {
                buffer.drain(range.begin..range.end);
            }
            Action::InsertBefore { text, .. } => {
                buffer.splice(range.begin..range.begin, text.bytes());
            }
            Action::InsertAfter { text, .. } => {
                buffer.splice(range.end..range.end, text.bytes());
            }
            Action::Replace { text, .. } => {
                buffer.splice(range.begin..range.end, text.bytes());
            }
        }
    }

    pub(crate) fn translated(&self, range: Range) -> Action {
        self.with_range(range)
    }
}

/// A correction: a flat list of actions against IR coordinates, produced by
/// a rule's corrector and later translated action-by-action (spec §4.4 step 6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub actions: Vec<Action>,
}

/// A single reported style violation (spec §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offense {
    pub location: Range,
    pub message: String,
    pub severity: Severity,
    pub correction: Option<Correction>,
}

impl Offense {
    pub fn new(location: Range, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            location,
            message: message.into(),
            severity,
            correction: None,
        }
    }

    pub fn with_correction(mut self, correction: Correction) -> Self {
        self.correction = Some(correction);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_action_applies_in_place() {
        let mut buf = b"hello world".to_vec();
        let action = Action::Replace {
            range: Range::new(0, 5),
            text: "howdy".to_string(),
        };
        action.apply(&mut buf);
        assert_eq!(buf, b"howdy world");
    }

    #[test]
    fn remove_action_deletes_range() {
        let mut buf = b"hello world".to_vec();
        Action::Remove {
            range: Range::new(5, 11),
        }
        .apply(&mut buf);
        assert_eq!(buf, b"hello");
    }

    #[test]
    fn insert_before_and_after_shift_content() {
        let mut buf = b"ab".to_vec();
        Action::InsertBefore {
            range: Range::new(1, 1),
            text: "X".to_string(),
        }
        .apply(&mut buf);
        assert_eq!(buf, b"aXb");
    }
}
