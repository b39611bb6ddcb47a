//! `Config` and `ConfigError` (spec §6). Grounded on
//! `quarto-config::types::ConfigError`: a `thiserror` enum enumerating
//! offending fields, checked once at construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `Layout/BlockAlignment` and `Layout/BeginEndAlignment` share this style set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockAlignStyle {
    StartOfBlock,
    StartOfLine,
    Either,
}

impl Default for BlockAlignStyle {
    fn default() -> Self {
        BlockAlignStyle::StartOfBlock
    }
}

/// `Layout/EndAlignment`'s style set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndAlignStyle {
    Keyword,
    Variable,
    StartOfLine,
}

impl Default for EndAlignStyle {
    fn default() -> Self {
        EndAlignStyle::Keyword
    }
}

/// `Layout/ArgumentAlignment`'s style set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentAlignStyle {
    WithFirstArgument,
    WithFixedIndentation,
}

impl Default for ArgumentAlignStyle {
    fn default() -> Self {
        ArgumentAlignStyle::WithFirstArgument
    }
}

/// Rejected at construction time, one variant per offending field (spec §7).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("width must be >= 1, got {0}")]
    InvalidWidth(u32),
}

/// The options a run is configured with, mapped onto host rules exactly per
/// the table in spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `Layout/IndentationWidth`'s `Width` option.
    pub width: u32,
    /// `Layout/BlockAlignment`'s `EnforcedStyleAlignWith` option.
    pub enforced_style_block_align_with: BlockAlignStyle,
    /// `Layout/BeginEndAlignment`'s `EnforcedStyleAlignWith` option.
    pub enforced_style_begin_end_align_with: BlockAlignStyle,
    /// `Layout/EndAlignment`'s `EnforcedStyleAlignWith` option.
    pub enforced_style_end_align_with: EndAlignStyle,
    /// `Layout/ArgumentAlignment`'s `EnforcedStyle` option.
    pub enforced_style_argument_alignment: ArgumentAlignStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 2,
            enforced_style_block_align_with: BlockAlignStyle::default(),
            enforced_style_begin_end_align_with: BlockAlignStyle::default(),
            enforced_style_end_align_with: EndAlignStyle::default(),
            enforced_style_argument_alignment: ArgumentAlignStyle::default(),
        }
    }
}

impl Config {
    pub fn new(width: u32) -> Result<Self, ConfigError> {
        let config = Self {
            width,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 {
            return Err(ConfigError::InvalidWidth(self.width));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.width, 2);
        assert_eq!(config.enforced_style_block_align_with, BlockAlignStyle::StartOfBlock);
        assert_eq!(config.enforced_style_end_align_with, EndAlignStyle::Keyword);
        assert_eq!(
            config.enforced_style_argument_alignment,
            ArgumentAlignStyle::WithFirstArgument
        );
    }

    #[test]
    fn rejects_zero_width() {
        assert_eq!(Config::new(0), Err(ConfigError::InvalidWidth(0)));
    }

    #[test]
    fn accepts_positive_width() {
        assert!(Config::new(4).is_ok());
    }
}
