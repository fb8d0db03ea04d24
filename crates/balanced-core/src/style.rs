#![forbid(unsafe_code)]

//! Computed style snapshot read back from the host before each pass.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{AxisEdges, WritingMode};

/// Resolved `line-height`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineHeight {
    /// `normal`: font dependent, not resolvable to a single length.
    #[default]
    Normal,
    /// Absolute length in layout units.
    Length(f64),
}

impl LineHeight {
    /// The resolved length, if any.
    ///
    /// Non-finite lengths are treated like `normal`.
    #[inline]
    #[must_use]
    pub fn resolved(self) -> Option<f64> {
        match self {
            Self::Normal => None,
            Self::Length(px) if px.is_finite() => Some(px),
            Self::Length(_) => None,
        }
    }
}

impl fmt::Display for LineHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Length(px) => write!(f, "{px}px"),
        }
    }
}

/// Error returned when a `line-height` value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLineHeightError {
    input: String,
}

impl fmt::Display for ParseLineHeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid line height: {:?}", self.input)
    }
}

impl std::error::Error for ParseLineHeightError {}

impl FromStr for LineHeight {
    type Err = ParseLineHeightError;

    /// Parse a computed `line-height`: `normal`, `24px`, or a bare `24`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.eq_ignore_ascii_case("normal") {
            return Ok(Self::Normal);
        }
        let number = value.strip_suffix("px").unwrap_or(value).trim();
        number
            .parse::<f64>()
            .ok()
            .filter(|px| px.is_finite() && *px >= 0.0)
            .map(Self::Length)
            .ok_or_else(|| ParseLineHeightError {
                input: s.to_string(),
            })
    }
}

/// The subset of computed style the balancer reads.
///
/// Padding is expressed logically so that the host resolves physical sides
/// for the current writing mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub writing_mode: WritingMode,
    /// `padding-block-start` / `padding-block-end`.
    pub padding_block: AxisEdges,
    /// `padding-inline-start` / `padding-inline-end`.
    pub padding_inline: AxisEdges,
    pub line_height: LineHeight,
}

impl ComputedStyle {
    /// Total padding along the block axis.
    #[inline]
    #[must_use]
    pub fn block_padding(&self) -> f64 {
        self.padding_block.sum()
    }

    /// Total padding along the inline axis.
    #[inline]
    #[must_use]
    pub fn inline_padding(&self) -> f64 {
        self.padding_inline.sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_normal_and_lengths() {
        assert_eq!("normal".parse::<LineHeight>(), Ok(LineHeight::Normal));
        assert_eq!("24px".parse::<LineHeight>(), Ok(LineHeight::Length(24.0)));
        assert_eq!("19.5".parse::<LineHeight>(), Ok(LineHeight::Length(19.5)));
    }

    #[test]
    fn rejects_garbage_and_negative() {
        assert!("tall".parse::<LineHeight>().is_err());
        assert!("-4px".parse::<LineHeight>().is_err());
    }

    #[test]
    fn non_finite_length_is_unresolved() {
        assert_eq!(LineHeight::Length(f64::NAN).resolved(), None);
        assert_eq!(LineHeight::Normal.resolved(), None);
        assert_eq!(LineHeight::Length(20.0).resolved(), Some(20.0));
    }

    #[test]
    fn padding_sums() {
        let style = ComputedStyle {
            padding_block: AxisEdges::new(16.0, 16.0),
            padding_inline: AxisEdges::new(8.0, 12.0),
            ..Default::default()
        };
        assert_eq!(style.block_padding(), 32.0);
        assert_eq!(style.inline_padding(), 20.0);
    }
}
