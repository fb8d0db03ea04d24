#![forbid(unsafe_code)]

//! Writing modes and the logical-to-physical axis mapping.
//!
//! Balancing works in logical terms: lines stack along the *block* axis and
//! the constraint being searched is applied along the *inline* axis. Which
//! physical axis each one maps to depends on the writing mode:
//!
//! | Writing mode | Inline axis | Block axis |
//! |--------------|-------------|------------|
//! | `horizontal-tb` | horizontal (width) | vertical (height) |
//! | `vertical-rl`, `vertical-lr` | vertical (height) | horizontal (width) |
//! | `sideways-rl`, `sideways-lr` | vertical (height) | horizontal (width) |
//!
//! # Example
//!
//! ```
//! use balanced_core::geometry::{PhysicalAxis, WritingMode};
//!
//! let mode: WritingMode = "vertical-rl".parse().unwrap();
//! assert!(mode.is_vertical());
//! assert_eq!(mode.inline_axis(), PhysicalAxis::Vertical);
//! assert_eq!(mode.block_axis(), PhysicalAxis::Horizontal);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Writing mode determines the block and inline flow directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritingMode {
    /// Horizontal top-to-bottom (default for Latin scripts).
    /// - Block flow: top to bottom
    /// - Inline flow: left to right (or right to left with `direction: rtl`)
    #[default]
    HorizontalTb,

    /// Vertical right-to-left (common for East Asian scripts).
    /// - Block flow: right to left
    /// - Inline flow: top to bottom
    VerticalRl,

    /// Vertical left-to-right (Mongolian script).
    /// - Block flow: left to right
    /// - Inline flow: top to bottom
    VerticalLr,

    /// Like `vertical-rl`, with all glyphs set sideways.
    SidewaysRl,

    /// Like `vertical-lr`, with glyphs rotated towards the left.
    SidewaysLr,
}

impl WritingMode {
    /// All writing modes, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::HorizontalTb,
        Self::VerticalRl,
        Self::VerticalLr,
        Self::SidewaysRl,
        Self::SidewaysLr,
    ];

    /// Whether lines run along the physical vertical axis.
    #[inline]
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        !matches!(self, Self::HorizontalTb)
    }

    /// Physical axis the inline (line) direction runs along.
    #[inline]
    #[must_use]
    pub const fn inline_axis(self) -> PhysicalAxis {
        if self.is_vertical() {
            PhysicalAxis::Vertical
        } else {
            PhysicalAxis::Horizontal
        }
    }

    /// Physical axis lines stack along.
    #[inline]
    #[must_use]
    pub const fn block_axis(self) -> PhysicalAxis {
        self.inline_axis().cross()
    }

    /// Both axes at once.
    #[inline]
    #[must_use]
    pub const fn axes(self) -> LogicalAxes {
        LogicalAxes {
            inline: self.inline_axis(),
            block: self.block_axis(),
        }
    }

    /// CSS keyword for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HorizontalTb => "horizontal-tb",
            Self::VerticalRl => "vertical-rl",
            Self::VerticalLr => "vertical-lr",
            Self::SidewaysRl => "sideways-rl",
            Self::SidewaysLr => "sideways-lr",
        }
    }
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a recognized `writing-mode` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWritingModeError {
    input: String,
}

impl fmt::Display for ParseWritingModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown writing mode: {:?}", self.input)
    }
}

impl std::error::Error for ParseWritingModeError {}

impl FromStr for WritingMode {
    type Err = ParseWritingModeError;

    /// Parse a CSS `writing-mode` keyword (ASCII case-insensitive).
    ///
    /// The legacy SVG values `lr`, `lr-tb`, `rl`, `tb` and `tb-rl` are
    /// accepted and mapped the way browsers compute them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.trim().to_ascii_lowercase();
        match keyword.as_str() {
            "horizontal-tb" | "lr" | "lr-tb" | "rl" | "rl-tb" => Ok(Self::HorizontalTb),
            "vertical-rl" | "tb" | "tb-rl" => Ok(Self::VerticalRl),
            "vertical-lr" => Ok(Self::VerticalLr),
            "sideways-rl" => Ok(Self::SidewaysRl),
            "sideways-lr" => Ok(Self::SidewaysLr),
            _ => Err(ParseWritingModeError {
                input: s.to_string(),
            }),
        }
    }
}

/// Physical direction in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalAxis {
    /// Width-like axis.
    Horizontal,
    /// Height-like axis.
    Vertical,
}

impl PhysicalAxis {
    /// The orthogonal axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Pick the component of a `(width, height)` pair along this axis.
    #[inline]
    #[must_use]
    pub fn select<T>(self, width: T, height: T) -> T {
        match self {
            Self::Horizontal => width,
            Self::Vertical => height,
        }
    }
}

/// Resolved logical axes for one writing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicalAxes {
    /// Axis the constraint is applied along.
    pub inline: PhysicalAxis,
    /// Axis the content extent is measured along.
    pub block: PhysicalAxis,
}

/// The `box-sizing` model applied to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxSizing {
    /// Sizes apply to the content box only.
    #[default]
    ContentBox,
    /// Sizes include padding and border.
    BorderBox,
}

/// Start/end pair along one logical axis, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisEdges {
    pub start: f64,
    pub end: f64,
}

impl AxisEdges {
    /// Create a new pair.
    #[inline]
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Same value on both edges.
    #[inline]
    #[must_use]
    pub const fn all(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Sum of both edges.
    #[inline]
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.start + self.end
    }
}
