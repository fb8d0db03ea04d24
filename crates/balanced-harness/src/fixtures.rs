#![forbid(unsafe_code)]

//! Reference scenarios shared by tests, benches, and the preview binary.

use balanced_core::{NodeId, WritingMode};

use crate::sim::{SimElement, SimElementBuilder};

/// Latin heading text.
pub const BASIC_TEXT: &str = "Lorem ipsum dolor sit amet consectetur adipisicing elit.";

/// Japanese proverb for vertical layout.
pub const VERTICAL_TEXT: &str = "ちりも積もれば、山となるというからね。";

/// A long paragraph that wraps to three lines in an 800 unit container at
/// 8 units per glyph.
pub const THREE_LINE_TEXT: &str = "Balanced text keeps every line of a heading or short \
paragraph at roughly the same length, so the last line never ends up with a single \
orphaned word hanging below a wide block of text above it in the layout.";

/// The named scenario a fixture reproduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// `h1` with 16 unit padding inside a resizable box.
    Basic,
    /// Same box with `writing-mode: vertical-rl`.
    Vertical,
}

impl Sample {
    /// Text of the scenario.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Basic => BASIC_TEXT,
            Self::Vertical => VERTICAL_TEXT,
        }
    }

    /// Writing mode of the scenario.
    #[must_use]
    pub const fn writing_mode(self) -> WritingMode {
        match self {
            Self::Basic => WritingMode::HorizontalTb,
            Self::Vertical => WritingMode::VerticalRl,
        }
    }

    /// Builder preloaded with the scenario, heading-sized glyphs.
    #[must_use]
    pub fn builder(self) -> SimElementBuilder {
        self.builder_with_text(self.text())
    }

    /// The scenario's box and glyph metrics around different text.
    #[must_use]
    pub fn builder_with_text(self, text: impl Into<String>) -> SimElementBuilder {
        SimElement::builder(text)
            .writing_mode(self.writing_mode())
            .advance(16.0)
            .line_height(37.0)
            .padding(16.0)
            .container(480.0)
    }
}

/// The 800 unit, three line paragraph.
#[must_use]
pub fn three_line_paragraph() -> SimElement {
    SimElement::builder(THREE_LINE_TEXT)
        .id(NodeId::new(10))
        .parent(Some(NodeId::new(9)))
        .advance(8.0)
        .line_height(24.0)
        .container(800.0)
        .build()
}
