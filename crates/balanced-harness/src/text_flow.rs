#![forbid(unsafe_code)]

//! Greedy line breaking for the simulated layout engine.
//!
//! Widths are in cells (see [`unicode_width`]): Latin letters take one cell,
//! CJK ideographs two. Text wraps at whitespace when it can and falls back to
//! grapheme boundaries for runs wider than the line, which is also how
//! unspaced CJK text breaks.
//!
//! # Example
//! ```
//! use balanced_harness::text_flow::wrap_lines;
//!
//! let lines = wrap_lines("Hello world foo bar", 10);
//! assert_eq!(lines, vec!["Hello", "world foo", "bar"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Wrap `text` into lines of at most `width` cells.
///
/// A zero width is treated as one cell. Empty text yields no lines.
#[must_use]
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw_paragraph in text.split('\n') {
        let paragraph = raw_paragraph.strip_suffix('\r').unwrap_or(raw_paragraph);
        let mut current = String::new();
        let mut current_width = 0;

        for word in split_words(paragraph) {
            let word_width = display_width(word);

            if current_width + word_width <= width {
                current.push_str(word);
                current_width += word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(finish(&current));
                current.clear();
                current_width = 0;
                // Whitespace that caused the break hangs off the previous line.
                if is_whitespace(word) {
                    continue;
                }
            }

            if word_width > width {
                break_long_word(word, width, &mut lines, &mut current, &mut current_width);
            } else {
                let trimmed = word.trim_start();
                current.push_str(trimmed);
                current_width = display_width(trimmed);
            }
        }

        if !current.trim().is_empty() {
            lines.push(finish(&current));
        }
    }

    lines
}

/// Number of lines `text` needs at `width` cells.
#[must_use]
pub fn line_count(text: &str, width: usize) -> usize {
    wrap_lines(text, width).len()
}

/// Display width of `text` in cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn break_long_word(
    word: &str,
    width: usize,
    lines: &mut Vec<String>,
    current: &mut String,
    current_width: &mut usize,
) {
    for grapheme in word.graphemes(true) {
        let grapheme_width = display_width(grapheme);

        if *current_width == 0 && is_whitespace(grapheme) {
            continue;
        }

        if *current_width + grapheme_width > width && !current.is_empty() {
            lines.push(finish(current));
            current.clear();
            *current_width = 0;
        }

        current.push_str(grapheme);
        *current_width += grapheme_width;
    }
}

/// Split into alternating whitespace and non-whitespace runs.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_whitespace = None;

    for (offset, grapheme) in text.grapheme_indices(true) {
        let ws = is_whitespace(grapheme);
        if in_whitespace.is_some_and(|prev| prev != ws) {
            words.push(&text[start..offset]);
            start = offset;
        }
        in_whitespace = Some(ws);
    }

    if start < text.len() {
        words.push(&text[start..]);
    }

    words
}

fn is_whitespace(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

fn finish(line: &str) -> String {
    line.trim().to_string()
}
