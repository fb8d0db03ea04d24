#![forbid(unsafe_code)]

//! The balancing pass.
//!
//! A pass shrinks the target's `max-inline-size` to the narrowest value that
//! does not add a line. It measures the unconstrained block extent once, then
//! binary-searches the inline constraint, reflowing the target synchronously
//! after every probe.
//!
//! # Algorithm
//!
//! 1. Clear the constraint and force `box-sizing: border-box`.
//! 2. Read the computed style and map the logical axes for the writing mode.
//! 3. `natural = client(block) - block_padding`. Content that fits in one
//!    line height is left alone.
//! 4. Search `[inline_padding, offset(inline)]`: a probe whose extent exceeds
//!    `natural` raises `min` past it, any other probe becomes the new `max`.
//! 5. Apply `max`.
//!
//! Host failures never escape: the pass reports
//! [`BalanceOutcome::Skipped`] and leaves the target unconstrained.
//!
//! # Example
//!
//! ```ignore
//! use balanced_layout::balance;
//!
//! let outcome = balance(&mut target);
//! if let Some(width) = outcome.constraint() {
//!     println!("balanced at {width}px");
//! }
//! ```

use balanced_core::{BoxSizing, HostError, LayoutTarget, PhysicalAxis, WritingMode};

use crate::search::{INITIAL_GUESS_RATIO, MAX_SEARCH_EXTENT, SearchBounds};

/// Result of one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceOutcome {
    /// The search converged and `constraint` was applied.
    Converged {
        /// Applied `max-inline-size`.
        constraint: f64,
        /// Inline size the pass started from.
        natural_inline: f64,
        /// Block extent (minus padding) the constraint preserves.
        natural_block: f64,
        /// Physical axis the constraint was applied along.
        axis: PhysicalAxis,
        /// Number of probes.
        iterations: u32,
    },
    /// Content fits in one line; nothing was applied.
    SingleLine {
        natural_block: f64,
        line_height: f64,
    },
    /// The target could not be measured or mutated.
    Skipped(HostError),
}

impl BalanceOutcome {
    /// The applied constraint, if the pass converged.
    #[must_use]
    pub fn constraint(&self) -> Option<f64> {
        match self {
            Self::Converged { constraint, .. } => Some(*constraint),
            _ => None,
        }
    }

    /// Whether the pass converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// Whether the pass was skipped because of a host failure.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Balancing pass with a configurable first probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balancer {
    initial_guess_ratio: f64,
}

impl Default for Balancer {
    fn default() -> Self {
        Self {
            initial_guess_ratio: INITIAL_GUESS_RATIO,
        }
    }
}

impl Balancer {
    /// Create a balancer with the default first probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fraction of the natural inline size probed first.
    ///
    /// Values outside `(0, 1]` are clamped; the result is unaffected, only
    /// the number of probes.
    #[must_use]
    pub fn initial_guess(mut self, ratio: f64) -> Self {
        self.initial_guess_ratio = if ratio.is_finite() {
            ratio.clamp(f64::EPSILON, 1.0)
        } else {
            INITIAL_GUESS_RATIO
        };
        self
    }

    /// Run one pass on `target`.
    pub fn run<T: LayoutTarget + ?Sized>(&self, target: &mut T) -> BalanceOutcome {
        match self.try_run(target) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::debug!(error = %err, "balancing pass skipped");
                // Never leave an intermediate probe applied.
                let _ = target.set_max_inline_size(None);
                BalanceOutcome::Skipped(err)
            }
        }
    }

    fn try_run<T: LayoutTarget + ?Sized>(&self, target: &mut T) -> Result<BalanceOutcome, HostError> {
        target.set_max_inline_size(None)?;
        target.set_box_sizing(BoxSizing::BorderBox)?;

        let style = target.computed_style()?;
        let axes = style.writing_mode.axes();
        let block_padding = finite(style.block_padding(), "block padding")?;
        let inline_padding = finite(style.inline_padding(), "inline padding")?;

        let natural_block = content_extent(target, axes.block, block_padding)?;
        if let Some(line_height) = style.line_height.resolved()
            && natural_block <= line_height
        {
            tracing::trace!(natural_block, line_height, "single line, nothing to balance");
            return Ok(BalanceOutcome::SingleLine {
                natural_block,
                line_height,
            });
        }

        let natural_inline = finite(target.offset_extent(axes.inline)?, "offset extent")?;
        if natural_inline <= 0.0 {
            return Err(HostError::Unmeasurable("zero inline extent"));
        }
        if natural_inline > MAX_SEARCH_EXTENT {
            return Err(HostError::Unmeasurable("inline extent out of range"));
        }

        let mut bounds = SearchBounds::new(inline_padding, natural_inline, self.initial_guess_ratio);
        let span = pass_span(style.writing_mode, axes.inline, natural_block, &bounds);
        let _guard = span.enter();

        let mut iterations = 0u32;
        while !bounds.is_converged() {
            target.set_max_inline_size(Some(bounds.mid))?;
            let measured = content_extent(target, axes.block, block_padding)?;
            let overflowed = measured > natural_block;
            tracing::trace!(candidate = bounds.mid, measured, overflowed, "probe");
            bounds.narrow(overflowed);
            iterations += 1;
        }

        target.set_max_inline_size(Some(bounds.max))?;
        span.record("iterations", iterations);
        span.record("constraint", bounds.max);

        Ok(BalanceOutcome::Converged {
            constraint: bounds.max,
            natural_inline,
            natural_block,
            axis: axes.inline,
            iterations,
        })
    }
}

/// Run one pass with the default balancer.
pub fn balance<T: LayoutTarget + ?Sized>(target: &mut T) -> BalanceOutcome {
    Balancer::default().run(target)
}

fn pass_span(
    writing_mode: WritingMode,
    axis: PhysicalAxis,
    natural_block: f64,
    bounds: &SearchBounds,
) -> tracing::Span {
    tracing::debug_span!(
        "balance_pass",
        writing_mode = %writing_mode,
        axis = ?axis,
        natural_block,
        min = bounds.min,
        max = bounds.max,
        iterations = tracing::field::Empty,
        constraint = tracing::field::Empty,
    )
}

/// Block extent of the content box.
fn content_extent<T: LayoutTarget + ?Sized>(
    target: &T,
    block_axis: PhysicalAxis,
    block_padding: f64,
) -> Result<f64, HostError> {
    finite(target.client_extent(block_axis)? - block_padding, "client extent")
}

fn finite(value: f64, what: &'static str) -> Result<f64, HostError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(HostError::Unmeasurable(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balanced_core::{AxisEdges, ComputedStyle, LineHeight, NodeId};

    /// Fixed-advance text in a box: `chars` glyphs of `advance` px each.
    struct Paragraph {
        chars: u32,
        advance: f64,
        line_height: f64,
        padding: f64,
        container: f64,
        writing_mode: WritingMode,
        max_inline: Option<f64>,
        border_box: bool,
        probes: Vec<f64>,
        fail_after: Option<usize>,
    }

    impl Paragraph {
        fn new(chars: u32, container: f64) -> Self {
            Self {
                chars,
                advance: 10.0,
                line_height: 20.0,
                padding: 0.0,
                container,
                writing_mode: WritingMode::HorizontalTb,
                max_inline: None,
                border_box: false,
                probes: Vec::new(),
                fail_after: None,
            }
        }

        fn inline_size(&self) -> f64 {
            match self.max_inline {
                Some(max) => max.min(self.container),
                None => self.container,
            }
        }

        fn lines(&self) -> u32 {
            let per_line = ((self.inline_size() - 2.0 * self.padding) / self.advance)
                .floor()
                .max(1.0) as u32;
            self.chars.div_ceil(per_line)
        }
    }

    impl LayoutTarget for Paragraph {
        fn computed_style(&self) -> Result<ComputedStyle, HostError> {
            Ok(ComputedStyle {
                writing_mode: self.writing_mode,
                padding_block: AxisEdges::all(self.padding),
                padding_inline: AxisEdges::all(self.padding),
                line_height: LineHeight::Length(self.line_height),
            })
        }

        fn client_extent(&self, axis: PhysicalAxis) -> Result<f64, HostError> {
            let block = f64::from(self.lines()) * self.line_height + 2.0 * self.padding;
            let axes = self.writing_mode.axes();
            Ok(if axis == axes.block { block } else { self.inline_size() })
        }

        fn offset_extent(&self, axis: PhysicalAxis) -> Result<f64, HostError> {
            self.client_extent(axis)
        }

        fn set_max_inline_size(&mut self, size: Option<f64>) -> Result<(), HostError> {
            if let Some(size) = size {
                if self.fail_after.is_some_and(|n| self.probes.len() >= n) {
                    return Err(HostError::Detached);
                }
                self.probes.push(size);
            }
            self.max_inline = size;
            Ok(())
        }

        fn max_inline_size(&self) -> Option<f64> {
            self.max_inline
        }

        fn set_box_sizing(&mut self, sizing: BoxSizing) -> Result<(), HostError> {
            self.border_box = sizing == BoxSizing::BorderBox;
            Ok(())
        }

        fn layout_parent(&self) -> Option<NodeId> {
            Some(NodeId::new(1))
        }
    }

    #[test]
    fn converges_on_narrowest_width_with_same_line_count() {
        // 250 glyphs in 800px: 80 per line, 4 lines. 63 per line still needs
        // 4 lines (ceil(250/63) = 4), 62 needs 5.
        let mut paragraph = Paragraph::new(250, 800.0);
        let outcome = balance(&mut paragraph);

        assert_eq!(outcome.constraint(), Some(630.0));
        assert_eq!(paragraph.max_inline, Some(630.0));
        assert_eq!(paragraph.lines(), 4);
        assert!(paragraph.border_box);
    }

    #[test]
    fn single_line_is_left_alone() {
        let mut paragraph = Paragraph::new(20, 800.0);
        let outcome = balance(&mut paragraph);

        assert!(matches!(outcome, BalanceOutcome::SingleLine { .. }));
        assert_eq!(paragraph.max_inline, None);
        assert!(paragraph.probes.is_empty());
    }

    #[test]
    fn empty_content_is_left_alone() {
        let mut paragraph = Paragraph::new(0, 800.0);
        assert!(matches!(balance(&mut paragraph), BalanceOutcome::SingleLine { .. }));
    }

    #[test]
    fn clears_previous_constraint_first() {
        let mut paragraph = Paragraph::new(20, 800.0);
        paragraph.max_inline = Some(50.0);
        balance(&mut paragraph);
        assert_eq!(paragraph.max_inline, None);
    }

    #[test]
    fn search_stays_within_padding_and_natural_width() {
        let mut paragraph = Paragraph::new(300, 600.0);
        paragraph.padding = 24.0;
        let outcome = balance(&mut paragraph);

        let constraint = outcome.constraint().unwrap();
        assert!(constraint >= 48.0);
        assert!(constraint <= 600.0);
        assert!(paragraph.probes.iter().all(|p| *p <= 600.0));
    }

    #[test]
    fn vertical_mode_reports_vertical_axis() {
        let mut paragraph = Paragraph::new(250, 800.0);
        paragraph.writing_mode = WritingMode::VerticalRl;
        let outcome = balance(&mut paragraph);

        match outcome {
            BalanceOutcome::Converged { axis, constraint, .. } => {
                assert_eq!(axis, PhysicalAxis::Vertical);
                assert_eq!(constraint, 630.0);
            }
            other => panic!("expected convergence, got {other:?}"),
        }
    }

    #[test]
    fn failure_mid_search_is_contained() {
        let mut paragraph = Paragraph::new(250, 800.0);
        paragraph.fail_after = Some(2);
        let outcome = balance(&mut paragraph);

        assert_eq!(outcome, BalanceOutcome::Skipped(HostError::Detached));
        assert_eq!(paragraph.max_inline, None);
    }

    #[test]
    fn zero_width_container_is_skipped() {
        let mut paragraph = Paragraph::new(250, 0.0);
        assert!(balance(&mut paragraph).is_skipped());
    }

    #[test]
    fn initial_guess_changes_probes_not_result() {
        let mut a = Paragraph::new(250, 800.0);
        let mut b = Paragraph::new(250, 800.0);
        let first = Balancer::new().run(&mut a);
        let second = Balancer::new().initial_guess(0.3).run(&mut b);

        assert_eq!(first.constraint(), second.constraint());
        assert_ne!(a.probes, b.probes);
    }

    #[test]
    fn out_of_range_guess_is_clamped() {
        let mut paragraph = Paragraph::new(250, 800.0);
        let outcome = Balancer::new().initial_guess(7.0).run(&mut paragraph);
        assert_eq!(outcome.constraint(), Some(630.0));
        assert!(paragraph.probes[0] <= 800.0);
    }
}
