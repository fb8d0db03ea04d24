#![forbid(unsafe_code)]

//! Binary-search state for one balancing pass.

/// Fraction of the natural inline size tried first.
///
/// Natural text usually balances somewhere below its full width, so starting
/// under the midpoint saves a probe or two. Any value works; only the number
/// of iterations changes.
pub const INITIAL_GUESS_RATIO: f64 = 0.8;

/// Largest inline extent a pass will search over.
///
/// Beyond this `mid + 1` stops being exact in `f64` and the narrowing could
/// stall.
pub const MAX_SEARCH_EXTENT: f64 = 1.0e9;

/// Inline-size candidates for one pass, in layout units.
///
/// `min` only grows and `max` only shrinks; the search is converged once they
/// meet (or cross). `max` is always a width that is known to fit, or the
/// natural width the pass started from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBounds {
    /// Narrowest width still considered (inline padding at first).
    pub min: f64,
    /// Narrowest width known to fit.
    pub max: f64,
    /// Next candidate to try.
    pub mid: f64,
}

impl SearchBounds {
    /// Bounds for a pass starting at `natural` inline size, with the first
    /// probe at `natural * initial_guess_ratio`.
    #[must_use]
    pub fn new(inline_padding: f64, natural: f64, initial_guess_ratio: f64) -> Self {
        Self {
            min: inline_padding,
            max: natural,
            mid: natural * initial_guess_ratio,
        }
    }

    /// Whether the search has nothing left to try.
    #[inline]
    #[must_use]
    pub fn is_converged(&self) -> bool {
        // Written this way so NaN bounds also count as converged.
        !(self.min < self.max)
    }

    /// Narrow the bounds after probing `mid`.
    ///
    /// `overflowed` is true when the content needed more lines at `mid`.
    pub fn narrow(&mut self, overflowed: bool) {
        if overflowed {
            self.min = self.mid + 1.0;
        } else {
            self.max = self.mid;
        }
        self.mid = ((self.min + self.max) / 2.0).floor();
    }
}
