#![forbid(unsafe_code)]

//! Property tests for the balancing pass.
//!
//! For arbitrary text, container, and padding, a pass must:
//! - never change how many lines the text occupies
//! - pick the narrowest such width (one unit less adds a line)
//! - be idempotent
//! - leave single-line text unconstrained

use balanced_core::{LayoutTarget, WritingMode};
use balanced_harness::sim::SimElement;
use balanced_layout::{BalanceOutcome, balance};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "a", "an", "the", "text", "wrap", "line", "block", "even", "heading", "short", "layout",
    "balance", "inline", "width",
];

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..40).prop_map(|words| words.join(" "))
}

fn writing_mode_strategy() -> impl Strategy<Value = WritingMode> {
    prop::sample::select(WritingMode::ALL.to_vec())
}

fn element(text: &str, container: u32, padding: u32, mode: WritingMode) -> SimElement {
    SimElement::builder(text)
        .container(f64::from(container))
        .padding(f64::from(padding))
        .advance(8.0)
        .line_height(20.0)
        .writing_mode(mode)
        .build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn pass_preserves_line_count(
        text in text_strategy(),
        container in 120u32..1200,
        padding in 0u32..32,
        mode in writing_mode_strategy(),
    ) {
        let mut el = element(&text, container, padding, mode);
        let before = el.line_count();
        balance(&mut el);
        prop_assert_eq!(el.line_count(), before);
    }

    #[test]
    fn constraint_is_narrowest_fitting_width(
        text in text_strategy(),
        container in 120u32..1200,
        padding in 0u32..32,
    ) {
        let mut el = element(&text, container, padding, WritingMode::HorizontalTb);
        let before = el.line_count();
        let outcome = balance(&mut el);

        if let Some(constraint) = outcome.constraint() {
            let inline_padding = 2.0 * f64::from(padding);
            prop_assert!(constraint <= f64::from(container));
            if constraint - 1.0 > inline_padding {
                let mut probe = el.clone();
                probe.set_max_inline_size(Some(constraint - 1.0)).unwrap();
                prop_assert!(
                    el.line_count() > before,
                    "{} still fits {} lines", constraint - 1.0, before
                );
                probe.set_max_inline_size(Some(constraint)).unwrap();
            }
        }
    }

    #[test]
    fn pass_is_idempotent(
        text in text_strategy(),
        container in 120u32..1200,
        padding in 0u32..32,
        mode in writing_mode_strategy(),
    ) {
        let mut el = element(&text, container, padding, mode);
        let first = balance(&mut el);
        let applied = el.max_inline_size();
        let second = balance(&mut el);
        prop_assert_eq!(first, second);
        prop_assert_eq!(el.max_inline_size(), applied);
    }

    #[test]
    fn single_line_text_stays_unconstrained(
        words in prop::collection::vec(prop::sample::select(WORDS), 0..3),
        mode in writing_mode_strategy(),
    ) {
        let mut el = element(&words.join(" "), 800, 0, mode);
        let outcome = balance(&mut el);
        prop_assert!(
            matches!(outcome, BalanceOutcome::SingleLine { .. }),
            "unexpected {:?}", outcome
        );
        prop_assert_eq!(el.max_inline_size(), None);
    }
}
