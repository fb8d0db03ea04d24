#![forbid(unsafe_code)]

//! The `balance_pass` span and its probe events.
//!
//! Run:
//!   cargo test -p balanced-layout --test tracing_balance_pass

use balanced_harness::fixtures::{Sample, three_line_paragraph};
use balanced_harness::sim::SimElement;
use balanced_harness::trace_capture::capture;
use balanced_layout::balance;

#[test]
fn converged_pass_records_span_fields() {
    let captured = capture(|| {
        let mut el = three_line_paragraph();
        balance(&mut el);
    });

    let spans = captured.spans_named("balance_pass");
    let pass = spans.first().expect("balance_pass span");
    assert_eq!(pass.fields["writing_mode"], "horizontal-tb");
    assert_eq!(pass.fields["axis"], "Horizontal");
    assert_eq!(pass.fields["max"], "800");
    assert_eq!(pass.fields["constraint"], "576");
    assert_eq!(pass.fields["iterations"], "11");
}

#[test]
fn probes_are_logged_inside_the_pass_span() {
    let captured = capture(|| {
        let mut el = Sample::Vertical.builder().build();
        balance(&mut el);
    });

    let probes = captured.events_with_message("probe");
    assert!(!probes.is_empty());
    assert!(
        probes
            .iter()
            .all(|e| e.span.as_deref() == Some("balance_pass") && e.fields.contains_key("candidate"))
    );
}

#[test]
fn single_line_pass_opens_no_span() {
    let captured = capture(|| {
        let mut el = SimElement::builder("Short").container(800.0).build();
        balance(&mut el);
    });
    assert!(captured.spans_named("balance_pass").is_empty());
}

#[test]
fn skipped_pass_logs_the_error() {
    let captured = capture(|| {
        let mut el = three_line_paragraph();
        el.detach();
        balance(&mut el);
    });
    assert!(!captured.events_with_message("balancing pass skipped").is_empty());
}
