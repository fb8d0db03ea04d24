#![forbid(unsafe_code)]

//! `balanced-preview`: balance a heading in the simulated host and show the
//! lines before and after.
//!
//! ```text
//! $ balanced-preview --sample vertical --container 520
//! $ balanced-preview --text "Some long heading" --resize 700,600,500 --json
//! ```
//!
//! `--resize` replays a drag: every size is delivered to a
//! [`TriggerController`] one frame apart, and the passes it runs are reported.

use std::io::Write;

use balanced_core::{BalanceConfig, LayoutTarget, LineHeight, PhysicalAxis, WritingMode};
use balanced_layout::BalanceOutcome;
use balanced_runtime::{AttachOutcome, Edge, PassReport, TriggerController};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use web_time::{Duration, Instant};

use crate::fixtures::Sample;
use crate::observer::SimResizeObserver;
use crate::sim::SimElement;

pub type Result<T> = std::result::Result<T, PreviewError>;

/// Spacing between replayed resize notifications.
pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("element could not be observed: {reason}")]
    NotAttached { reason: String },
}

impl PreviewError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleArg {
    /// Latin heading, horizontal.
    Basic,
    /// Japanese proverb, `vertical-rl`.
    Vertical,
}

impl From<SampleArg> for Sample {
    fn from(arg: SampleArg) -> Self {
        match arg {
            SampleArg::Basic => Self::Basic,
            SampleArg::Vertical => Self::Vertical,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "balanced-preview",
    about = "Balance text line lengths in a simulated layout host",
    version
)]
pub struct PreviewArgs {
    /// Built-in scenario providing defaults for everything below.
    #[arg(long, value_enum, default_value_t = SampleArg::Basic)]
    pub sample: SampleArg,

    /// Text to balance instead of the sample text.
    #[arg(long)]
    pub text: Option<String>,

    /// Parent inline size in layout units.
    #[arg(long)]
    pub container: Option<f64>,

    /// CSS writing mode, e.g. `horizontal-tb` or `vertical-rl`.
    #[arg(long)]
    pub writing_mode: Option<WritingMode>,

    /// Padding on every side.
    #[arg(long)]
    pub padding: Option<f64>,

    /// Layout units per glyph cell.
    #[arg(long)]
    pub advance: Option<f64>,

    /// `normal` or a length such as `24px`.
    #[arg(long)]
    pub line_height: Option<LineHeight>,

    /// Parent sizes to replay as a drag-resize, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub resize: Vec<f64>,

    /// Debounce window for `--resize`. Defaults to `BALANCED_INTERVAL_MS` or 50.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

impl PreviewArgs {
    fn validate(&self) -> Result<()> {
        let positive = [
            ("--container", self.container),
            ("--advance", self.advance),
        ];
        for (flag, value) in positive {
            if let Some(value) = value
                && !(value.is_finite() && value > 0.0)
            {
                return Err(PreviewError::invalid(format!("{flag} must be positive, got {value}")));
            }
        }
        if let Some(padding) = self.padding
            && !(padding.is_finite() && padding >= 0.0)
        {
            return Err(PreviewError::invalid(format!(
                "--padding must be non-negative, got {padding}"
            )));
        }
        if let Some(size) = self.resize.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(PreviewError::invalid(format!(
                "--resize sizes must be positive, got {size}"
            )));
        }
        Ok(())
    }

    fn build_element(&self) -> SimElement {
        let sample = Sample::from(self.sample);
        let mut builder = match &self.text {
            Some(text) => sample.builder_with_text(text.clone()),
            None => sample.builder(),
        };
        if let Some(mode) = self.writing_mode {
            builder = builder.writing_mode(mode);
        }
        if let Some(container) = self.container {
            builder = builder.container(container);
        }
        if let Some(padding) = self.padding {
            builder = builder.padding(padding);
        }
        if let Some(advance) = self.advance {
            builder = builder.advance(advance);
        }
        builder = match self.line_height {
            Some(LineHeight::Normal) => builder.normal_line_height(),
            Some(LineHeight::Length(length)) => builder.line_height(length),
            None => builder,
        };
        builder.build()
    }

    fn interval(&self) -> Duration {
        let config = match self.interval_ms {
            Some(ms) => BalanceConfig::default().with_interval(Duration::from_millis(ms)),
            None => BalanceConfig::from_env(),
        };
        config.validated().interval
    }
}

/// Lines of the element at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub container: f64,
    pub max_inline_size: Option<f64>,
    pub line_count: usize,
    pub lines: Vec<String>,
}

impl Snapshot {
    fn capture(el: &SimElement) -> Self {
        Self {
            container: el.container(),
            max_inline_size: el.max_inline_size(),
            line_count: el.line_count(),
            lines: el.lines(),
        }
    }
}

/// Serializable view of a [`BalanceOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OutcomeReport {
    Converged {
        constraint: f64,
        axis: PhysicalAxis,
        iterations: u32,
    },
    SingleLine {
        line_height: f64,
    },
    Skipped {
        reason: String,
    },
}

impl From<&BalanceOutcome> for OutcomeReport {
    fn from(outcome: &BalanceOutcome) -> Self {
        match outcome {
            BalanceOutcome::Converged {
                constraint,
                axis,
                iterations,
                ..
            } => Self::Converged {
                constraint: *constraint,
                axis: *axis,
                iterations: *iterations,
            },
            BalanceOutcome::SingleLine { line_height, .. } => Self::SingleLine {
                line_height: *line_height,
            },
            BalanceOutcome::Skipped(err) => Self::Skipped {
                reason: err.to_string(),
            },
        }
    }
}

/// One pass run while replaying `--resize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResizePass {
    pub at_ms: u64,
    pub edge: &'static str,
    pub observed: Option<f64>,
    pub outcome: OutcomeReport,
}

/// Everything `balanced-preview` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewReport {
    pub writing_mode: WritingMode,
    pub interval_ms: u64,
    pub before: Snapshot,
    pub outcome: OutcomeReport,
    pub after: Snapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resize_passes: Vec<ResizePass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled: Option<Snapshot>,
}

/// Parse the process arguments and print a report to stdout.
pub fn run_from_env() -> Result<()> {
    let args = PreviewArgs::parse();
    let stdout = std::io::stdout();
    run(&args, &mut stdout.lock())
}

/// Balance as configured by `args` and write the report to `out`.
pub fn run(args: &PreviewArgs, out: &mut impl Write) -> Result<()> {
    let report = preview(args)?;
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_text(&report, out)?;
    }
    Ok(())
}

/// Balance as configured by `args`.
pub fn preview(args: &PreviewArgs) -> Result<PreviewReport> {
    args.validate()?;

    let el = args.build_element();
    let interval = args.interval();
    let writing_mode = el.computed_style().map_or(WritingMode::default(), |s| s.writing_mode);
    let before = Snapshot::capture(&el);

    let mut controller = TriggerController::new(el.clone(), SimResizeObserver::new(), interval);
    let start = Instant::now();
    let first = match controller.attach(start) {
        AttachOutcome::Attached(report) => report,
        AttachOutcome::AlreadyAttached => {
            return Err(PreviewError::NotAttached {
                reason: "already attached".to_string(),
            });
        }
        AttachOutcome::Declined(err) => {
            return Err(PreviewError::NotAttached {
                reason: err.to_string(),
            });
        }
    };
    let after = Snapshot::capture(&el);

    let mut resize_passes = Vec::new();
    let mut now = start + interval + FRAME;
    for &size in &args.resize {
        now += FRAME;
        if let Some(report) = controller.poll(now) {
            resize_passes.push(resize_pass(start, now, &report));
        }
        if let Some(entry) = el.resize_container(size)
            && let Some(report) = controller.notify_resize(entry, now)
        {
            resize_passes.push(resize_pass(start, now, &report));
        }
    }
    let settled = if args.resize.is_empty() {
        None
    } else {
        if let Some(deadline) = controller.next_deadline()
            && let Some(report) = controller.poll(deadline)
        {
            resize_passes.push(resize_pass(start, deadline, &report));
        }
        Some(Snapshot::capture(&el))
    };
    controller.detach();

    tracing::debug!(
        passes = controller.stats().passes,
        interval_ms = duration_ms(interval),
        "preview finished"
    );

    Ok(PreviewReport {
        writing_mode,
        interval_ms: duration_ms(interval),
        before,
        outcome: OutcomeReport::from(&first.outcome),
        after,
        resize_passes,
        settled,
    })
}

fn resize_pass(start: Instant, now: Instant, report: &PassReport) -> ResizePass {
    ResizePass {
        at_ms: duration_ms(now.duration_since(start)),
        edge: match report.edge {
            Edge::Leading => "leading",
            Edge::Trailing => "trailing",
        },
        observed: report.observed,
        outcome: OutcomeReport::from(&report.outcome),
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn write_text(report: &PreviewReport, out: &mut impl Write) -> Result<()> {
    writeln!(out, "writing-mode: {}", report.writing_mode)?;
    write_snapshot("before", &report.before, out)?;
    match &report.outcome {
        OutcomeReport::Converged {
            constraint,
            iterations,
            ..
        } => writeln!(out, "balanced at {constraint} after {iterations} probes")?,
        OutcomeReport::SingleLine { .. } => writeln!(out, "single line, left unbalanced")?,
        OutcomeReport::Skipped { reason } => writeln!(out, "skipped: {reason}")?,
    }
    write_snapshot("after", &report.after, out)?;

    for pass in &report.resize_passes {
        let observed = pass
            .observed
            .map_or_else(|| "-".to_string(), |size| size.to_string());
        writeln!(
            out,
            "+{}ms {} pass at parent {}: {:?}",
            pass.at_ms, pass.edge, observed, pass.outcome
        )?;
    }
    if let Some(settled) = &report.settled {
        write_snapshot("settled", settled, out)?;
    }
    Ok(())
}

fn write_snapshot(label: &str, snapshot: &Snapshot, out: &mut impl Write) -> Result<()> {
    let constraint = snapshot
        .max_inline_size
        .map_or_else(|| "none".to_string(), |size| size.to_string());
    writeln!(
        out,
        "{label}: parent {} / max-inline-size {constraint} / {} lines",
        snapshot.container, snapshot.line_count
    )?;
    let width = snapshot
        .lines
        .iter()
        .map(|line| crate::text_flow::display_width(line))
        .max()
        .unwrap_or(0);
    for line in &snapshot.lines {
        let pad = width - crate::text_flow::display_width(line);
        writeln!(out, "  |{line}{}|", " ".repeat(pad))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> PreviewArgs {
        let mut argv = vec!["balanced-preview"];
        argv.extend_from_slice(extra);
        PreviewArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn default_sample_balances() {
        let report = preview(&args(&[])).unwrap();
        assert_eq!(report.writing_mode, WritingMode::HorizontalTb);
        assert_eq!(report.before.line_count, report.after.line_count);
        assert_eq!(report.after.max_inline_size, Some(352.0));
        assert!(report.resize_passes.is_empty());
        assert!(report.settled.is_none());
    }

    #[test]
    fn vertical_sample_reports_vertical_axis() {
        let report = preview(&args(&["--sample", "vertical"])).unwrap();
        assert_eq!(report.writing_mode, WritingMode::VerticalRl);
        assert!(matches!(
            report.outcome,
            OutcomeReport::Converged {
                axis: PhysicalAxis::Vertical,
                ..
            }
        ));
    }

    #[test]
    fn writing_mode_flag_parses_css_names() {
        let parsed = args(&["--writing-mode", "vertical-lr", "--line-height", "normal"]);
        assert_eq!(parsed.writing_mode, Some(WritingMode::VerticalLr));
        assert_eq!(parsed.line_height, Some(LineHeight::Normal));
        assert!(PreviewArgs::try_parse_from(["balanced-preview", "--writing-mode", "diagonal"]).is_err());
    }

    #[test]
    fn negative_container_is_rejected() {
        let err = preview(&args(&["--container=-5"])).unwrap_err();
        assert!(matches!(err, PreviewError::InvalidArgument { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn resize_replay_ends_with_final_size() {
        let report = preview(&args(&["--resize", "420,400,380", "--interval-ms", "50"])).unwrap();
        let last = report.resize_passes.last().unwrap();
        assert_eq!(last.edge, "trailing");
        assert_eq!(last.observed, Some(380.0));
        assert_eq!(report.resize_passes.len(), 2);
        assert_eq!(report.resize_passes[0].edge, "leading");
        assert_eq!(report.resize_passes[0].observed, Some(420.0));
        let settled = report.settled.unwrap();
        assert_eq!(settled.container, 380.0);
        let applied = match last.outcome {
            OutcomeReport::Converged { constraint, .. } => Some(constraint),
            _ => None,
        };
        assert_eq!(settled.max_inline_size, applied);
    }

    #[test]
    fn custom_text_keeps_sample_metrics() {
        let report = preview(&args(&["--text", "Short"])).unwrap();
        assert_eq!(report.before.container, 480.0);
        assert_eq!(report.before.lines, vec!["Short".to_string()]);
        assert!(matches!(report.outcome, OutcomeReport::SingleLine { line_height } if line_height == 37.0));
    }

    #[test]
    fn text_report_shows_both_layouts() {
        let mut out = Vec::new();
        run(&args(&[]), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("before: parent 480"));
        assert!(text.contains("balanced at 352"));
        assert!(text.contains("after: parent 480 / max-inline-size 352"));
    }

    #[test]
    fn json_report_is_tagged() {
        let mut out = Vec::new();
        run(&args(&["--json"]), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["outcome"]["kind"], "converged");
        assert_eq!(value["outcome"]["constraint"], 352.0);
        assert_eq!(value["writing_mode"], "horizontal-tb");
        assert!(value.get("settled").is_none());
    }
}
