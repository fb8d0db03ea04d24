#![forbid(unsafe_code)]

//! Re-balances a target whenever its layout parent changes size.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐ attach ┌──────┐ resize (window open) ┌─────────────┐
//! │ Unattached │───────▶│ Idle │─────────────────────▶│ PendingPass │
//! └────────────┘        └──────┘◀─────────────────────└─────────────┘
//!       │                  │      poll after deadline        │
//!       │ detach           │ detach                          │ detach
//!       ▼                  ▼                                 ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Detached (terminal)                       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Attaching subscribes the resize observer to the target's layout parent
//! and runs a leading pass right away, so the first paint is already
//! balanced. Notifications carrying an unchanged inline size are dropped;
//! the rest go through a [`Debouncer`], so a burst produces one leading and
//! one trailing pass. Detaching disconnects the observer and cancels the
//! trailing pass. A detached controller never runs another pass; mount a new
//! one instead.
//!
//! Every failure is contained here. A host without style readback or resize
//! notifications makes [`TriggerController::attach`] decline, and the text
//! simply stays unbalanced.

use balanced_core::{BalanceConfig, HostError, LayoutTarget, NodeId, ResizeEntry, ResizeObserver};
use balanced_layout::{BalanceOutcome, Balancer};
use web_time::{Duration, Instant};

use crate::debounce::{Debouncer, Edge};

/// Externally visible controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerState {
    /// Created, not yet attached.
    Unattached,
    /// Attached, nothing queued.
    Idle,
    /// Attached, a trailing pass is queued.
    PendingPass,
    /// Detached for good.
    Detached,
}

/// One pass the controller ran.
#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    /// Leading or trailing edge of the burst.
    pub edge: Edge,
    /// Parent inline size last observed when the pass was requested.
    pub observed: Option<f64>,
    pub outcome: BalanceOutcome,
}

/// Result of [`TriggerController::attach`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttachOutcome {
    /// Now observing; the leading pass ran.
    Attached(PassReport),
    /// Was already attached; nothing happened.
    AlreadyAttached,
    /// Could not attach; the target stays unbalanced.
    Declined(HostError),
}

impl AttachOutcome {
    /// Whether the controller is attached after the call.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_) | Self::AlreadyAttached)
    }
}

/// Counters for tests and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerStats {
    /// Passes run, leading and trailing.
    pub passes: usize,
    /// Notifications that requested a pass.
    pub accepted: usize,
    /// Notifications dropped for carrying the last observed size.
    pub unchanged: usize,
    /// Notifications dropped for arriving while not attached, or for another node.
    pub ignored: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unattached,
    Attached { parent: NodeId },
    Detached,
}

/// Drives balancing passes for one mounted target.
#[derive(Debug)]
pub struct TriggerController<T: LayoutTarget, O: ResizeObserver> {
    target: T,
    observer: O,
    balancer: Balancer,
    debouncer: Debouncer<Option<f64>>,
    observed: Option<f64>,
    phase: Phase,
    stats: TriggerStats,
}

impl<T: LayoutTarget, O: ResizeObserver> TriggerController<T, O> {
    /// Create an unattached controller with the given debounce window.
    #[must_use]
    pub fn new(target: T, observer: O, interval: Duration) -> Self {
        Self {
            target,
            observer,
            balancer: Balancer::default(),
            debouncer: Debouncer::new(interval),
            observed: None,
            phase: Phase::Unattached,
            stats: TriggerStats::default(),
        }
    }

    /// Create an unattached controller from a config.
    #[must_use]
    pub fn with_config(target: T, observer: O, config: &BalanceConfig) -> Self {
        Self::new(target, observer, config.interval)
    }

    /// Use a custom balancer (for example a different first probe).
    #[must_use]
    pub fn balancer(mut self, balancer: Balancer) -> Self {
        self.balancer = balancer;
        self
    }

    /// Start observing the target's layout parent and run the leading pass.
    pub fn attach(&mut self, now: Instant) -> AttachOutcome {
        match self.phase {
            Phase::Attached { .. } => return AttachOutcome::AlreadyAttached,
            Phase::Detached => return AttachOutcome::Declined(HostError::Detached),
            Phase::Unattached => {}
        }

        let Some(parent) = self.target.layout_parent() else {
            tracing::debug!("not attaching: target has no layout parent");
            return AttachOutcome::Declined(HostError::Unmeasurable("no layout parent"));
        };

        if let Err(err @ HostError::CapabilityUnavailable(_)) = self.target.computed_style() {
            tracing::debug!(error = %err, "not attaching: cannot measure target");
            return AttachOutcome::Declined(err);
        }

        if let Err(err) = self.observer.observe(parent) {
            tracing::debug!(error = %err, %parent, "not attaching: cannot observe parent");
            return AttachOutcome::Declined(err);
        }

        tracing::debug!(%parent, interval_ms = self.interval_ms(), "attached");
        self.phase = Phase::Attached { parent };
        self.observed = None;

        // Opens the leading window; an unattached debouncer has nothing queued.
        self.debouncer.cancel();
        let _ = self.debouncer.trigger(self.observed, now);
        AttachOutcome::Attached(self.run_pass(Edge::Leading, self.observed))
    }

    /// Deliver a resize notification for the observed parent.
    ///
    /// Returns the report if a leading pass ran.
    pub fn notify_resize(&mut self, entry: ResizeEntry, now: Instant) -> Option<PassReport> {
        let Phase::Attached { parent } = self.phase else {
            self.stats.ignored += 1;
            tracing::trace!(node = %entry.node, "resize ignored: not attached");
            return None;
        };
        if entry.node != parent {
            self.stats.ignored += 1;
            tracing::trace!(node = %entry.node, %parent, "resize ignored: not the observed parent");
            return None;
        }
        if self.observed == Some(entry.inline_size) {
            self.stats.unchanged += 1;
            tracing::trace!(inline_size = entry.inline_size, "resize ignored: size unchanged");
            return None;
        }

        self.observed = Some(entry.inline_size);
        self.stats.accepted += 1;
        self.request(now)
    }

    /// Run the trailing pass if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<PassReport> {
        if !self.is_attached() {
            return None;
        }
        let observed = self.debouncer.poll(now)?;
        Some(self.run_pass(Edge::Trailing, observed))
    }

    /// Run a queued trailing pass immediately.
    pub fn flush(&mut self) -> Option<PassReport> {
        if !self.is_attached() {
            return None;
        }
        let observed = self.debouncer.flush()?;
        Some(self.run_pass(Edge::Trailing, observed))
    }

    /// When the host should call [`poll`](Self::poll) next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.is_attached() {
            self.debouncer.next_deadline()
        } else {
            None
        }
    }

    /// Stop observing and cancel any queued pass. Terminal.
    pub fn detach(&mut self) {
        if let Phase::Attached { parent } = self.phase {
            self.observer.disconnect();
            tracing::debug!(%parent, pending = self.debouncer.is_pending(), "detached");
        }
        self.debouncer.cancel();
        self.observed = None;
        self.phase = Phase::Detached;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TriggerState {
        match self.phase {
            Phase::Unattached => TriggerState::Unattached,
            Phase::Detached => TriggerState::Detached,
            Phase::Attached { .. } if self.debouncer.is_pending() => TriggerState::PendingPass,
            Phase::Attached { .. } => TriggerState::Idle,
        }
    }

    /// Whether the controller is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self.phase, Phase::Attached { .. })
    }

    /// Last observed parent inline size.
    #[must_use]
    pub fn observed_size(&self) -> Option<f64> {
        self.observed
    }

    /// The debounce window.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.debouncer.interval()
    }

    /// The balanced target.
    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Counters.
    #[must_use]
    pub fn stats(&self) -> TriggerStats {
        self.stats
    }

    fn request(&mut self, now: Instant) -> Option<PassReport> {
        let observed = self.debouncer.trigger(self.observed, now)?;
        Some(self.run_pass(Edge::Leading, observed))
    }

    fn run_pass(&mut self, edge: Edge, observed: Option<f64>) -> PassReport {
        let outcome = self.balancer.run(&mut self.target);
        self.stats.passes += 1;
        tracing::debug!(
            ?edge,
            observed,
            constraint = outcome.constraint(),
            skipped = outcome.is_skipped(),
            "balancing pass finished"
        );
        PassReport {
            edge,
            observed,
            outcome,
        }
    }

    fn interval_ms(&self) -> u64 {
        u64::try_from(self.debouncer.interval().as_millis()).unwrap_or(u64::MAX)
    }
}

impl<T: LayoutTarget, O: ResizeObserver> Drop for TriggerController<T, O> {
    fn drop(&mut self) {
        if self.is_attached() {
            self.detach();
        }
    }
}
