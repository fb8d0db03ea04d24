#![forbid(unsafe_code)]

//! Leading + trailing debounce driven by host-supplied time.
//!
//! # State Machine
//!
//! ```text
//!              trigger (fires: leading)
//!   ┌──────┐ ─────────────────────────▶ ┌─────────────────────────┐
//!   │ Idle │                            │ Waiting { deadline,     │◀─┐ trigger before deadline
//!   └──────┘ ◀───────────────────────── │           trailing }    │──┘ (re-arm, keep latest args)
//!              poll at/after deadline   └─────────────────────────┘
//!              (fires: trailing, if any)
//! ```
//!
//! The first call of a burst fires immediately. Calls inside the window
//! replace the trailing snapshot and push the deadline out by one interval.
//! Once the host polls at or after the deadline, the latest snapshot fires
//! once, if any call arrived after the leading one.
//!
//! No timers or threads are involved: the host passes `now` to every call and
//! asks [`Debouncer::next_deadline`] when to poll again.
//!
//! # Example
//!
//! ```
//! use web_time::{Duration, Instant};
//! use balanced_runtime::debounce::Debouncer;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(50));
//! let t = Instant::now();
//!
//! assert_eq!(debouncer.trigger(1, t), Some(1)); // leading
//! assert_eq!(debouncer.trigger(2, t + Duration::from_millis(10)), None);
//! assert_eq!(debouncer.trigger(3, t + Duration::from_millis(20)), None);
//!
//! assert_eq!(debouncer.poll(t + Duration::from_millis(60)), None); // re-armed at 20ms
//! assert_eq!(debouncer.poll(t + Duration::from_millis(70)), Some(3)); // trailing
//! ```

use web_time::{Duration, Instant};

/// Which side of a burst an invocation fired on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// First call of a burst, fired immediately.
    Leading,
    /// Last call of a burst, fired once the burst settled.
    Trailing,
}

#[derive(Debug, Clone)]
enum DebounceState<A> {
    Idle,
    Waiting {
        deadline: Instant,
        trailing: Option<A>,
    },
}

/// Coalesces calls into one leading and at most one trailing invocation per
/// burst.
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    interval: Duration,
    state: DebounceState<A>,
}

impl<A> Debouncer<A> {
    /// Create an idle debouncer.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: DebounceState::Idle,
        }
    }

    /// The debounce window.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register a call.
    ///
    /// Returns `Some(args)` when the call fires immediately (leading edge).
    /// A trailing call that is overdue because the host has not polled yet is
    /// folded into this one: `args` is the newer snapshot anyway.
    pub fn trigger(&mut self, args: A, now: Instant) -> Option<A> {
        let deadline = now + self.interval;
        if let DebounceState::Waiting {
            deadline: pending,
            trailing,
        } = &mut self.state
            && now < *pending
        {
            *pending = deadline;
            *trailing = Some(args);
            return None;
        }

        self.state = DebounceState::Waiting {
            deadline,
            trailing: None,
        };
        Some(args)
    }

    /// Fire the trailing call if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        let due = matches!(
            &self.state,
            DebounceState::Waiting { deadline, .. } if now >= *deadline
        );
        if due { self.settle() } else { None }
    }

    /// Fire a pending trailing call now, regardless of the deadline.
    pub fn flush(&mut self) -> Option<A> {
        self.settle()
    }

    /// Drop any pending call and return to idle.
    pub fn cancel(&mut self) {
        self.state = DebounceState::Idle;
    }

    /// Whether a trailing call is queued.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(
            self.state,
            DebounceState::Waiting {
                trailing: Some(_),
                ..
            }
        )
    }

    /// Whether a burst window is open (with or without a queued call).
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        matches!(self.state, DebounceState::Waiting { .. })
    }

    /// When the host should call [`poll`](Self::poll) next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.state {
            DebounceState::Waiting { deadline, .. } => Some(*deadline),
            DebounceState::Idle => None,
        }
    }

    fn settle(&mut self) -> Option<A> {
        match std::mem::replace(&mut self.state, DebounceState::Idle) {
            DebounceState::Waiting { trailing, .. } => trailing,
            DebounceState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_10: Duration = Duration::from_millis(10);
    const MS_50: Duration = Duration::from_millis(50);

    fn debouncer() -> Debouncer<u32> {
        Debouncer::new(MS_50)
    }

    #[test]
    fn first_call_fires_immediately() {
        let mut d = debouncer();
        assert_eq!(d.trigger(1, Instant::now()), Some(1));
        assert!(d.is_waiting());
        assert!(!d.is_pending());
    }

    #[test]
    fn lone_call_has_no_trailing_edge() {
        let mut d = debouncer();
        let t = Instant::now();
        d.trigger(1, t);
        assert_eq!(d.poll(t + MS_50), None);
        assert!(!d.is_waiting());
    }

    #[test]
    fn burst_fires_leading_and_latest_trailing() {
        let mut d = debouncer();
        let t = Instant::now();
        assert_eq!(d.trigger(1, t), Some(1));
        assert_eq!(d.trigger(2, t + MS_10), None);
        assert_eq!(d.trigger(3, t + 2 * MS_10), None);
        assert!(d.is_pending());

        assert_eq!(d.poll(t + 2 * MS_10 + MS_50 - Duration::from_millis(1)), None);
        assert_eq!(d.poll(t + 2 * MS_10 + MS_50), Some(3));
        assert!(!d.is_waiting());
    }

    #[test]
    fn calls_inside_window_push_deadline_out() {
        let mut d = debouncer();
        let t = Instant::now();
        d.trigger(1, t);
        d.trigger(2, t + Duration::from_millis(40));
        assert_eq!(d.next_deadline(), Some(t + Duration::from_millis(90)));
    }

    #[test]
    fn call_after_window_is_a_new_leading_edge() {
        let mut d = debouncer();
        let t = Instant::now();
        d.trigger(1, t);
        assert_eq!(d.poll(t + MS_50), None);
        assert_eq!(d.trigger(2, t + 2 * MS_50), Some(2));
    }

    #[test]
    fn overdue_trailing_folds_into_next_leading() {
        let mut d = debouncer();
        let t = Instant::now();
        d.trigger(1, t);
        d.trigger(2, t + MS_10);
        // Host never polled; the next call arrives long after the deadline.
        assert_eq!(d.trigger(3, t + 10 * MS_50), Some(3));
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_drops_pending_call() {
        let mut d = debouncer();
        let t = Instant::now();
        d.trigger(1, t);
        d.trigger(2, t + MS_10);
        d.cancel();
        assert_eq!(d.poll(t + 10 * MS_50), None);
        assert_eq!(d.next_deadline(), None);
    }

    #[test]
    fn flush_fires_pending_call_early() {
        let mut d = debouncer();
        let t = Instant::now();
        d.trigger(1, t);
        d.trigger(2, t + MS_10);
        assert_eq!(d.flush(), Some(2));
        assert_eq!(d.flush(), None);
    }

    #[test]
    fn zero_interval_fires_every_call() {
        let mut d = Debouncer::new(Duration::ZERO);
        let t = Instant::now();
        assert_eq!(d.trigger(1, t), Some(1));
        assert_eq!(d.trigger(2, t), Some(2));
    }
}
