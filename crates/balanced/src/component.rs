#![forbid(unsafe_code)]

//! The [`Balanced`] wrapper.
//!
//! # Lifecycle
//!
//! 1. [`render`](Balanced::render) describes the element the host should
//!    create.
//! 2. Once the host has it laid out, [`mount`](Balanced::mount) forwards the
//!    handle to every ref slot and attaches a [`TriggerController`], which
//!    balances immediately.
//! 3. The host feeds resize notifications and polls until
//!    [`unmount`](Balanced::unmount), which detaches and clears the slots.
//!
//! Changing the interval while mounted replaces the controller rather than
//! reconfiguring it; a controller's debounce window is fixed for its life.

use balanced_core::{BalanceConfig, LayoutTarget, ResizeEntry, ResizeObserver};
use balanced_runtime::{AttachOutcome, PassReport, TriggerController};
use web_time::{Duration, Instant};

use crate::element::{Attributes, ElementSpec};
use crate::merged_ref::MergedRef;

/// Caller-facing configuration for one [`Balanced`] element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedProps {
    /// Element tag to render. Default: `div`.
    pub tag: String,
    /// Debounce window between passes. Default: 50ms.
    pub interval: Duration,
    /// Forwarded to the rendered element untouched.
    pub attributes: Attributes,
}

impl Default for BalancedProps {
    fn default() -> Self {
        Self::from(BalanceConfig::default())
    }
}

impl From<BalanceConfig> for BalancedProps {
    fn from(config: BalanceConfig) -> Self {
        let config = config.validated();
        Self {
            tag: config.tag,
            interval: config.interval,
            attributes: Attributes::new(),
        }
    }
}

impl BalancedProps {
    /// Props from `BALANCED_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from(BalanceConfig::from_env())
    }

    /// Render as `tag` instead of `div`.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Forward an attribute to the rendered element.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The same values run through [`BalanceConfig::validated`].
    #[must_use]
    pub fn validated(self) -> Self {
        let config = BalanceConfig::default()
            .with_tag(self.tag)
            .with_interval(self.interval)
            .validated();
        Self {
            tag: config.tag,
            interval: config.interval,
            attributes: self.attributes,
        }
    }
}

/// Wraps a flowed-text element and keeps its lines balanced.
///
/// Generic over the host's element handle `T` and resize observer `O`, so the
/// same wrapper serves any element kind the host can measure.
pub struct Balanced<T: LayoutTarget, O: ResizeObserver> {
    props: BalancedProps,
    refs: MergedRef<T>,
    controller: Option<TriggerController<T, O>>,
}

impl<T: LayoutTarget, O: ResizeObserver> std::fmt::Debug for Balanced<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Balanced")
            .field("props", &self.props)
            .field("refs", &self.refs)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

impl<T: LayoutTarget, O: ResizeObserver> Default for Balanced<T, O> {
    fn default() -> Self {
        Self::new(BalancedProps::default())
    }
}

impl<T: LayoutTarget, O: ResizeObserver> Balanced<T, O> {
    #[must_use]
    pub fn new(props: BalancedProps) -> Self {
        Self {
            props: props.validated(),
            refs: MergedRef::new(),
            controller: None,
        }
    }

    /// Also hand the mounted element to `slot` (and `None` on unmount).
    #[must_use]
    pub fn forward_ref(mut self, slot: impl FnMut(Option<&T>) + 'static) -> Self {
        self.refs.push(slot);
        self
    }

    #[must_use]
    pub fn props(&self) -> &BalancedProps {
        &self.props
    }

    /// Describe the element to create.
    #[must_use]
    pub fn render(&self) -> ElementSpec {
        ElementSpec {
            tag: self.props.tag.clone(),
            attributes: self.props.attributes.clone(),
        }
    }

    /// Take over a laid-out element and balance it.
    ///
    /// A previously mounted element is unmounted first. If the host cannot
    /// observe resizes the element stays mounted but unbalanced.
    pub fn mount(&mut self, target: T, observer: O, now: Instant) -> AttachOutcome {
        self.unmount();
        self.refs.set(Some(&target));

        let mut controller = TriggerController::new(target, observer, self.props.interval);
        let outcome = controller.attach(now);
        if let AttachOutcome::Declined(err) = &outcome {
            tracing::debug!(error = %err, tag = %self.props.tag, "mounted without balancing");
        }
        self.controller = Some(controller);
        outcome
    }

    /// Detach and clear every ref slot. No-op when not mounted.
    pub fn unmount(&mut self) {
        if let Some(mut controller) = self.controller.take() {
            controller.detach();
            self.refs.set(None);
        }
    }

    /// Swap in a different element (the host re-created it).
    pub fn replace(&mut self, target: T, observer: O, now: Instant) -> AttachOutcome {
        self.mount(target, observer, now)
    }

    /// Forward a resize notification to the mounted controller.
    pub fn notify_resize(&mut self, entry: ResizeEntry, now: Instant) -> Option<PassReport> {
        self.controller.as_mut()?.notify_resize(entry, now)
    }

    /// Run a due trailing pass.
    pub fn poll(&mut self, now: Instant) -> Option<PassReport> {
        self.controller.as_mut()?.poll(now)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.as_ref()?.next_deadline()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.controller.is_some()
    }

    /// The live controller, if mounted.
    #[must_use]
    pub fn controller(&self) -> Option<&TriggerController<T, O>> {
        self.controller.as_ref()
    }
}

impl<T: LayoutTarget + Clone, O: ResizeObserver + Clone> Balanced<T, O> {
    /// Change the debounce window.
    ///
    /// When mounted, the current controller is detached and a new one
    /// attached with the new window, which runs a leading pass. Returns that
    /// attach outcome, or `None` when not mounted.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) -> Option<AttachOutcome> {
        self.props = self.props.clone().interval(interval).validated();
        let (target, observer) = {
            let controller = self.controller.as_ref()?;
            (controller.target().clone(), controller.observer().clone())
        };
        Some(self.mount(target, observer, now))
    }
}

impl<T: LayoutTarget, O: ResizeObserver> Drop for Balanced<T, O> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_props_render_a_div() {
        let props = BalancedProps::default();
        assert_eq!(props.tag, "div");
        assert_eq!(props.interval, Duration::from_millis(50));
        assert!(props.attributes.is_empty());
    }

    #[test]
    fn props_are_validated() {
        let props = BalancedProps::default()
            .tag("not a tag")
            .interval(Duration::from_secs(60))
            .validated();
        assert_eq!(props.tag, "div");
        assert_eq!(props.interval, Duration::from_millis(1_000));
    }

    #[test]
    fn attributes_pass_through() {
        let props = BalancedProps::default().tag("h1").attr("id", "title");
        assert_eq!(props.clone().validated().attributes, props.attributes);
    }
}
