#![forbid(unsafe_code)]

//! Capabilities the embedding layout engine supplies for each target.
//!
//! Nothing here performs layout. A host (a browser binding, a native toolkit,
//! or the simulated engine in `balanced-harness`) implements these traits and
//! the balancing crates drive them.
//!
//! All extents are in the same layout unit (device-independent pixels) and
//! are expected to reflect the target's *current* style synchronously: after
//! [`LayoutTarget::set_max_inline_size`] returns, the next extent query sees
//! the reflowed layout.

use std::fmt;

use crate::geometry::{BoxSizing, PhysicalAxis};
use crate::style::ComputedStyle;

/// Opaque identifier for a node in the host's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw host identifier.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw host identifier.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failure reported by a host capability.
///
/// These never escape the balancing crates: a pass that hits one is skipped
/// and the text stays unbalanced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The target has no usable layout (not laid out yet, zero-size parent,
    /// non-finite extents).
    Unmeasurable(&'static str),
    /// The host lacks a primitive this crate needs.
    CapabilityUnavailable(&'static str),
    /// The target left the tree.
    Detached,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmeasurable(what) => write!(f, "unmeasurable: {what}"),
            Self::CapabilityUnavailable(what) => write!(f, "capability unavailable: {what}"),
            Self::Detached => f.write_str("target detached"),
        }
    }
}

impl std::error::Error for HostError {}

/// Style readback and mutation for one element.
pub trait LayoutTarget {
    /// Effective computed style.
    fn computed_style(&self) -> Result<ComputedStyle, HostError>;

    /// Padding-box extent along `axis` (content plus padding, no border).
    fn client_extent(&self, axis: PhysicalAxis) -> Result<f64, HostError>;

    /// Border-box extent along `axis`.
    fn offset_extent(&self, axis: PhysicalAxis) -> Result<f64, HostError>;

    /// Set (`Some`) or clear (`None`) the `max-inline-size` constraint.
    ///
    /// The host maps the logical property onto the physical axis for the
    /// element's writing mode.
    fn set_max_inline_size(&mut self, size: Option<f64>) -> Result<(), HostError>;

    /// The currently applied `max-inline-size`, if any.
    fn max_inline_size(&self) -> Option<f64>;

    /// Force the sizing model used by the constraint.
    fn set_box_sizing(&mut self, sizing: BoxSizing) -> Result<(), HostError>;

    /// The node whose size changes should re-trigger balancing, if the target
    /// is attached to one.
    fn layout_parent(&self) -> Option<NodeId>;
}

impl<T: LayoutTarget + ?Sized> LayoutTarget for &mut T {
    fn computed_style(&self) -> Result<ComputedStyle, HostError> {
        (**self).computed_style()
    }

    fn client_extent(&self, axis: PhysicalAxis) -> Result<f64, HostError> {
        (**self).client_extent(axis)
    }

    fn offset_extent(&self, axis: PhysicalAxis) -> Result<f64, HostError> {
        (**self).offset_extent(axis)
    }

    fn set_max_inline_size(&mut self, size: Option<f64>) -> Result<(), HostError> {
        (**self).set_max_inline_size(size)
    }

    fn max_inline_size(&self) -> Option<f64> {
        (**self).max_inline_size()
    }

    fn set_box_sizing(&mut self, sizing: BoxSizing) -> Result<(), HostError> {
        (**self).set_box_sizing(sizing)
    }

    fn layout_parent(&self) -> Option<NodeId> {
        (**self).layout_parent()
    }
}

/// A size-change notification for an observed node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEntry {
    pub node: NodeId,
    /// New border-box inline size.
    pub inline_size: f64,
}

impl ResizeEntry {
    /// Create a new entry.
    #[inline]
    #[must_use]
    pub const fn new(node: NodeId, inline_size: f64) -> Self {
        Self { node, inline_size }
    }
}

/// Subscription to border-box size changes of one node.
///
/// Notifications themselves are delivered by the host as [`ResizeEntry`]
/// values; this trait only manages the subscription.
pub trait ResizeObserver {
    /// Start observing `node`.
    fn observe(&mut self, node: NodeId) -> Result<(), HostError>;

    /// Stop all observation. No notification may be delivered afterwards.
    fn disconnect(&mut self);
}

impl<O: ResizeObserver + ?Sized> ResizeObserver for Box<O> {
    fn observe(&mut self, node: NodeId) -> Result<(), HostError> {
        (**self).observe(node)
    }

    fn disconnect(&mut self) {
        (**self).disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_display() {
        assert_eq!(
            HostError::Unmeasurable("zero-size parent").to_string(),
            "unmeasurable: zero-size parent"
        );
        assert_eq!(
            HostError::CapabilityUnavailable("resize observer").to_string(),
            "capability unavailable: resize observer"
        );
        assert_eq!(HostError::Detached.to_string(), "target detached");
    }

    #[test]
    fn node_id_round_trip() {
        let id = NodeId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "#42");
    }
}
