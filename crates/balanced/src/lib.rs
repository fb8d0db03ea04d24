#![forbid(unsafe_code)]

//! Balanced text public facade.
//!
//! Wrap any flowed-text element in [`Balanced`] and its lines come out at
//! roughly equal length: the element's `max-inline-size` is shrunk to the
//! narrowest value that does not add a line, and recomputed whenever its
//! parent changes size.
//!
//! ```ignore
//! use balanced::prelude::*;
//!
//! let mut heading = Balanced::new(BalancedProps::default().tag("h1"));
//! let spec = heading.render();
//! // ...host materializes `spec`, then hands over the live element...
//! heading.mount(element, observer, Instant::now());
//! ```

pub mod component;
pub mod element;
pub mod merged_ref;

pub use component::{Balanced, BalancedProps};
pub use element::{Attributes, ElementSpec};
pub use merged_ref::{MergedRef, RefSlot};

// --- Re-exports ------------------------------------------------------------

pub use balanced_core::{
    BalanceConfig, ComputedStyle, HostError, LayoutTarget, LineHeight, NodeId, PhysicalAxis,
    ResizeEntry, ResizeObserver, WritingMode,
};
pub use balanced_layout::{BalanceOutcome, Balancer, balance};
pub use balanced_runtime::{AttachOutcome, Edge, PassReport, TriggerController, TriggerState};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AttachOutcome, BalanceConfig, BalanceOutcome, Balanced, BalancedProps, ElementSpec,
        LayoutTarget, ResizeEntry, ResizeObserver, WritingMode, balance,
    };
    pub use web_time::{Duration, Instant};

    pub use crate::{core, layout, runtime};
}

pub use balanced_core as core;
pub use balanced_layout as layout;
pub use balanced_runtime as runtime;
