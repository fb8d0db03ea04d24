#![forbid(unsafe_code)]

//! Test harness and reference fixtures for balanced text layout.
//!
//! # Role in balanced
//! `balanced-harness` stands in for a real layout engine. [`sim::SimElement`]
//! reflows word-wrapped text synchronously on every measurement and records
//! what the balancer asked of it; [`observer::SimResizeObserver`] records the
//! controller's subscriptions. Tests, benches, and the `balanced-preview`
//! binary all run against these.
//! [`preview`] is the library half of that binary, and [`trace_capture`]
//! records what a run logged.

pub mod fixtures;
pub mod observer;
pub mod preview;
pub mod sim;
pub mod text_flow;
pub mod trace_capture;

pub use fixtures::Sample;
pub use observer::{ObserverLog, SimResizeObserver};
pub use sim::{SimCapabilities, SimElement, SimElementBuilder, SimStats};
