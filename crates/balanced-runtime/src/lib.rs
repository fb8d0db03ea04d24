#![forbid(unsafe_code)]

//! Runtime: when to balance.
//!
//! # Role in balanced
//! `balanced-runtime` owns the lifecycle of a mounted element. It subscribes
//! to size changes of the element's layout parent, drops notifications that
//! did not change the inline size, and debounces the rest so a drag-resize
//! produces one pass when it starts and one when it settles.
//!
//! # How it fits in the system
//! The host calls [`TriggerController::notify_resize`] from its resize
//! callback and [`TriggerController::poll`] from its timer or frame loop.
//! Passes themselves are [`balanced_layout::Balancer`] runs.

pub mod controller;
pub mod debounce;

pub use controller::{AttachOutcome, PassReport, TriggerController, TriggerState, TriggerStats};
pub use debounce::{Debouncer, Edge};
