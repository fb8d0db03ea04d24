#![forbid(unsafe_code)]

//! Core: writing modes, style snapshots, and host capabilities.
//!
//! # Role in balanced
//! `balanced-core` is the boundary layer. It defines the vocabulary the
//! balancer and the trigger controller speak, and the traits an embedding
//! layout engine implements so they can measure and constrain an element.
//!
//! # Primary responsibilities
//! - **WritingMode**: logical-to-physical axis mapping.
//! - **ComputedStyle**: the style snapshot a pass reads.
//! - **LayoutTarget / ResizeObserver**: host capabilities.
//! - **BalanceConfig**: debounce interval and element tag.
//!
//! # How it fits in the system
//! `balanced-layout` runs the search against a [`LayoutTarget`];
//! `balanced-runtime` decides when to run it from [`ResizeEntry`]
//! notifications. Neither knows anything about the concrete host.

pub mod config;
pub mod geometry;
pub mod host;
pub mod style;

pub use config::BalanceConfig;
pub use geometry::{AxisEdges, BoxSizing, LogicalAxes, PhysicalAxis, WritingMode};
pub use host::{HostError, LayoutTarget, NodeId, ResizeEntry, ResizeObserver};
pub use style::{ComputedStyle, LineHeight};
