#![forbid(unsafe_code)]

//! Layout: the balancing pass.
//!
//! # Role in balanced
//! `balanced-layout` finds the narrowest inline size at which an element
//! still needs no more lines than it does unconstrained, and applies it as
//! `max-inline-size`. Lines then come out at roughly equal length instead of
//! leaving a short last line.
//!
//! # How it fits in the system
//! Works against any [`balanced_core::LayoutTarget`]. The pass is synchronous
//! and stateless between runs; `balanced-runtime` decides when to call it.

pub mod balancer;
pub mod search;

pub use balancer::{BalanceOutcome, Balancer, balance};
pub use search::{INITIAL_GUESS_RATIO, MAX_SEARCH_EXTENT, SearchBounds};
