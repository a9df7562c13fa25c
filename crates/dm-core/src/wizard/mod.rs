//! Multi-step form state machines.
//!
//! Both flows share the same shape: an ordered step list, forward
//! transitions gated by per-step validation, ungated backward transitions,
//! and a terminal submission. [`Stepper`] carries the shared index
//! bookkeeping; the flow modules own the fields and predicates.

pub mod auth;
pub mod booking;

mod stepper;

pub use stepper::Stepper;
