//! DriveMate Application Orchestration Layer
//!
//! This crate contains business logic use cases and runtime orchestration.

pub mod admin;
pub mod booking;
pub mod location;
pub mod profile;
pub mod session;
pub mod verification;

pub use booking::SubmitBooking;
pub use location::LocationPicker;
pub use session::SessionContainer;
pub use verification::EmailVerification;
