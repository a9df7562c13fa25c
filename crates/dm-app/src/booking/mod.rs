//! Booking submission: wizard terminal action to messaging-app handoff.

mod submit;

pub use submit::SubmitBooking;
