//! Email verification flow: one-time-code send/verify with resend cooldown.

mod email;

pub use email::EmailVerification;
