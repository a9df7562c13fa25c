//! Profile maintenance flows.

mod complete_profile;

pub use complete_profile::{CompleteProfile, ProfileCompletionInput};
