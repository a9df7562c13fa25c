//! Session state: the single process-wide holder of the current identity.

mod container;

pub use container::SessionContainer;
