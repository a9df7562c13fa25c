//! Location picking over the geocoding service.

mod picker;

pub use picker::{LocationPicker, LocationSelection};
