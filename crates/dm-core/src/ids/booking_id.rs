use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Booking row identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(String);

impl_id!(BookingId);
