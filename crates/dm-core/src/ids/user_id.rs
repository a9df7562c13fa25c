use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Remote account / profile row identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl_id!(UserId);
