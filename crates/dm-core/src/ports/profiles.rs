use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::GatewayError;
use crate::ids::UserId;
use crate::profile::{Profile, ProfilePatch};

/// Read/update access to the hosted `profiles` table.
#[async_trait]
pub trait ProfileRepositoryPort: Send + Sync {
    async fn get(&self, id: &UserId) -> Result<Profile, GatewayError>;

    /// Apply a partial update and return the stored row.
    async fn update(&self, id: &UserId, patch: &ProfilePatch) -> Result<Profile, GatewayError>;

    /// All driver rows, newest first.
    async fn list_drivers(&self) -> Result<Vec<Profile>, GatewayError>;

    /// Number of customer rows created at or after `since`.
    async fn count_customers_since(&self, since: DateTime<Utc>) -> Result<u64, GatewayError>;
}
