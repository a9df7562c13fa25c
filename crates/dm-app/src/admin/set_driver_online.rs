use std::sync::Arc;

use tracing::info;

use dm_core::errors::SessionError;
use dm_core::ids::UserId;
use dm_core::ports::ProfileRepositoryPort;
use dm_core::profile::{Profile, ProfilePatch};

/// Activate or pause a driver from the admin roster.
pub struct SetDriverOnline {
    profiles: Arc<dyn ProfileRepositoryPort>,
}

impl SetDriverOnline {
    pub fn new(profiles: Arc<dyn ProfileRepositoryPort>) -> Self {
        Self { profiles }
    }

    pub async fn execute(&self, driver_id: &UserId, online: bool) -> Result<Profile, SessionError> {
        let updated = self
            .profiles
            .update(driver_id, &ProfilePatch::online(online))
            .await?;
        info!(driver = %driver_id, online, "driver availability changed");
        Ok(updated)
    }
}
