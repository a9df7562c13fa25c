use std::sync::Arc;

use tracing::info;

use dm_core::errors::SessionError;
use dm_core::identity::Role;
use dm_core::ids::UserId;
use dm_core::ports::ProfileRepositoryPort;
use dm_core::profile::{DocumentKind, Profile};

/// Approve or reject one driver document.
///
/// Reads the current row, sets the document's flag and writes the
/// recomputed aggregate in the same patch, so `documents_verified` is
/// always the AND of the four per-document flags.
pub struct VerifyDocument {
    profiles: Arc<dyn ProfileRepositoryPort>,
}

impl VerifyDocument {
    pub fn new(profiles: Arc<dyn ProfileRepositoryPort>) -> Self {
        Self { profiles }
    }

    pub async fn execute(
        &self,
        driver_id: &UserId,
        kind: DocumentKind,
        approve: bool,
    ) -> Result<Profile, SessionError> {
        let profile = self.profiles.get(driver_id).await?;
        if profile.role != Role::Driver {
            return Err(SessionError::Validation(
                "documents can only be reviewed for drivers".to_string(),
            ));
        }

        let patch = profile.review_document(kind, approve);
        let updated = self.profiles.update(driver_id, &patch).await?;
        info!(
            driver = %driver_id,
            document = kind.label(),
            approve,
            all_verified = updated.documents_verified,
            "document reviewed"
        );
        Ok(updated)
    }
}
