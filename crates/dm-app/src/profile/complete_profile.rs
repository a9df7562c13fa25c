use std::sync::Arc;

use tracing::info;

use dm_core::errors::SessionError;
use dm_core::identity::{Identity, IdentityPatch, Role};
use dm_core::input::is_valid_phone;
use dm_core::ports::ProfileRepositoryPort;
use dm_core::profile::ProfilePatch;

use crate::session::SessionContainer;

/// Fields collected by the post-signup profile form. The address block is
/// only stored for drivers.
#[derive(Debug, Clone, Default)]
pub struct ProfileCompletionInput {
    pub phone: String,
    pub experience: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

/// Persist the completed profile and refresh the session identity.
///
/// Completion is written as 100; the percentage is a display-only value
/// and never gates access.
pub struct CompleteProfile {
    profiles: Arc<dyn ProfileRepositoryPort>,
    session: Arc<SessionContainer>,
}

impl CompleteProfile {
    pub fn new(profiles: Arc<dyn ProfileRepositoryPort>, session: Arc<SessionContainer>) -> Self {
        Self { profiles, session }
    }

    pub async fn execute(&self, input: ProfileCompletionInput) -> Result<Identity, SessionError> {
        let identity = self.session.current().ok_or(SessionError::NoActiveSession)?;
        if !is_valid_phone(&input.phone) {
            return Err(SessionError::Validation(
                "enter a 10-digit phone number".to_string(),
            ));
        }

        let mut patch = ProfilePatch {
            phone: Some(input.phone.clone()),
            profile_completion: Some(100),
            ..ProfilePatch::default()
        };
        if identity.role == Role::Driver {
            patch.experience = Some(input.experience);
            patch.address = Some(input.address);
            patch.city = Some(input.city);
            patch.pincode = Some(input.pincode);
        }

        self.profiles.update(&identity.id, &patch).await?;
        info!(user = %identity.id, "profile completed");

        self.session.update_identity(IdentityPatch {
            phone: Some(input.phone),
            profile_completion: Some(100),
            ..IdentityPatch::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use dm_core::errors::GatewayError;
    use dm_core::ids::UserId;
    use dm_core::ports::{AuthGatewayPort, SignUpRequest};
    use dm_core::profile::Profile;

    struct StubGateway {
        role: Role,
    }

    #[async_trait]
    impl AuthGatewayPort for StubGateway {
        async fn sign_up(&self, _request: &SignUpRequest) -> Result<Identity, GatewayError> {
            unimplemented!()
        }

        async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity, GatewayError> {
            Ok(Identity {
                id: UserId::from("u-1"),
                name: "Ravi".to_string(),
                email: Some(email.to_string()),
                phone: String::new(),
                role: self.role,
                verified: false,
                profile_completion: 20,
            })
        }

        async fn send_verification_code(&self, _email: &str) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn verify_code(&self, _email: &str, _code: &str) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn request_password_reset(&self, _email: &str) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn reset_password(
            &self,
            _email: &str,
            _code: &str,
            _new_password: &str,
        ) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    struct RecordingProfiles {
        patches: Mutex<Vec<ProfilePatch>>,
    }

    #[async_trait]
    impl ProfileRepositoryPort for RecordingProfiles {
        async fn get(&self, _id: &UserId) -> Result<Profile, GatewayError> {
            Ok(Profile::default())
        }

        async fn update(
            &self,
            _id: &UserId,
            patch: &ProfilePatch,
        ) -> Result<Profile, GatewayError> {
            self.patches.lock().unwrap().push(patch.clone());
            Ok(Profile::default())
        }

        async fn list_drivers(&self) -> Result<Vec<Profile>, GatewayError> {
            Ok(vec![])
        }

        async fn count_customers_since(&self, _since: DateTime<Utc>) -> Result<u64, GatewayError> {
            Ok(0)
        }
    }

    async fn setup(role: Role) -> (CompleteProfile, Arc<RecordingProfiles>, Arc<SessionContainer>) {
        let session = Arc::new(SessionContainer::new(Arc::new(StubGateway { role })));
        session.sign_in("ravi@example.com", "secret").await.unwrap();
        let profiles = Arc::new(RecordingProfiles {
            patches: Mutex::new(vec![]),
        });
        (
            CompleteProfile::new(profiles.clone(), session.clone()),
            profiles,
            session,
        )
    }

    fn input() -> ProfileCompletionInput {
        ProfileCompletionInput {
            phone: "9876543210".to_string(),
            experience: "5 years".to_string(),
            address: "12 Gandhi Road".to_string(),
            city: "Chennai".to_string(),
            pincode: "600001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_driver_completion_stores_address_block() {
        let (use_case, profiles, session) = setup(Role::Driver).await;

        let identity = use_case.execute(input()).await.unwrap();
        assert_eq!(identity.profile_completion, 100);
        assert_eq!(identity.phone, "9876543210");
        assert_eq!(session.current().unwrap().profile_completion, 100);

        let patches = profiles.patches.lock().unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].city.as_deref(), Some("Chennai"));
        assert_eq!(patches[0].profile_completion, Some(100));
    }

    #[tokio::test]
    async fn test_customer_completion_skips_driver_fields() {
        let (use_case, profiles, _session) = setup(Role::Customer).await;

        use_case.execute(input()).await.unwrap();
        let patches = profiles.patches.lock().unwrap();
        assert_eq!(patches[0].experience, None);
        assert_eq!(patches[0].address, None);
        assert_eq!(patches[0].phone.as_deref(), Some("9876543210"));
    }

    #[tokio::test]
    async fn test_completion_requires_session_and_valid_phone() {
        let session = Arc::new(SessionContainer::new(Arc::new(StubGateway {
            role: Role::Customer,
        })));
        let profiles = Arc::new(RecordingProfiles {
            patches: Mutex::new(vec![]),
        });
        let use_case = CompleteProfile::new(profiles.clone(), session.clone());

        let err = use_case.execute(input()).await.unwrap_err();
        assert_eq!(err, SessionError::NoActiveSession);

        session.sign_in("a@b.co", "secret").await.unwrap();
        let err = use_case
            .execute(ProfileCompletionInput {
                phone: "12345".to_string(),
                ..input()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(profiles.patches.lock().unwrap().is_empty());
    }
}
