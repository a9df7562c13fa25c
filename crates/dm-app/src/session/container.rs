use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use dm_core::errors::SessionError;
use dm_core::identity::{Identity, IdentityPatch};
use dm_core::input::{is_valid_email, is_valid_phone, is_valid_signup_password};
use dm_core::ports::{AuthGatewayPort, SignUpRequest};

/// Process-wide source of truth for "who is the current actor".
///
/// Constructed once and handed to every component that needs it; never a
/// global. State lives in a watch channel, so every mutation is an atomic
/// replacement of the identity value and subscribers observe changes
/// without polling. Client-side validation runs before any gateway call,
/// so malformed input never reaches the network.
pub struct SessionContainer {
    gateway: Arc<dyn AuthGatewayPort>,
    state: watch::Sender<Option<Identity>>,
}

impl SessionContainer {
    pub fn new(gateway: Arc<dyn AuthGatewayPort>) -> Self {
        let (state, _) = watch::channel(None);
        Self { gateway, state }
    }

    /// Snapshot of the current identity.
    pub fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Observe identity replacements. Dependent views re-render on change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        if !is_valid_email(email) {
            return Err(SessionError::Validation(
                "enter a valid email address".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(SessionError::Validation("enter your password".to_string()));
        }

        let identity = self.gateway.sign_in(email, password).await?;
        info!(user = %identity.id, role = %identity.role, "signed in");
        self.state.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> Result<Identity, SessionError> {
        if request.name.trim().is_empty() {
            return Err(SessionError::Validation("enter your name".to_string()));
        }
        if !is_valid_email(&request.email) {
            return Err(SessionError::Validation(
                "enter a valid email address".to_string(),
            ));
        }
        if !is_valid_phone(&request.phone) {
            return Err(SessionError::Validation(
                "enter a 10-digit phone number".to_string(),
            ));
        }
        if !is_valid_signup_password(&request.password) {
            return Err(SessionError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }

        let identity = self.gateway.sign_up(&request).await?;
        info!(user = %identity.id, role = %identity.role, "account created");
        self.state.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    /// Clear the identity unconditionally. Idempotent: signing out with no
    /// active identity is a no-op.
    pub fn sign_out(&self) {
        let previous = self.state.send_replace(None);
        if let Some(identity) = previous {
            info!(user = %identity.id, "signed out");
        }
    }

    /// Merge `patch` into the active identity as one atomic replacement.
    pub fn update_identity(&self, patch: IdentityPatch) -> Result<Identity, SessionError> {
        let mut updated = None;
        self.state.send_if_modified(|slot| match slot.as_ref() {
            Some(current) => {
                let next = current.apply(patch.clone());
                updated = Some(next.clone());
                *slot = Some(next);
                true
            }
            None => false,
        });
        match updated {
            Some(identity) => {
                debug!(user = %identity.id, "identity updated");
                Ok(identity)
            }
            None => Err(SessionError::NoActiveSession),
        }
    }

    /// Ask the gateway to email a one-time code. No identity mutation;
    /// rate limiting is the verification flow's concern.
    pub async fn send_verification_code(&self, email: &str) -> Result<(), SessionError> {
        if !is_valid_email(email) {
            return Err(SessionError::Validation(
                "an email address is required".to_string(),
            ));
        }
        self.gateway
            .send_verification_code(email)
            .await
            .map_err(SessionError::from)
    }

    /// Check a one-time code with the gateway. The caller decides what a
    /// success means (e.g. marking the identity verified).
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), SessionError> {
        self.gateway
            .verify_code(email, code)
            .await
            .map_err(SessionError::from)
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), SessionError> {
        if !is_valid_email(email) {
            return Err(SessionError::Validation(
                "enter a valid email address".to_string(),
            ));
        }
        self.gateway
            .request_password_reset(email)
            .await
            .map_err(SessionError::from)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        if !is_valid_signup_password(new_password) {
            return Err(SessionError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }
        self.gateway
            .reset_password(email, code, new_password)
            .await
            .map_err(SessionError::from)
    }
}
