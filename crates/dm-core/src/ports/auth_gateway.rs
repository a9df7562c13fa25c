use async_trait::async_trait;

use crate::errors::GatewayError;
use crate::identity::{Identity, Role};

/// Input for creating a remote account and its companion profile row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

/// Authentication operations of the hosted backend.
///
/// All calls cross the process boundary and may fail with a transport
/// error or a domain rejection; none of them block the caller's thread.
#[async_trait]
pub trait AuthGatewayPort: Send + Sync {
    /// Create an account plus profile record; returns the new identity.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Identity, GatewayError>;

    /// Exchange credentials for the stored identity.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, GatewayError>;

    /// Dispatch a one-time code to `email`. Out-of-band side effect only;
    /// no identity state changes.
    async fn send_verification_code(&self, email: &str) -> Result<(), GatewayError>;

    /// Prove ownership of `email` with a previously sent code.
    async fn verify_code(&self, email: &str, code: &str) -> Result<(), GatewayError>;

    /// Start the forgot-password flow for `email`.
    async fn request_password_reset(&self, email: &str) -> Result<(), GatewayError>;

    /// Complete the forgot-password flow with the emailed code.
    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), GatewayError>;
}
