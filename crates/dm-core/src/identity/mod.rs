//! Identity domain models
//!
//! The identity is the current actor held by the session container: role,
//! contact attributes and the verification flag. It is created on a
//! successful sign-in or sign-up and replaced atomically on every update.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Actor role, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Driver,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Driver => "driver",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(Self::Customer),
            "driver" => Some(Self::Driver),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Customer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub role: Role,
    /// False until an explicit verification success.
    pub verified: bool,
    /// Display-only value, never used for access control.
    pub profile_completion: u8,
}

impl Identity {
    /// Merge `patch` into this identity, producing the replacement value.
    ///
    /// Role is deliberately absent from [`IdentityPatch`]: it is immutable
    /// for the session lifetime.
    pub fn apply(&self, patch: IdentityPatch) -> Self {
        Self {
            id: self.id.clone(),
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            email: patch.email.or_else(|| self.email.clone()),
            phone: patch.phone.unwrap_or_else(|| self.phone.clone()),
            role: self.role,
            verified: patch.verified.unwrap_or(self.verified),
            profile_completion: patch
                .profile_completion
                .map(|value| value.min(100))
                .unwrap_or(self.profile_completion),
        }
    }
}

/// Partial identity update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub verified: Option<bool>,
    pub profile_completion: Option<u8>,
}

impl IdentityPatch {
    pub fn verified(value: bool) -> Self {
        Self {
            verified: Some(value),
            ..Self::default()
        }
    }
}
