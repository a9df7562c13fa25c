//! Profile records and the document-review rule.
//!
//! A profile row mirrors the hosted `profiles` table. Driver rows carry one
//! verified flag per document plus the aggregate `documents_verified`,
//! which is the AND of all four and is recomputed on every review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{Identity, Role};
use crate::ids::UserId;

/// Document types reviewed for driver onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    License,
    Aadhaar,
    Pan,
    Account,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        Self::License,
        Self::Aadhaar,
        Self::Pan,
        Self::Account,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::License => "License",
            Self::Aadhaar => "Aadhaar",
            Self::Pan => "PAN",
            Self::Account => "Bank Account",
        }
    }
}

/// A row of the remote `profiles` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_online: bool,
    /// Email ownership proven through the one-time-code flow.
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub license_verified: bool,
    #[serde(default)]
    pub aadhaar_verified: bool,
    #[serde(default)]
    pub pan_verified: bool,
    #[serde(default)]
    pub account_verified: bool,
    #[serde(default)]
    pub documents_verified: bool,
    pub license_doc_url: Option<String>,
    pub aadhaar_doc_url: Option<String>,
    pub pan_doc_url: Option<String>,
    pub account_details_doc_url: Option<String>,
    pub photo_url: Option<String>,
    pub experience: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    #[serde(default)]
    pub profile_completion: u8,
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn document_verified(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::License => self.license_verified,
            DocumentKind::Aadhaar => self.aadhaar_verified,
            DocumentKind::Pan => self.pan_verified,
            DocumentKind::Account => self.account_verified,
        }
    }

    /// The patch for approving or rejecting one document.
    ///
    /// Sets the flag for `kind` and recomputes the aggregate as the AND of
    /// all four flags with the new value in place.
    pub fn review_document(&self, kind: DocumentKind, approve: bool) -> ProfilePatch {
        let check = |candidate: DocumentKind| {
            if candidate == kind {
                approve
            } else {
                self.document_verified(candidate)
            }
        };
        let all_verified = DocumentKind::ALL.into_iter().all(check);

        let mut patch = ProfilePatch {
            documents_verified: Some(all_verified),
            ..ProfilePatch::default()
        };
        match kind {
            DocumentKind::License => patch.license_verified = Some(approve),
            DocumentKind::Aadhaar => patch.aadhaar_verified = Some(approve),
            DocumentKind::Pan => patch.pan_verified = Some(approve),
            DocumentKind::Account => patch.account_verified = Some(approve),
        }
        patch
    }

    /// The identity held by the session for this profile row.
    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone().unwrap_or_default(),
            role: self.role,
            verified: self.is_verified,
            profile_completion: self.profile_completion.min(100),
        }
    }
}

/// Partial update of a profile row; `None` fields are not written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_completion: Option<u8>,
}

impl ProfilePatch {
    pub fn online(value: bool) -> Self {
        Self {
            is_online: Some(value),
            ..Self::default()
        }
    }

    /// Apply this patch to a row, producing the updated row. Mirrors what
    /// the remote store does so tests and optimistic updates agree with it.
    pub fn apply_to(&self, profile: &Profile) -> Profile {
        let mut updated = profile.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            updated.phone = Some(phone.clone());
        }
        if let Some(experience) = &self.experience {
            updated.experience = Some(experience.clone());
        }
        if let Some(address) = &self.address {
            updated.address = Some(address.clone());
        }
        if let Some(city) = &self.city {
            updated.city = Some(city.clone());
        }
        if let Some(pincode) = &self.pincode {
            updated.pincode = Some(pincode.clone());
        }
        if let Some(is_online) = self.is_online {
            updated.is_online = is_online;
        }
        if let Some(is_verified) = self.is_verified {
            updated.is_verified = is_verified;
        }
        if let Some(value) = self.license_verified {
            updated.license_verified = value;
        }
        if let Some(value) = self.aadhaar_verified {
            updated.aadhaar_verified = value;
        }
        if let Some(value) = self.pan_verified {
            updated.pan_verified = value;
        }
        if let Some(value) = self.account_verified {
            updated.account_verified = value;
        }
        if let Some(value) = self.documents_verified {
            updated.documents_verified = value;
        }
        if let Some(value) = self.profile_completion {
            updated.profile_completion = value.min(100);
        }
        updated
    }
}
