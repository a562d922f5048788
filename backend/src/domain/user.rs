//! User identity model.
//!
//! Users own projects (creators), apply to them (finishers), or do both.
//! Emails are normalized to lowercase on construction so every ownership
//! comparison in the workflow services is case-insensitive by construction.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::DomainError;

/// Stable user identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Case-insensitive email address, stored lowercase.
///
/// ## Invariants
/// - Non-empty local part and domain separated by a single `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalize an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
            return Err(DomainError::invalid_request(
                "Email must be a valid address",
            ));
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Closed role set fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Creator,
    Finisher,
    Both,
}

/// Capabilities gated per operation instead of comparing role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create and manage own projects.
    PostProjects,
    /// Submit applications to open projects.
    Apply,
}

impl UserRole {
    /// Whether the role grants the given capability.
    #[must_use]
    pub fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::PostProjects => matches!(self, Self::Creator | Self::Both),
            Capability::Apply => matches!(self, Self::Finisher | Self::Both),
        }
    }
}

/// Account status; mutable only through deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// Registered marketplace user.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: EmailAddress,
    first_name: String,
    last_name: String,
    role: UserRole,
    status: UserStatus,
    skills: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preferences: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields required to register a user.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

/// Partial profile update; absent fields are left untouched, never cleared.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile: Option<Value>,
    pub preferences: Option<Value>,
    pub skills: Option<BTreeSet<String>>,
}

impl User {
    /// Register a new active user.
    pub fn new(id: UserId, draft: UserDraft, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if draft.first_name.trim().is_empty() || draft.last_name.trim().is_empty() {
            return Err(DomainError::invalid_request("Name must not be empty"));
        }
        Ok(Self {
            id,
            email: draft.email,
            first_name: draft.first_name,
            last_name: draft.last_name,
            role: draft.role,
            status: UserStatus::Active,
            skills: BTreeSet::new(),
            profile: None,
            preferences: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial profile update field by field.
    pub fn apply_patch(&mut self, patch: UserPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(first_name) = patch.first_name {
            if first_name.trim().is_empty() {
                return Err(DomainError::invalid_request("Name must not be empty"));
            }
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            if last_name.trim().is_empty() {
                return Err(DomainError::invalid_request("Name must not be empty"));
            }
            self.last_name = last_name;
        }
        if let Some(profile) = patch.profile {
            self.profile = Some(profile);
        }
        if let Some(preferences) = patch.preferences {
            self.preferences = Some(preferences);
        }
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Mark the account inactive. The only status mutation supported.
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.status = UserStatus::Inactive;
        self.updated_at = now;
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Normalized email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Role fixed at registration.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Current account status.
    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Declared skills.
    #[must_use]
    pub fn skills(&self) -> &BTreeSet<String> {
        &self.skills
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn draft(email: &str) -> UserDraft {
        UserDraft {
            email: EmailAddress::new(email).expect("valid email"),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            role: UserRole::Both,
        }
    }

    #[test]
    fn emails_are_normalized_to_lowercase() {
        let email = EmailAddress::new("Ada.Lovelace@Example.COM").expect("valid email");
        assert_eq!(email.as_ref(), "ada.lovelace@example.com");
        assert_eq!(email, EmailAddress::new("ada.lovelace@example.com").expect("valid email"));
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["", "@example.com", "ada@", "ada", "ada@nodot"] {
            assert!(EmailAddress::new(raw).is_err(), "{raw:?} should be invalid");
        }
    }

    #[test]
    fn roles_map_to_capabilities() {
        assert!(UserRole::Creator.allows(Capability::PostProjects));
        assert!(!UserRole::Creator.allows(Capability::Apply));
        assert!(UserRole::Finisher.allows(Capability::Apply));
        assert!(!UserRole::Finisher.allows(Capability::PostProjects));
        assert!(UserRole::Both.allows(Capability::PostProjects));
        assert!(UserRole::Both.allows(Capability::Apply));
    }

    #[test]
    fn new_users_start_active() {
        let user = User::new(UserId::random(), draft("ada@example.com"), Utc::now())
            .expect("valid draft");
        assert_eq!(user.status(), UserStatus::Active);
    }

    #[test]
    fn deactivate_flips_status_only() {
        let mut user = User::new(UserId::random(), draft("ada@example.com"), Utc::now())
            .expect("valid draft");
        user.deactivate(Utc::now());
        assert_eq!(user.status(), UserStatus::Inactive);
        assert_eq!(user.role(), UserRole::Both);
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut user = User::new(UserId::random(), draft("ada@example.com"), Utc::now())
            .expect("valid draft");
        let patch = UserPatch {
            last_name: Some("Byron".to_owned()),
            ..UserPatch::default()
        };
        user.apply_patch(patch, Utc::now()).expect("valid patch");
        assert_eq!(user.first_name(), "Ada");
        assert_eq!(user.last_name(), "Byron");
    }
}
