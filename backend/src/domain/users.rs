//! Identity store service.
//!
//! Resolves authenticated principals for the workflow services and owns the
//! user record lifecycle: registration, profile patches, and deactivation.
//! Auth plumbing (tokens, password material) lives outside the core.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{CacheKey, EntityCache, UserRepository};
use crate::domain::{DomainError, EmailAddress, User, UserDraft, UserId, UserPatch};

/// Identity store backed by the user repository and a read-through cache.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn EntityCache<User>>,
    clock: Arc<dyn Clock>,
}

impl IdentityService {
    /// Create the service with its repository, cache, and clock.
    pub fn new(
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn EntityCache<User>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            cache,
            clock,
        }
    }

    /// Register a new user. Emails are unique case-insensitively.
    pub async fn register(&self, draft: UserDraft) -> Result<User, DomainError> {
        if self.users.exists_by_email(&draft.email).await? {
            return Err(DomainError::invalid_request("Email already registered"));
        }
        let user = User::new(UserId::random(), draft, self.clock.utc())?;
        self.users.save(&user).await?;
        info!(user = %user.id(), "user registered");
        Ok(user)
    }

    /// Resolve a user by email, reading through the cache.
    pub async fn find_by_email(&self, email: &EmailAddress) -> Result<User, DomainError> {
        let key = CacheKey::user_email(email);
        if let Some(user) = self.cache.get(&key).await {
            return Ok(user);
        }
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        self.cache.put(&key, user.clone()).await;
        Ok(user)
    }

    /// Resolve a user by identifier.
    pub async fn find_by_id(&self, id: UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    /// Whether a user with the given email exists.
    pub async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, DomainError> {
        Ok(self.users.exists_by_email(email).await?)
    }

    /// Apply a partial profile update to the caller's own record.
    pub async fn update_profile(
        &self,
        email: &EmailAddress,
        patch: UserPatch,
    ) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        user.apply_patch(patch, self.clock.utc())?;
        self.users.save(&user).await?;
        self.cache.invalidate(&CacheKey::user_email(email)).await;
        Ok(user)
    }

    /// Deactivate the caller's own account. The only status mutation.
    pub async fn deactivate(&self, email: &EmailAddress) -> Result<(), DomainError> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        user.deactivate(self.clock.utc());
        self.users.save(&user).await?;
        self.cache.invalidate(&CacheKey::user_email(email)).await;
        info!(user = %user.id(), "user deactivated");
        Ok(())
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
