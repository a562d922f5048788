//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::RepositoryError;

/// Identity store contract: resolve principals and persist user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or overwrite a user record.
    async fn save(&self, user: &User) -> Result<(), RepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Resolve a user by normalized email address.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError>;

    /// Whether a user with the given email exists.
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, RepositoryError>;
}
