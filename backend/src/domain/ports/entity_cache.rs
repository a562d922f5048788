//! Explicit cache port for authorization-sensitive lookups.
//!
//! Replaces annotation-driven caching with a surface the workflow services
//! drive explicitly: every mutating operation must `invalidate` the key(s)
//! its read path uses, otherwise a stale entity could satisfy a later
//! ownership check. Infallible by contract: a cache that cannot answer
//! behaves as a miss.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{ApplicationId, EmailAddress, PaymentId, ProjectId};

/// Namespaced cache key, e.g. `project:<uuid>` or `user:email:<address>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a project looked up by identifier.
    #[must_use]
    pub fn project(id: ProjectId) -> Self {
        Self(format!("project:{id}"))
    }

    /// Key for an application looked up by identifier.
    #[must_use]
    pub fn application(id: ApplicationId) -> Self {
        Self(format!("application:{id}"))
    }

    /// Key for a payment looked up by identifier.
    #[must_use]
    pub fn payment(id: PaymentId) -> Self {
        Self(format!("payment:{id}"))
    }

    /// Key for a user resolved by normalized email.
    #[must_use]
    pub fn user_email(email: &EmailAddress) -> Self {
        Self(format!("user:email:{email}"))
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Read-through cache for a single entity type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityCache<T: Clone + Send + Sync + 'static>: Send + Sync {
    /// Read a cached entity, `None` on miss.
    async fn get(&self, key: &CacheKey) -> Option<T>;

    /// Store an entity under the supplied key.
    async fn put(&self, key: &CacheKey, value: T);

    /// Drop the entry for the supplied key, if present.
    async fn invalidate(&self, key: &CacheKey);
}

/// Cache implementation that never hits; used in tests and as a safe default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

#[async_trait]
impl<T: Clone + Send + Sync + 'static> EntityCache<T> for NoopCache {
    async fn get(&self, _key: &CacheKey) -> Option<T> {
        None
    }

    async fn put(&self, _key: &CacheKey, _value: T) {}

    async fn invalidate(&self, _key: &CacheKey) {}
}
