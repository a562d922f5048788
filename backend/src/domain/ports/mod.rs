//! Driven ports for the hexagonal boundary.
//!
//! Workflow services depend only on these traits; adapters under
//! `crate::outbound` supply the implementations. All ports share one
//! [`RepositoryError`] taxonomy which maps onto the domain error codes via
//! `From`, so services can propagate persistence failures with `?`.

mod application_repository;
mod entity_cache;
mod message_repository;
mod payment_repository;
mod project_repository;
mod user_repository;

use thiserror::Error;

use crate::domain::DomainError;

#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::ApplicationRepository;
#[cfg(test)]
pub use entity_cache::MockEntityCache;
pub use entity_cache::{CacheKey, EntityCache, NoopCache};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::MessageRepository;
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::PaymentRepository;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::ProjectRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;

/// Failures raised by persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached.
    #[error("repository connection failed: {message}")]
    Connection { message: String },
    /// A query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query { message: String },
}

impl RepositoryError {
    /// Connection-level failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query-level failure.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for DomainError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Connection { message } => {
                Self::service_unavailable(format!("repository unavailable: {message}"))
            }
            RepositoryError::Query { message } => {
                Self::internal(format!("repository error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::ErrorCode;

    use super::*;

    #[test]
    fn connection_failures_map_to_service_unavailable() {
        let err = DomainError::from(RepositoryError::connection("pool exhausted"));
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[test]
    fn query_failures_map_to_internal_error() {
        let err = DomainError::from(RepositoryError::query("constraint violated"));
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
