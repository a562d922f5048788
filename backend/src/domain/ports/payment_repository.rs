//! Port abstraction for payment persistence adapters.

use async_trait::async_trait;

use crate::domain::{Payment, PaymentId, PaymentStatus, ProjectId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert or overwrite a payment record.
    async fn save(&self, payment: &Payment) -> Result<(), RepositoryError>;

    /// Fetch a payment by identifier.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError>;

    /// List payments on the given project.
    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Payment>, RepositoryError>;

    /// List payments in the given escrow status, across projects.
    async fn list_by_status(&self, status: PaymentStatus)
        -> Result<Vec<Payment>, RepositoryError>;

    /// Delete a payment record.
    async fn delete(&self, id: PaymentId) -> Result<(), RepositoryError>;
}
