//! Port abstraction for message persistence adapters.

use async_trait::async_trait;

use crate::domain::{Message, MessageId, ProjectId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert or overwrite a message record.
    async fn save(&self, message: &Message) -> Result<(), RepositoryError>;

    /// Fetch a message by identifier.
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, RepositoryError>;

    /// List messages on the given project in creation order.
    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Message>, RepositoryError>;

    /// Delete a message record.
    async fn delete(&self, id: MessageId) -> Result<(), RepositoryError>;
}
