//! Port abstraction for project persistence adapters.

use async_trait::async_trait;

use crate::domain::{Project, ProjectId, ProjectStatus, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert or overwrite a project record.
    async fn save(&self, project: &Project) -> Result<(), RepositoryError>;

    /// Fetch a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;

    /// List projects owned by the given creator.
    async fn list_by_creator(&self, creator: UserId) -> Result<Vec<Project>, RepositoryError>;

    /// List projects in the given lifecycle status.
    async fn list_by_status(&self, status: ProjectStatus)
        -> Result<Vec<Project>, RepositoryError>;

    /// Delete a project record.
    async fn delete(&self, id: ProjectId) -> Result<(), RepositoryError>;

    /// Atomically bump the public view counter.
    ///
    /// Returns `false` when the project does not exist.
    async fn increment_view_count(&self, id: ProjectId) -> Result<bool, RepositoryError>;

    /// Atomically bump the application counter.
    ///
    /// Returns `false` when the project does not exist.
    async fn increment_application_count(&self, id: ProjectId) -> Result<bool, RepositoryError>;
}
