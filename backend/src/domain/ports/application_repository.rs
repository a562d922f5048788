//! Port abstraction for project application persistence adapters.

use async_trait::async_trait;

use crate::domain::{ApplicationId, ProjectApplication, ProjectId, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert or overwrite an application record.
    async fn save(&self, application: &ProjectApplication) -> Result<(), RepositoryError>;

    /// Fetch an application by identifier.
    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ProjectApplication>, RepositoryError>;

    /// List applications submitted to the given project.
    async fn list_by_project(
        &self,
        project: ProjectId,
    ) -> Result<Vec<ProjectApplication>, RepositoryError>;

    /// List applications submitted by the given finisher.
    async fn list_by_finisher(
        &self,
        finisher: UserId,
    ) -> Result<Vec<ProjectApplication>, RepositoryError>;

    /// Whether the (project, finisher) pair already has an application.
    ///
    /// Best-effort duplicate guard; see the concurrency notes in the crate
    /// documentation.
    async fn exists_by_project_and_finisher(
        &self,
        project: ProjectId,
        finisher: UserId,
    ) -> Result<bool, RepositoryError>;

    /// Delete an application record.
    async fn delete(&self, id: ApplicationId) -> Result<(), RepositoryError>;
}
