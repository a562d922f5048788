//! Project lifecycle service.
//!
//! Owns the project status state machine and enforces creator-only mutation.
//! Ownership is checked against the creator's email, case-insensitively; a
//! project whose creator can no longer be resolved is an internal
//! consistency failure, not a Forbidden.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{CacheKey, EntityCache, ProjectRepository, UserRepository};
use crate::domain::{
    Capability, DomainError, EmailAddress, Project, ProjectDraft, ProjectId, ProjectPatch,
    ProjectStatus, User,
};

/// Project lifecycle manager.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn EntityCache<Project>>,
    clock: Arc<dyn Clock>,
}

impl ProjectService {
    /// Create the service with its repositories, cache, and clock.
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn EntityCache<Project>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            users,
            cache,
            clock,
        }
    }

    /// Create a new draft project owned by the actor.
    pub async fn create(
        &self,
        creator_email: &EmailAddress,
        draft: ProjectDraft,
    ) -> Result<Project, DomainError> {
        let creator = self.resolve_user(creator_email).await?;
        if !creator.role().allows(Capability::PostProjects) {
            return Err(DomainError::forbidden(
                "Role does not permit creating projects",
            ));
        }
        let project = Project::new(ProjectId::random(), creator.id(), draft, self.clock.utc())?;
        self.projects.save(&project).await?;
        info!(project = %project.id(), creator = %creator.id(), "project created");
        Ok(project)
    }

    /// Fetch a project by identifier.
    pub async fn get(&self, id: ProjectId) -> Result<Project, DomainError> {
        self.load(id).await
    }

    /// List projects owned by the actor.
    pub async fn list_mine(&self, creator_email: &EmailAddress) -> Result<Vec<Project>, DomainError> {
        let creator = self.resolve_user(creator_email).await?;
        Ok(self.projects.list_by_creator(creator.id()).await?)
    }

    /// List projects in the given lifecycle status.
    pub async fn list_by_status(
        &self,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, DomainError> {
        Ok(self.projects.list_by_status(status).await?)
    }

    /// Apply a partial update. Creator-only; omitted fields are untouched.
    pub async fn update(
        &self,
        id: ProjectId,
        actor_email: &EmailAddress,
        patch: ProjectPatch,
    ) -> Result<Project, DomainError> {
        let mut project = self.load(id).await?;
        self.ensure_owner(&project, actor_email).await?;
        project.apply_patch(patch, self.clock.utc())?;
        self.projects.save(&project).await?;
        self.cache.invalidate(&CacheKey::project(id)).await;
        Ok(project)
    }

    /// Open the project for applications. Creator-only; DRAFT-only apart
    /// from an idempotent re-publish of an already OPEN project.
    pub async fn publish(
        &self,
        id: ProjectId,
        actor_email: &EmailAddress,
    ) -> Result<Project, DomainError> {
        let mut project = self.load(id).await?;
        self.ensure_owner(&project, actor_email).await?;
        project.publish(self.clock.utc())?;
        self.projects.save(&project).await?;
        self.cache.invalidate(&CacheKey::project(id)).await;
        info!(project = %project.id(), "project published");
        Ok(project)
    }

    /// Delete a project. Creator-only.
    pub async fn delete(&self, id: ProjectId, actor_email: &EmailAddress) -> Result<(), DomainError> {
        let project = self.load(id).await?;
        self.ensure_owner(&project, actor_email).await?;
        self.projects.delete(id).await?;
        self.cache.invalidate(&CacheKey::project(id)).await;
        Ok(())
    }

    /// Record one public view. No authorization: the listing endpoint is
    /// public.
    pub async fn increment_view_count(&self, id: ProjectId) -> Result<(), DomainError> {
        let found = self.projects.increment_view_count(id).await?;
        if !found {
            return Err(DomainError::not_found("Project not found"));
        }
        self.cache.invalidate(&CacheKey::project(id)).await;
        Ok(())
    }

    async fn load(&self, id: ProjectId) -> Result<Project, DomainError> {
        let key = CacheKey::project(id);
        if let Some(project) = self.cache.get(&key).await {
            return Ok(project);
        }
        let project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project not found"))?;
        self.cache.put(&key, project.clone()).await;
        Ok(project)
    }

    async fn resolve_user(&self, email: &EmailAddress) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    async fn ensure_owner(
        &self,
        project: &Project,
        actor_email: &EmailAddress,
    ) -> Result<(), DomainError> {
        let creator = self
            .users
            .find_by_id(project.creator_id())
            .await?
            .ok_or_else(|| {
                error!(project = %project.id(), "project creator is not resolvable");
                DomainError::internal("Project has no resolvable creator")
            })?;
        if creator.email() == actor_email {
            Ok(())
        } else {
            Err(DomainError::forbidden(
                "Only the creator can modify the project",
            ))
        }
    }
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
