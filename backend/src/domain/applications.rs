//! Application workflow service.
//!
//! Enforces the one-application-per-(project, finisher) rule, the OPEN +
//! deadline preconditions on submission, and the two-party status state
//! machine: the creator reviews, accepts, or rejects; the applicant may
//! withdraw until accepted.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::access::{is_project_creator, require_creator};
use crate::domain::ports::{
    ApplicationRepository, CacheKey, EntityCache, ProjectRepository, UserRepository,
};
use crate::domain::{
    ApplicationDraft, ApplicationId, ApplicationStatus, Capability, DomainError, EmailAddress,
    Project, ProjectApplication, ProjectId, ProjectStatus, User,
};

/// Application workflow manager.
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn EntityCache<ProjectApplication>>,
    project_cache: Arc<dyn EntityCache<Project>>,
    clock: Arc<dyn Clock>,
}

impl ApplicationService {
    /// Create the service with its repositories, caches, and clock.
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn EntityCache<ProjectApplication>>,
        project_cache: Arc<dyn EntityCache<Project>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            applications,
            projects,
            users,
            cache,
            project_cache,
            clock,
        }
    }

    /// Submit an application to an open project.
    ///
    /// The duplicate check precedes creation and is best-effort: a concurrent
    /// duplicate submission is not guarded beyond it.
    pub async fn submit(
        &self,
        project_id: ProjectId,
        applicant_email: &EmailAddress,
        draft: ApplicationDraft,
    ) -> Result<ProjectApplication, DomainError> {
        let project = self.load_project(project_id).await?;
        if project.status() != ProjectStatus::Open {
            return Err(DomainError::invalid_request(
                "Project is not open for applications",
            ));
        }
        if let Some(deadline) = project.application_deadline() {
            if self.clock.utc() > deadline {
                return Err(DomainError::invalid_request(
                    "Application deadline has passed",
                ));
            }
        }
        let finisher = self.resolve_user(applicant_email).await?;
        if !finisher.role().allows(Capability::Apply) {
            return Err(DomainError::forbidden(
                "Role does not permit applying to projects",
            ));
        }
        if self
            .applications
            .exists_by_project_and_finisher(project_id, finisher.id())
            .await?
        {
            return Err(DomainError::invalid_request(
                "You have already applied to this project",
            ));
        }

        let application = ProjectApplication::new(
            ApplicationId::random(),
            project_id,
            finisher.id(),
            draft,
            self.clock.utc(),
        )?;
        self.applications.save(&application).await?;

        let counted = self.projects.increment_application_count(project_id).await?;
        if !counted {
            warn!(project = %project_id, "application counter bump raced a project delete");
        }
        self.project_cache
            .invalidate(&CacheKey::project(project_id))
            .await;
        info!(application = %application.id(), project = %project_id, "application submitted");
        Ok(application)
    }

    /// Fetch an application by identifier.
    pub async fn get(&self, id: ApplicationId) -> Result<ProjectApplication, DomainError> {
        self.load(id).await
    }

    /// List applications on a project. Creator-only.
    pub async fn list_by_project(
        &self,
        project_id: ProjectId,
        requester_email: &EmailAddress,
    ) -> Result<Vec<ProjectApplication>, DomainError> {
        let project = self.load_project(project_id).await?;
        let requester = self.resolve_user(requester_email).await?;
        require_creator(
            &project,
            &requester,
            "Only the project creator can view applications",
        )?;
        Ok(self.applications.list_by_project(project_id).await?)
    }

    /// List the caller's own applications. Scoped by construction.
    pub async fn list_mine(
        &self,
        applicant_email: &EmailAddress,
    ) -> Result<Vec<ProjectApplication>, DomainError> {
        let finisher = self.resolve_user(applicant_email).await?;
        Ok(self.applications.list_by_finisher(finisher.id()).await?)
    }

    /// Drive the two-party status state machine.
    ///
    /// SUBMITTED is never a valid target. REVIEWED, ACCEPTED, and REJECTED
    /// are creator-only. Anything else is an applicant action, rejected once
    /// the application has been accepted.
    pub async fn update_status(
        &self,
        id: ApplicationId,
        actor_email: &EmailAddress,
        status: ApplicationStatus,
    ) -> Result<ProjectApplication, DomainError> {
        if status == ApplicationStatus::Submitted {
            return Err(DomainError::invalid_request("Cannot revert to SUBMITTED"));
        }
        let mut application = self.load(id).await?;
        let actor = self.resolve_user(actor_email).await?;
        let project = self.load_project(application.project_id()).await?;

        if status.is_creator_action() {
            require_creator(
                &project,
                &actor,
                "Only the project creator can update this status",
            )?;
        } else {
            if application.finisher_id() != actor.id() {
                return Err(DomainError::forbidden(
                    "Only the applicant can withdraw this application",
                ));
            }
            if application.status() == ApplicationStatus::Accepted {
                return Err(DomainError::invalid_request(
                    "Application is locked once accepted",
                ));
            }
        }

        application.set_status(status, self.clock.utc());
        self.applications.save(&application).await?;
        self.cache.invalidate(&CacheKey::application(id)).await;
        info!(application = %id, ?status, "application status updated");
        Ok(application)
    }

    /// Delete an application. Allowed to its owner or the project creator.
    pub async fn delete(
        &self,
        id: ApplicationId,
        actor_email: &EmailAddress,
    ) -> Result<(), DomainError> {
        let application = self.load(id).await?;
        let actor = self.resolve_user(actor_email).await?;
        let project = self.load_project(application.project_id()).await?;
        let is_owner = application.finisher_id() == actor.id();
        if !is_owner && !is_project_creator(&project, &actor) {
            return Err(DomainError::forbidden(
                "Not allowed to delete this application",
            ));
        }
        self.applications.delete(id).await?;
        self.cache.invalidate(&CacheKey::application(id)).await;
        Ok(())
    }

    async fn load(&self, id: ApplicationId) -> Result<ProjectApplication, DomainError> {
        let key = CacheKey::application(id);
        if let Some(application) = self.cache.get(&key).await {
            return Ok(application);
        }
        let application = self
            .applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Application not found"))?;
        self.cache.put(&key, application.clone()).await;
        Ok(application)
    }

    async fn load_project(&self, id: ProjectId) -> Result<Project, DomainError> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project not found"))
    }

    async fn resolve_user(&self, email: &EmailAddress) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}

#[cfg(test)]
#[path = "applications_tests.rs"]
mod tests;
