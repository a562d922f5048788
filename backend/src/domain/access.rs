//! Shared authorization predicates.
//!
//! A *participant* of a project is its creator or any user with an
//! application against it. Message visibility and payment listing both gate
//! on this predicate; creator-only checks are shared by every workflow
//! service.

use std::sync::Arc;

use crate::domain::ports::ApplicationRepository;
use crate::domain::{DomainError, Project, User};

/// Whether the user owns the project.
#[must_use]
pub fn is_project_creator(project: &Project, user: &User) -> bool {
    project.creator_id() == user.id()
}

/// Fail with Forbidden unless the user owns the project.
pub fn require_creator(project: &Project, user: &User, message: &str) -> Result<(), DomainError> {
    if is_project_creator(project, user) {
        Ok(())
    } else {
        Err(DomainError::forbidden(message))
    }
}

/// Participant predicate shared by messaging and payment listing.
#[derive(Clone)]
pub struct ProjectAccessPolicy {
    applications: Arc<dyn ApplicationRepository>,
}

impl ProjectAccessPolicy {
    /// Create a policy backed by the application repository.
    #[must_use]
    pub fn new(applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { applications }
    }

    /// Whether the user is the project's creator or has applied to it.
    pub async fn can_access(&self, project: &Project, user: &User) -> Result<bool, DomainError> {
        if is_project_creator(project, user) {
            return Ok(true);
        }
        let applied = self
            .applications
            .exists_by_project_and_finisher(project.id(), user.id())
            .await?;
        Ok(applied)
    }

    /// Fail with Forbidden unless the user is a participant.
    pub async fn require_participant(
        &self,
        project: &Project,
        user: &User,
        message: &str,
    ) -> Result<(), DomainError> {
        if self.can_access(project, user).await? {
            Ok(())
        } else {
            Err(DomainError::forbidden(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::ports::MockApplicationRepository;
    use crate::domain::{
        EmailAddress, ErrorCode, Project, ProjectDraft, ProjectId, User, UserDraft, UserId,
        UserRole,
    };

    fn user(email: &str) -> User {
        User::new(
            UserId::random(),
            UserDraft {
                email: EmailAddress::new(email).expect("valid email"),
                first_name: "Grace".to_owned(),
                last_name: "Hopper".to_owned(),
                role: UserRole::Both,
            },
            Utc::now(),
        )
        .expect("valid user")
    }

    fn project_for(creator: &User) -> Project {
        Project::new(
            ProjectId::random(),
            creator.id(),
            ProjectDraft {
                title: "Compiler port".to_owned(),
                description: "Port the compiler".to_owned(),
                requirements: None,
                budget_min: None,
                budget_max: None,
                budget_currency: None,
                estimated_timeline: None,
                required_skills: Default::default(),
                attachments: None,
                application_deadline: None,
            },
            Utc::now(),
        )
        .expect("valid project")
    }

    #[tokio::test]
    async fn creator_is_always_a_participant() {
        let creator = user("creator@example.com");
        let project = project_for(&creator);

        let mut applications = MockApplicationRepository::new();
        applications.expect_exists_by_project_and_finisher().times(0);

        let policy = ProjectAccessPolicy::new(Arc::new(applications));
        assert!(policy
            .can_access(&project, &creator)
            .await
            .expect("predicate evaluates"));
    }

    #[tokio::test]
    async fn applicant_is_a_participant() {
        let creator = user("creator@example.com");
        let applicant = user("finisher@example.com");
        let project = project_for(&creator);

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_exists_by_project_and_finisher()
            .times(1)
            .return_once(|_, _| Ok(true));

        let policy = ProjectAccessPolicy::new(Arc::new(applications));
        assert!(policy
            .can_access(&project, &applicant)
            .await
            .expect("predicate evaluates"));
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let creator = user("creator@example.com");
        let stranger = user("stranger@example.com");
        let project = project_for(&creator);

        let mut applications = MockApplicationRepository::new();
        applications
            .expect_exists_by_project_and_finisher()
            .times(1)
            .return_once(|_, _| Ok(false));

        let policy = ProjectAccessPolicy::new(Arc::new(applications));
        let err = policy
            .require_participant(&project, &stranger, "Not allowed")
            .await
            .expect_err("stranger rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn require_creator_compares_identifiers() {
        let creator = user("creator@example.com");
        let other = user("other@example.com");
        let project = project_for(&creator);

        assert!(require_creator(&project, &creator, "nope").is_ok());
        let err = require_creator(&project, &other, "nope").expect_err("not the creator");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
