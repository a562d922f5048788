//! In-memory repository adapters.
//!
//! Each repository is a `RwLock<HashMap>` keyed by the entity identifier.
//! Counter bumps take the write lock for the whole read-modify-write, so they
//! are atomic with respect to concurrent bumps. A poisoned lock is reported
//! as a connection-level failure: the store is unusable, not merely empty.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ApplicationRepository, MessageRepository, PaymentRepository, ProjectRepository,
    RepositoryError, UserRepository,
};
use crate::domain::{
    ApplicationId, EmailAddress, Message, MessageId, Payment, PaymentId, PaymentStatus, Project,
    ProjectApplication, ProjectId, ProjectStatus, User, UserId,
};

fn read_store<K, V>(
    store: &RwLock<HashMap<K, V>>,
) -> Result<RwLockReadGuard<'_, HashMap<K, V>>, RepositoryError> {
    store
        .read()
        .map_err(|_| RepositoryError::connection("store lock poisoned"))
}

fn write_store<K, V>(
    store: &RwLock<HashMap<K, V>>,
) -> Result<RwLockWriteGuard<'_, HashMap<K, V>>, RepositoryError> {
    store
        .write()
        .map_err(|_| RepositoryError::connection("store lock poisoned"))
}

/// In-memory identity store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        write_store(&self.users)?.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(read_store(&self.users)?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError> {
        Ok(read_store(&self.users)?
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, RepositoryError> {
        Ok(read_store(&self.users)?
            .values()
            .any(|user| user.email() == email))
    }
}

/// In-memory project store.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn save(&self, project: &Project) -> Result<(), RepositoryError> {
        write_store(&self.projects)?.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        Ok(read_store(&self.projects)?.get(&id).cloned())
    }

    async fn list_by_creator(&self, creator: UserId) -> Result<Vec<Project>, RepositoryError> {
        let mut projects: Vec<Project> = read_store(&self.projects)?
            .values()
            .filter(|project| project.creator_id() == creator)
            .cloned()
            .collect();
        projects.sort_by_key(Project::id);
        Ok(projects)
    }

    async fn list_by_status(
        &self,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, RepositoryError> {
        let mut projects: Vec<Project> = read_store(&self.projects)?
            .values()
            .filter(|project| project.status() == status)
            .cloned()
            .collect();
        projects.sort_by_key(Project::id);
        Ok(projects)
    }

    async fn delete(&self, id: ProjectId) -> Result<(), RepositoryError> {
        write_store(&self.projects)?.remove(&id);
        Ok(())
    }

    async fn increment_view_count(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let mut projects = write_store(&self.projects)?;
        match projects.get_mut(&id) {
            Some(project) => {
                project.record_view();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_application_count(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let mut projects = write_store(&self.projects)?;
        match projects.get_mut(&id) {
            Some(project) => {
                project.record_application();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory application store.
#[derive(Debug, Default)]
pub struct InMemoryApplicationRepository {
    applications: RwLock<HashMap<ApplicationId, ProjectApplication>>,
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn save(&self, application: &ProjectApplication) -> Result<(), RepositoryError> {
        write_store(&self.applications)?.insert(application.id(), application.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ProjectApplication>, RepositoryError> {
        Ok(read_store(&self.applications)?.get(&id).cloned())
    }

    async fn list_by_project(
        &self,
        project: ProjectId,
    ) -> Result<Vec<ProjectApplication>, RepositoryError> {
        let mut applications: Vec<ProjectApplication> = read_store(&self.applications)?
            .values()
            .filter(|application| application.project_id() == project)
            .cloned()
            .collect();
        applications.sort_by_key(ProjectApplication::id);
        Ok(applications)
    }

    async fn list_by_finisher(
        &self,
        finisher: UserId,
    ) -> Result<Vec<ProjectApplication>, RepositoryError> {
        let mut applications: Vec<ProjectApplication> = read_store(&self.applications)?
            .values()
            .filter(|application| application.finisher_id() == finisher)
            .cloned()
            .collect();
        applications.sort_by_key(ProjectApplication::id);
        Ok(applications)
    }

    async fn exists_by_project_and_finisher(
        &self,
        project: ProjectId,
        finisher: UserId,
    ) -> Result<bool, RepositoryError> {
        Ok(read_store(&self.applications)?.values().any(|application| {
            application.project_id() == project && application.finisher_id() == finisher
        }))
    }

    async fn delete(&self, id: ApplicationId) -> Result<(), RepositoryError> {
        write_store(&self.applications)?.remove(&id);
        Ok(())
    }
}

/// In-memory payment store.
#[derive(Debug, Default)]
pub struct InMemoryPaymentRepository {
    payments: RwLock<HashMap<PaymentId, Payment>>,
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), RepositoryError> {
        write_store(&self.payments)?.insert(payment.id(), payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        Ok(read_store(&self.payments)?.get(&id).cloned())
    }

    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Payment>, RepositoryError> {
        let mut payments: Vec<Payment> = read_store(&self.payments)?
            .values()
            .filter(|payment| payment.project_id() == project)
            .cloned()
            .collect();
        payments.sort_by_key(Payment::id);
        Ok(payments)
    }

    async fn list_by_status(
        &self,
        status: PaymentStatus,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let mut payments: Vec<Payment> = read_store(&self.payments)?
            .values()
            .filter(|payment| payment.status() == status)
            .cloned()
            .collect();
        payments.sort_by_key(Payment::id);
        Ok(payments)
    }

    async fn delete(&self, id: PaymentId) -> Result<(), RepositoryError> {
        write_store(&self.payments)?.remove(&id);
        Ok(())
    }
}

/// In-memory message store.
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<HashMap<MessageId, Message>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn save(&self, message: &Message) -> Result<(), RepositoryError> {
        write_store(&self.messages)?.insert(message.id(), message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, RepositoryError> {
        Ok(read_store(&self.messages)?.get(&id).cloned())
    }

    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Message>, RepositoryError> {
        let mut messages: Vec<Message> = read_store(&self.messages)?
            .values()
            .filter(|message| message.project_id() == project)
            .cloned()
            .collect();
        messages.sort_by_key(|message| (message.created_at(), message.id()));
        Ok(messages)
    }

    async fn delete(&self, id: MessageId) -> Result<(), RepositoryError> {
        write_store(&self.messages)?.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{EmailAddress, ProjectDraft, User, UserDraft, UserRole};

    fn user(email: &str) -> User {
        User::new(
            UserId::random(),
            UserDraft {
                email: EmailAddress::new(email).expect("valid email"),
                first_name: "Test".to_owned(),
                last_name: "User".to_owned(),
                role: UserRole::Both,
            },
            Utc::now(),
        )
        .expect("valid user")
    }

    fn project(creator: UserId) -> Project {
        Project::new(
            ProjectId::random(),
            creator,
            ProjectDraft {
                title: "Fence repair".to_owned(),
                description: "Replace two broken panels".to_owned(),
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
    async fn email_lookup_matches_the_normalized_address() {
        let repo = InMemoryUserRepository::default();
        let ada = user("Ada@Example.com");
        repo.save(&ada).await.expect("save succeeds");

        let needle = EmailAddress::new("ada@EXAMPLE.com").expect("valid email");
        let found = repo.find_by_email(&needle).await.expect("lookup succeeds");
        assert_eq!(found.map(|u| u.id()), Some(ada.id()));
        assert!(repo.exists_by_email(&needle).await.expect("lookup succeeds"));
    }

    #[tokio::test]
    async fn counter_bumps_report_missing_projects() {
        let repo = InMemoryProjectRepository::default();
        assert!(!repo
            .increment_view_count(ProjectId::random())
            .await
            .expect("bump evaluates"));

        let stored = project(UserId::random());
        repo.save(&stored).await.expect("save succeeds");
        assert!(repo
            .increment_view_count(stored.id())
            .await
            .expect("bump evaluates"));
        assert!(repo
            .increment_application_count(stored.id())
            .await
            .expect("bump evaluates"));

        let reloaded = repo
            .find_by_id(stored.id())
            .await
            .expect("lookup succeeds")
            .expect("project present");
        assert_eq!(reloaded.view_count(), 1);
        assert_eq!(reloaded.application_count(), 1);
    }

    #[tokio::test]
    async fn listing_filters_by_status() {
        let repo = InMemoryProjectRepository::default();
        let mut open = project(UserId::random());
        open.publish(Utc::now()).expect("draft publishes");
        let draft = project(UserId::random());
        repo.save(&open).await.expect("save succeeds");
        repo.save(&draft).await.expect("save succeeds");

        let found = repo
            .list_by_status(ProjectStatus::Open)
            .await
            .expect("listing succeeds");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), open.id());
    }
}
