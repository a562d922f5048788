//! Project messaging service.
//!
//! Every read and write is gated by the participant predicate: only the
//! project creator or a user with an application against the project may
//! exchange messages on it. Edits are sender-only; deletion extends to the
//! project creator as moderator.

use std::sync::Arc;

use mockable::Clock;
use serde_json::Value;
use tracing::info;

use crate::domain::access::{is_project_creator, ProjectAccessPolicy};
use crate::domain::ports::{
    ApplicationRepository, MessageRepository, ProjectRepository, UserRepository,
};
use crate::domain::{
    DomainError, EmailAddress, Message, MessageId, MessagePatch, Project, ProjectId, User,
};

/// Creation record for a new message.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub content: String,
    pub attachments: Option<Value>,
}

/// Messaging access guard and workflow manager.
#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
    access: ProjectAccessPolicy,
    clock: Arc<dyn Clock>,
}

impl MessageService {
    /// Create the service with its repositories and clock.
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        projects: Arc<dyn ProjectRepository>,
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            messages,
            projects,
            users,
            access: ProjectAccessPolicy::new(applications),
            clock,
        }
    }

    /// Post a message on a project. Participants only.
    pub async fn send(
        &self,
        project_id: ProjectId,
        sender_email: &EmailAddress,
        draft: MessageDraft,
    ) -> Result<Message, DomainError> {
        let project = self.load_project(project_id).await?;
        let sender = self.resolve_user(sender_email).await?;
        self.access
            .require_participant(
                &project,
                &sender,
                "Not allowed to message on this project",
            )
            .await?;
        let message = Message::new(
            MessageId::random(),
            project_id,
            sender.id(),
            draft.content,
            draft.attachments,
            self.clock.utc(),
        )?;
        self.messages.save(&message).await?;
        info!(message = %message.id(), project = %project_id, "message sent");
        Ok(message)
    }

    /// List a project's messages in creation order. Participants only.
    pub async fn list_by_project(
        &self,
        project_id: ProjectId,
        requester_email: &EmailAddress,
    ) -> Result<Vec<Message>, DomainError> {
        let project = self.load_project(project_id).await?;
        let requester = self.resolve_user(requester_email).await?;
        self.access
            .require_participant(
                &project,
                &requester,
                "Not allowed to view messages for this project",
            )
            .await?;
        Ok(self.messages.list_by_project(project_id).await?)
    }

    /// Fetch one message on a project. Participants only; the identifier
    /// must belong to the addressed project.
    pub async fn get(
        &self,
        project_id: ProjectId,
        id: MessageId,
        requester_email: &EmailAddress,
    ) -> Result<Message, DomainError> {
        let project = self.load_project(project_id).await?;
        let requester = self.resolve_user(requester_email).await?;
        self.access
            .require_participant(
                &project,
                &requester,
                "Not allowed to view messages for this project",
            )
            .await?;
        let message = self.load(id).await?;
        if message.project_id() != project_id {
            return Err(DomainError::invalid_request(
                "Message does not belong to this project",
            ));
        }
        Ok(message)
    }

    /// Edit a message. Sender-only.
    pub async fn update(
        &self,
        project_id: ProjectId,
        id: MessageId,
        actor_email: &EmailAddress,
        patch: MessagePatch,
    ) -> Result<Message, DomainError> {
        let mut message = self.load(id).await?;
        if message.project_id() != project_id {
            return Err(DomainError::invalid_request(
                "Message does not belong to this project",
            ));
        }
        let actor = self.resolve_user(actor_email).await?;
        if message.sender_id() != actor.id() {
            return Err(DomainError::forbidden(
                "Only the sender can update the message",
            ));
        }
        message.apply_patch(patch)?;
        self.messages.save(&message).await?;
        Ok(message)
    }

    /// Delete a message. Allowed to its sender or the project creator.
    pub async fn delete(
        &self,
        project_id: ProjectId,
        id: MessageId,
        actor_email: &EmailAddress,
    ) -> Result<(), DomainError> {
        let message = self.load(id).await?;
        if message.project_id() != project_id {
            return Err(DomainError::invalid_request(
                "Message does not belong to this project",
            ));
        }
        let project = self.load_project(project_id).await?;
        let actor = self.resolve_user(actor_email).await?;
        let is_sender = message.sender_id() == actor.id();
        if !is_sender && !is_project_creator(&project, &actor) {
            return Err(DomainError::forbidden("Not allowed to delete this message"));
        }
        self.messages.delete(id).await?;
        Ok(())
    }

    async fn load(&self, id: MessageId) -> Result<Message, DomainError> {
        self.messages
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Message not found"))
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
#[path = "messages_tests.rs"]
mod tests;
