//! Project message entity.
//!
//! Visibility is gated by the participant predicate in
//! [`crate::domain::access`]: only the project creator or an applicant may
//! read or write messages on a project.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{DomainError, ProjectId, UserId};

/// Stable message identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for MessageId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Message exchanged between project participants.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    project_id: ProjectId,
    sender_id: UserId,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<Value>,
    created_at: DateTime<Utc>,
}

/// Partial message update; only the sender may edit.
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub attachments: Option<Value>,
}

impl Message {
    /// Create a new message on a project.
    pub fn new(
        id: MessageId,
        project_id: ProjectId,
        sender_id: UserId,
        content: String,
        attachments: Option<Value>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::invalid_request(
                "Message content must not be empty",
            ));
        }
        Ok(Self {
            id,
            project_id,
            sender_id,
            content,
            attachments,
            created_at: now,
        })
    }

    /// Apply a partial edit.
    pub fn apply_patch(&mut self, patch: MessagePatch) -> Result<(), DomainError> {
        if let Some(content) = patch.content {
            if content.trim().is_empty() {
                return Err(DomainError::invalid_request(
                    "Message content must not be empty",
                ));
            }
            self.content = content;
        }
        if let Some(attachments) = patch.attachments {
            self.attachments = Some(attachments);
        }
        Ok(())
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Parent project.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Original sender; the only party allowed to edit.
    #[must_use]
    pub fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Creation timestamp; messages are never re-dated by edits.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn blank_content_is_rejected() {
        let err = Message::new(
            MessageId::random(),
            ProjectId::random(),
            UserId::random(),
            "  ".to_owned(),
            None,
            Utc::now(),
        )
        .expect_err("blank content");
        assert_eq!(err.message(), "Message content must not be empty");
    }

    #[test]
    fn patch_edits_content_in_place() {
        let mut message = Message::new(
            MessageId::random(),
            ProjectId::random(),
            UserId::random(),
            "hello".to_owned(),
            None,
            Utc::now(),
        )
        .expect("valid message");
        message
            .apply_patch(MessagePatch {
                content: Some("hello again".to_owned()),
                attachments: None,
            })
            .expect("valid patch");
        assert_eq!(message.content(), "hello again");
    }
}
