//! Project application aggregate.
//!
//! At most one application may exist per (project, finisher) pair. Status
//! moves from SUBMITTED under a two-party state machine: the project creator
//! reviews, accepts, or rejects; the applicant may withdraw until accepted.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{DomainError, ProjectId, UserId};

/// Stable application identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ApplicationId(Uuid);

impl ApplicationId {
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

impl From<Uuid> for ApplicationId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Application workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Submitted,
    Reviewed,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Whether this target status may only be set by the project creator.
    #[must_use]
    pub fn is_creator_action(self) -> bool {
        matches!(self, Self::Reviewed | Self::Accepted | Self::Rejected)
    }
}

/// A finisher's bid on a project.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectApplication {
    id: ApplicationId,
    project_id: ProjectId,
    finisher_id: UserId,
    status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_letter: Option<String>,
    #[schema(value_type = Option<String>)]
    bid_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proposed_timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields supplied by the applicant at submission time.
#[derive(Debug, Clone, Default)]
pub struct ApplicationDraft {
    pub cover_letter: Option<String>,
    pub bid_amount: Option<Decimal>,
    pub proposed_timeline: Option<String>,
    pub attachments: Option<Value>,
}

impl ProjectApplication {
    /// Create a freshly submitted application.
    pub fn new(
        id: ApplicationId,
        project_id: ProjectId,
        finisher_id: UserId,
        draft: ApplicationDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if let Some(bid) = draft.bid_amount {
            if bid <= Decimal::ZERO {
                return Err(DomainError::invalid_request("Bid amount must be positive"));
            }
        }
        Ok(Self {
            id,
            project_id,
            finisher_id,
            status: ApplicationStatus::Submitted,
            cover_letter: draft.cover_letter,
            bid_amount: draft.bid_amount,
            proposed_timeline: draft.proposed_timeline,
            attachments: draft.attachments,
            created_at: now,
            updated_at: now,
        })
    }

    /// Record a status transition already authorized by the workflow service.
    pub fn set_status(&mut self, status: ApplicationStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> ApplicationId {
        self.id
    }

    /// Parent project.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Applicant identifier.
    #[must_use]
    pub fn finisher_id(&self) -> UserId {
        self.finisher_id
    }

    /// Current workflow status.
    #[must_use]
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Proposed bid, if any.
    #[must_use]
    pub fn bid_amount(&self) -> Option<Decimal> {
        self.bid_amount
    }
}
