//! Project aggregate and its status state machine.
//!
//! A project is owned by exactly one creator. Status moves DRAFT → OPEN on
//! publication and onwards to completion or cancellation; `published_at` is
//! stamped once, on the first OPEN transition.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{DomainError, UserId};

/// Stable project identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
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

impl From<Uuid> for ProjectId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Draft,
    Open,
    InReview,
    Matched,
    InProgress,
    Completed,
    Cancelled,
}

/// ISO 4217-style currency code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate and normalize a three-letter currency code.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::invalid_request(
                "Currency must be a three-letter code",
            ));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Default settlement currency.
    #[must_use]
    pub fn usd() -> Self {
        Self("USD".to_owned())
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Marketplace project owned by a single creator.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    creator_id: UserId,
    title: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    requirements: Option<Value>,
    #[schema(value_type = Option<String>)]
    budget_min: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    budget_max: Option<Decimal>,
    budget_currency: CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_timeline: Option<String>,
    required_skills: BTreeSet<String>,
    status: ProjectStatus,
    published_at: Option<DateTime<Utc>>,
    application_deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<Value>,
    view_count: u32,
    application_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields required to create a project.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub requirements: Option<Value>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_currency: Option<CurrencyCode>,
    pub estimated_timeline: Option<String>,
    pub required_skills: BTreeSet<String>,
    pub attachments: Option<Value>,
    pub application_deadline: Option<DateTime<Utc>>,
}

/// Partial project update; absent fields are left untouched, never cleared.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Value>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub budget_currency: Option<CurrencyCode>,
    pub estimated_timeline: Option<String>,
    pub required_skills: Option<BTreeSet<String>>,
    pub attachments: Option<Value>,
    pub application_deadline: Option<DateTime<Utc>>,
}

fn validate_budget(min: Option<Decimal>, max: Option<Decimal>) -> Result<(), DomainError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(DomainError::invalid_request(
                "Budget minimum must not exceed budget maximum",
            ));
        }
    }
    Ok(())
}

impl Project {
    /// Create a new draft project for the given creator.
    pub fn new(
        id: ProjectId,
        creator_id: UserId,
        draft: ProjectDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if draft.title.trim().is_empty() {
            return Err(DomainError::invalid_request("Title must not be empty"));
        }
        if draft.description.trim().is_empty() {
            return Err(DomainError::invalid_request(
                "Description must not be empty",
            ));
        }
        validate_budget(draft.budget_min, draft.budget_max)?;
        Ok(Self {
            id,
            creator_id,
            title: draft.title,
            description: draft.description,
            requirements: draft.requirements,
            budget_min: draft.budget_min,
            budget_max: draft.budget_max,
            budget_currency: draft.budget_currency.unwrap_or_else(CurrencyCode::usd),
            estimated_timeline: draft.estimated_timeline,
            required_skills: draft.required_skills,
            status: ProjectStatus::Draft,
            published_at: None,
            application_deadline: draft.application_deadline,
            attachments: draft.attachments,
            view_count: 0,
            application_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update field by field.
    pub fn apply_patch(
        &mut self,
        patch: ProjectPatch,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(DomainError::invalid_request("Title must not be empty"));
            }
            self.title = title;
        }
        if let Some(description) = patch.description {
            if description.trim().is_empty() {
                return Err(DomainError::invalid_request(
                    "Description must not be empty",
                ));
            }
            self.description = description;
        }
        if let Some(requirements) = patch.requirements {
            self.requirements = Some(requirements);
        }
        if let Some(budget_min) = patch.budget_min {
            self.budget_min = Some(budget_min);
        }
        if let Some(budget_max) = patch.budget_max {
            self.budget_max = Some(budget_max);
        }
        validate_budget(self.budget_min, self.budget_max)?;
        if let Some(budget_currency) = patch.budget_currency {
            self.budget_currency = budget_currency;
        }
        if let Some(estimated_timeline) = patch.estimated_timeline {
            self.estimated_timeline = Some(estimated_timeline);
        }
        if let Some(required_skills) = patch.required_skills {
            self.required_skills = required_skills;
        }
        if let Some(attachments) = patch.attachments {
            self.attachments = Some(attachments);
        }
        if let Some(application_deadline) = patch.application_deadline {
            self.application_deadline = Some(application_deadline);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Open the project for applications.
    ///
    /// Allowed from DRAFT (stamps `published_at` once) and idempotently from
    /// OPEN. Any other status is an illegal transition: re-opening a matched
    /// or in-progress project must go through an explicit lifecycle change.
    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.status {
            ProjectStatus::Draft => {
                self.status = ProjectStatus::Open;
                self.published_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
            ProjectStatus::Open => Ok(()),
            _ => Err(DomainError::invalid_request(
                "Only draft projects can be published",
            )),
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Identifier of the owning creator.
    #[must_use]
    pub fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Project title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Timestamp of the first OPEN transition, if any.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Deadline after which applications are rejected, if any.
    #[must_use]
    pub fn application_deadline(&self) -> Option<DateTime<Utc>> {
        self.application_deadline
    }

    /// Settlement currency for the budget range.
    #[must_use]
    pub fn budget_currency(&self) -> &CurrencyCode {
        &self.budget_currency
    }

    /// Lower budget bound, if declared.
    #[must_use]
    pub fn budget_min(&self) -> Option<Decimal> {
        self.budget_min
    }

    /// Upper budget bound, if declared.
    #[must_use]
    pub fn budget_max(&self) -> Option<Decimal> {
        self.budget_max
    }

    /// Monotonic view counter.
    #[must_use]
    pub fn view_count(&self) -> u32 {
        self.view_count
    }

    /// Monotonic application counter.
    #[must_use]
    pub fn application_count(&self) -> u32 {
        self.application_count
    }

    /// Record one public view. Counters may be bumped by any caller.
    pub fn record_view(&mut self) {
        self.view_count = self.view_count.saturating_add(1);
    }

    /// Record one submitted application.
    pub fn record_application(&mut self) {
        self.application_count = self.application_count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use super::*;

    fn draft() -> ProjectDraft {
        ProjectDraft {
            title: "Garden shed".to_owned(),
            description: "Build a small shed".to_owned(),
            requirements: None,
            budget_min: Some(Decimal::new(10_000, 2)),
            budget_max: Some(Decimal::new(50_000, 2)),
            budget_currency: None,
            estimated_timeline: None,
            required_skills: BTreeSet::new(),
            attachments: None,
            application_deadline: None,
        }
    }

    #[test]
    fn new_projects_start_as_draft_with_zero_counters() {
        let project = Project::new(ProjectId::random(), UserId::random(), draft(), Utc::now())
            .expect("valid draft");
        assert_eq!(project.status(), ProjectStatus::Draft);
        assert_eq!(project.view_count(), 0);
        assert_eq!(project.application_count(), 0);
        assert_eq!(project.budget_currency().as_ref(), "USD");
        assert!(project.published_at().is_none());
    }

    #[test]
    fn inverted_budget_range_is_rejected() {
        let mut d = draft();
        d.budget_min = Some(Decimal::new(90_000, 2));
        let err = Project::new(ProjectId::random(), UserId::random(), d, Utc::now())
            .expect_err("inverted budget");
        assert_eq!(err.message(), "Budget minimum must not exceed budget maximum");
    }

    #[test]
    fn publish_stamps_published_at_once() {
        let mut project =
            Project::new(ProjectId::random(), UserId::random(), draft(), Utc::now())
                .expect("valid draft");
        let first = Utc::now();
        project.publish(first).expect("publish draft");
        assert_eq!(project.status(), ProjectStatus::Open);
        assert_eq!(project.published_at(), Some(first));

        project
            .publish(first + Duration::hours(1))
            .expect("idempotent re-publish");
        assert_eq!(project.published_at(), Some(first), "timestamp preserved");
    }

    #[test]
    fn publish_rejected_outside_draft_and_open() {
        let mut project =
            Project::new(ProjectId::random(), UserId::random(), draft(), Utc::now())
                .expect("valid draft");
        project.publish(Utc::now()).expect("publish draft");
        project.status = ProjectStatus::Matched;
        let err = project.publish(Utc::now()).expect_err("matched project");
        assert_eq!(err.message(), "Only draft projects can be published");
    }

    #[test]
    fn patch_budget_is_validated_against_existing_bounds() {
        let mut project =
            Project::new(ProjectId::random(), UserId::random(), draft(), Utc::now())
                .expect("valid draft");
        let patch = ProjectPatch {
            budget_max: Some(Decimal::new(5_000, 2)),
            ..ProjectPatch::default()
        };
        assert!(project.apply_patch(patch, Utc::now()).is_err());
    }

    #[test]
    fn currency_codes_are_uppercased() {
        let code = CurrencyCode::new("eur").expect("valid code");
        assert_eq!(code.as_ref(), "EUR");
        assert!(CurrencyCode::new("EURO").is_err());
        assert!(CurrencyCode::new("E1R").is_err());
    }
}
