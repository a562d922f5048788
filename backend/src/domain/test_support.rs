//! Shared fixtures for the workflow service tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    ApplicationDraft, ApplicationId, EmailAddress, Project, ProjectApplication, ProjectDraft,
    ProjectId, User, UserDraft, UserId, UserRole,
};

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn fixture_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).single().expect("valid instant")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixture_instant()))
}

pub(crate) fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("valid fixture email")
}

pub(crate) fn user_with_role(raw_email: &str, role: UserRole) -> User {
    User::new(
        UserId::random(),
        UserDraft {
            email: email(raw_email),
            first_name: "Test".to_owned(),
            last_name: "Fixture".to_owned(),
            role,
        },
        fixture_instant(),
    )
    .expect("valid fixture user")
}

pub(crate) fn project_draft() -> ProjectDraft {
    ProjectDraft {
        title: "Timber gazebo".to_owned(),
        description: "Assemble a gazebo from a flat-pack kit".to_owned(),
        requirements: None,
        budget_min: None,
        budget_max: None,
        budget_currency: None,
        estimated_timeline: None,
        required_skills: BTreeSet::new(),
        attachments: None,
        application_deadline: None,
    }
}

pub(crate) fn draft_project_for(creator: &User) -> Project {
    Project::new(ProjectId::random(), creator.id(), project_draft(), fixture_instant())
        .expect("valid fixture project")
}

pub(crate) fn open_project_for(creator: &User) -> Project {
    let mut project = draft_project_for(creator);
    project.publish(fixture_instant()).expect("draft publishes");
    project
}

pub(crate) fn application_for(project: &Project, finisher: &User) -> ProjectApplication {
    ProjectApplication::new(
        ApplicationId::random(),
        project.id(),
        finisher.id(),
        ApplicationDraft::default(),
        fixture_instant(),
    )
    .expect("valid fixture application")
}
