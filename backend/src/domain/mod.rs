//! Core domain: entities, workflow services, and driven ports.
//!
//! Everything here is transport- and storage-agnostic. Inbound adapters call
//! the workflow services; outbound adapters implement the traits in
//! [`ports`].

pub mod access;
mod application;
mod applications;
mod error;
mod message;
mod messages;
mod payment;
mod payments;
pub mod ports;
mod project;
mod projects;
mod user;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use application::{ApplicationDraft, ApplicationId, ApplicationStatus, ProjectApplication};
pub use applications::ApplicationService;
pub use error::{DomainError, ErrorCode};
pub use message::{Message, MessageId, MessagePatch};
pub use messages::{MessageDraft, MessageService};
pub use payment::{Payment, PaymentId, PaymentPatch, PaymentStatus};
pub use payments::{PaymentDraft, PaymentService};
pub use project::{
    CurrencyCode, Project, ProjectDraft, ProjectId, ProjectPatch, ProjectStatus,
};
pub use projects::ProjectService;
pub use user::{
    Capability, EmailAddress, User, UserDraft, UserId, UserPatch, UserRole, UserStatus,
};
pub use users::IdentityService;
