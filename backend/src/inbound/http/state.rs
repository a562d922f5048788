//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they depend
//! only on the workflow services and stay testable without real storage.

use std::sync::Arc;

use crate::domain::{
    ApplicationService, IdentityService, MessageService, PaymentService, ProjectService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identities: Arc<IdentityService>,
    pub projects: Arc<ProjectService>,
    pub applications: Arc<ApplicationService>,
    pub payments: Arc<PaymentService>,
    pub messages: Arc<MessageService>,
}
