//! Server construction and wiring.
//!
//! Builds the workflow services over the in-memory adapters and registers
//! every REST endpoint. Route registration order matters for the `/mine`
//! endpoints: they must precede their `{id}` siblings so the literal segment
//! wins.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{
    ApplicationService, IdentityService, MessageService, PaymentService, Project,
    ProjectApplication, ProjectService, User,
};
use crate::inbound::http::applications::{
    delete_application, get_application, list_my_applications, list_project_applications,
    submit_application, update_application_status,
};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::messages::{
    delete_message, get_message, list_project_messages, send_message, update_message,
};
use crate::inbound::http::payments::{
    create_payment, delete_payment, get_payment, list_payments_by_status, list_project_payments,
    refund_payment, release_payment, update_payment,
};
use crate::inbound::http::projects::{
    create_project, delete_project, get_project, list_my_projects, list_projects_by_status,
    publish_project, record_project_view, update_project,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{
    deactivate_current_user, get_current_user, register_user, update_current_user,
};
use crate::outbound::cache::InMemoryCache;
use crate::outbound::persistence::{
    InMemoryApplicationRepository, InMemoryMessageRepository, InMemoryPaymentRepository,
    InMemoryProjectRepository, InMemoryUserRepository,
};

/// Wire the workflow services over fresh in-memory adapters.
#[must_use]
pub fn build_http_state() -> HttpState {
    let users = Arc::new(InMemoryUserRepository::default());
    let projects = Arc::new(InMemoryProjectRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let payments = Arc::new(InMemoryPaymentRepository::default());
    let messages = Arc::new(InMemoryMessageRepository::default());

    let user_cache = Arc::new(InMemoryCache::<User>::new());
    let project_cache = Arc::new(InMemoryCache::<Project>::new());
    let application_cache = Arc::new(InMemoryCache::<ProjectApplication>::new());
    let payment_cache = Arc::new(InMemoryCache::new());

    let clock = Arc::new(DefaultClock);

    HttpState {
        identities: Arc::new(IdentityService::new(
            users.clone(),
            user_cache,
            clock.clone(),
        )),
        projects: Arc::new(ProjectService::new(
            projects.clone(),
            users.clone(),
            project_cache.clone(),
            clock.clone(),
        )),
        applications: Arc::new(ApplicationService::new(
            applications.clone(),
            projects.clone(),
            users.clone(),
            application_cache,
            project_cache,
            clock.clone(),
        )),
        payments: Arc::new(PaymentService::new(
            payments,
            projects.clone(),
            applications.clone(),
            users.clone(),
            payment_cache,
            clock.clone(),
        )),
        messages: Arc::new(MessageService::new(
            messages,
            projects,
            applications,
            users,
            clock,
        )),
    }
}

/// Register every REST endpoint under `/api/v1`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(register_user)
        .service(get_current_user)
        .service(update_current_user)
        .service(deactivate_current_user)
        .service(list_my_projects)
        .service(create_project)
        .service(list_projects_by_status)
        .service(publish_project)
        .service(record_project_view)
        .service(submit_application)
        .service(list_project_applications)
        .service(list_my_applications)
        .service(get_application)
        .service(update_application_status)
        .service(delete_application)
        .service(create_payment)
        .service(list_project_payments)
        .service(list_payments_by_status)
        .service(get_payment)
        .service(update_payment)
        .service(release_payment)
        .service(refund_payment)
        .service(delete_payment)
        .service(send_message)
        .service(list_project_messages)
        .service(get_message)
        .service(update_message)
        .service(delete_message)
        .service(get_project)
        .service(update_project)
        .service(delete_project);
}

/// Build and start the HTTP server.
pub fn run(config: &ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state());
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .app_data(http_state.clone())
            .configure(configure_api);

        #[allow(unused_mut)]
        let mut app = App::new()
            .app_data(server_health_state.clone())
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
