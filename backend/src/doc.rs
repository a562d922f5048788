//! OpenAPI documentation configuration.
//!
//! Generates the specification for the REST API: every inbound endpoint,
//! the domain schemas they exchange, and the gateway header security scheme.
//! Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    ApplicationStatus, CurrencyCode, EmailAddress, ErrorCode, Message, Payment, PaymentStatus,
    Project, ProjectApplication, ProjectStatus, User, UserRole, UserStatus,
};
use crate::inbound::http::applications::{
    SubmitApplicationRequestBody, UpdateApplicationStatusRequestBody,
};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::messages::{SendMessageRequestBody, UpdateMessageRequestBody};
use crate::inbound::http::payments::{CreatePaymentRequestBody, UpdatePaymentRequestBody};
use crate::inbound::http::projects::{CreateProjectRequestBody, UpdateProjectRequestBody};
use crate::inbound::http::users::{RegisterUserRequestBody, UpdateProfileRequestBody};

/// Enrich the generated document with the gateway header security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ActorEmail",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-authenticated-email",
                "Principal verified by the upstream gateway.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace backend API",
        description = "Project, application, payment, and messaging workflows."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("ActorEmail" = [])),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::get_current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::users::deactivate_current_user,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::list_projects_by_status,
        crate::inbound::http::projects::list_my_projects,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::update_project,
        crate::inbound::http::projects::publish_project,
        crate::inbound::http::projects::record_project_view,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::applications::submit_application,
        crate::inbound::http::applications::list_project_applications,
        crate::inbound::http::applications::list_my_applications,
        crate::inbound::http::applications::get_application,
        crate::inbound::http::applications::update_application_status,
        crate::inbound::http::applications::delete_application,
        crate::inbound::http::payments::create_payment,
        crate::inbound::http::payments::list_project_payments,
        crate::inbound::http::payments::list_payments_by_status,
        crate::inbound::http::payments::get_payment,
        crate::inbound::http::payments::update_payment,
        crate::inbound::http::payments::release_payment,
        crate::inbound::http::payments::refund_payment,
        crate::inbound::http::payments::delete_payment,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::list_project_messages,
        crate::inbound::http::messages::get_message,
        crate::inbound::http::messages::update_message,
        crate::inbound::http::messages::delete_message,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        UserRole,
        UserStatus,
        EmailAddress,
        CurrencyCode,
        Project,
        ProjectStatus,
        ProjectApplication,
        ApplicationStatus,
        Payment,
        PaymentStatus,
        Message,
        ApiError,
        ErrorCode,
        RegisterUserRequestBody,
        UpdateProfileRequestBody,
        CreateProjectRequestBody,
        UpdateProjectRequestBody,
        SubmitApplicationRequestBody,
        UpdateApplicationStatusRequestBody,
        CreatePaymentRequestBody,
        UpdatePaymentRequestBody,
        SendMessageRequestBody,
        UpdateMessageRequestBody,
    )),
    tags(
        (name = "users", description = "Registration and profile management"),
        (name = "projects", description = "Project lifecycle operations"),
        (name = "applications", description = "Application workflow operations"),
        (name = "payments", description = "Escrow payment operations"),
        (name = "messages", description = "Project messaging"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn every_workflow_tag_is_documented() {
        let doc = ApiDoc::openapi();
        let tags: Vec<String> = doc
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.name)
            .collect();
        for expected in ["users", "projects", "applications", "payments", "messages"] {
            assert!(tags.iter().any(|t| t == expected), "missing tag {expected}");
        }
    }

    #[test]
    fn nested_routes_are_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/projects/{id}/applications",
            "/api/v1/projects/{id}/payments",
            "/api/v1/projects/{id}/messages",
            "/api/v1/payments/{id}/release",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
