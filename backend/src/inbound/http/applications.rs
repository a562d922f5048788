//! Application workflow HTTP handlers.
//!
//! ```text
//! POST   /api/v1/projects/{id}/applications
//! GET    /api/v1/projects/{id}/applications
//! GET    /api/v1/applications/mine
//! GET    /api/v1/applications/{id}
//! PATCH  /api/v1/applications/{id}/status
//! DELETE /api/v1/applications/{id}
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    ApplicationDraft, ApplicationId, ApplicationStatus, ProjectApplication, ProjectId,
};
use crate::inbound::http::auth::AuthenticatedActor;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for submitting an application.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequestBody {
    pub cover_letter: Option<String>,
    #[schema(value_type = Option<String>)]
    pub bid_amount: Option<Decimal>,
    pub proposed_timeline: Option<String>,
    pub attachments: Option<Value>,
}

impl From<SubmitApplicationRequestBody> for ApplicationDraft {
    fn from(body: SubmitApplicationRequestBody) -> Self {
        Self {
            cover_letter: body.cover_letter,
            bid_amount: body.bid_amount,
            proposed_timeline: body.proposed_timeline,
            attachments: body.attachments,
        }
    }
}

/// Request payload for a status transition.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusRequestBody {
    pub status: ApplicationStatus,
}

/// Submit an application to an open project.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/applications",
    params(("id" = Uuid, Path, description = "Project identifier")),
    request_body = SubmitApplicationRequestBody,
    responses(
        (status = 200, description = "Application submitted", body = ProjectApplication),
        (status = 400, description = "Project closed, deadline passed, or duplicate application", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Role does not permit applying to projects", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["applications"],
    operation_id = "submitApplication"
)]
#[post("/projects/{id}/applications")]
pub async fn submit_application(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<SubmitApplicationRequestBody>,
) -> ApiResult<web::Json<ProjectApplication>> {
    let application = state
        .applications
        .submit(
            ProjectId::from(path.into_inner()),
            actor.email(),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(application))
}

/// List a project's applications. Creator-only.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/applications",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Applications on the project", body = [ProjectApplication]),
        (status = 403, description = "Only the project creator can view applications", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["applications"],
    operation_id = "listProjectApplications"
)]
#[get("/projects/{id}/applications")]
pub async fn list_project_applications(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<ProjectApplication>>> {
    let applications = state
        .applications
        .list_by_project(ProjectId::from(path.into_inner()), actor.email())
        .await?;
    Ok(web::Json(applications))
}

/// List the authenticated actor's own applications.
#[utoipa::path(
    get,
    path = "/api/v1/applications/mine",
    responses(
        (status = 200, description = "Applications submitted by the caller", body = [ProjectApplication]),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["applications"],
    operation_id = "listMyApplications"
)]
#[get("/applications/mine")]
pub async fn list_my_applications(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
) -> ApiResult<web::Json<Vec<ProjectApplication>>> {
    let applications = state.applications.list_mine(actor.email()).await?;
    Ok(web::Json(applications))
}

/// Fetch an application by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/applications/{id}",
    params(("id" = Uuid, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Application", body = ProjectApplication),
        (status = 404, description = "Application not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["applications"],
    operation_id = "getApplication"
)]
#[get("/applications/{id}")]
pub async fn get_application(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ProjectApplication>> {
    let application = state
        .applications
        .get(ApplicationId::from(path.into_inner()))
        .await?;
    Ok(web::Json(application))
}

/// Drive the application status state machine.
#[utoipa::path(
    patch,
    path = "/api/v1/applications/{id}/status",
    params(("id" = Uuid, Path, description = "Application identifier")),
    request_body = UpdateApplicationStatusRequestBody,
    responses(
        (status = 200, description = "Status updated", body = ProjectApplication),
        (status = 400, description = "Illegal status transition", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Actor may not perform this transition", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["applications"],
    operation_id = "updateApplicationStatus"
)]
#[patch("/applications/{id}/status")]
pub async fn update_application_status(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateApplicationStatusRequestBody>,
) -> ApiResult<web::Json<ProjectApplication>> {
    let application = state
        .applications
        .update_status(
            ApplicationId::from(path.into_inner()),
            actor.email(),
            payload.status,
        )
        .await?;
    Ok(web::Json(application))
}

/// Delete an application. Owner or project creator.
#[utoipa::path(
    delete,
    path = "/api/v1/applications/{id}",
    params(("id" = Uuid, Path, description = "Application identifier")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 403, description = "Not allowed to delete this application", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["applications"],
    operation_id = "deleteApplication"
)]
#[delete("/applications/{id}")]
pub async fn delete_application(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .applications
        .delete(ApplicationId::from(path.into_inner()), actor.email())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
