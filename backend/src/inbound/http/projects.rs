//! Project lifecycle HTTP handlers.
//!
//! ```text
//! POST   /api/v1/projects
//! GET    /api/v1/projects?status=OPEN
//! GET    /api/v1/projects/mine
//! GET    /api/v1/projects/{id}
//! PATCH  /api/v1/projects/{id}
//! POST   /api/v1/projects/{id}/publish
//! POST   /api/v1/projects/{id}/views
//! DELETE /api/v1/projects/{id}
//! ```

use std::collections::BTreeSet;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    CurrencyCode, Project, ProjectDraft, ProjectId, ProjectPatch, ProjectStatus,
};
use crate::inbound::http::auth::AuthenticatedActor;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for creating a project.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequestBody {
    pub title: String,
    pub description: String,
    pub requirements: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub budget_min: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub budget_max: Option<Decimal>,
    pub budget_currency: Option<CurrencyCode>,
    pub estimated_timeline: Option<String>,
    #[serde(default)]
    pub required_skills: BTreeSet<String>,
    pub attachments: Option<Value>,
    #[schema(format = "date-time")]
    pub application_deadline: Option<DateTime<Utc>>,
}

impl From<CreateProjectRequestBody> for ProjectDraft {
    fn from(body: CreateProjectRequestBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            requirements: body.requirements,
            budget_min: body.budget_min,
            budget_max: body.budget_max,
            budget_currency: body.budget_currency,
            estimated_timeline: body.estimated_timeline,
            required_skills: body.required_skills,
            attachments: body.attachments,
            application_deadline: body.application_deadline,
        }
    }
}

/// Request payload for a partial project update.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequestBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub budget_min: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub budget_max: Option<Decimal>,
    pub budget_currency: Option<CurrencyCode>,
    pub estimated_timeline: Option<String>,
    pub required_skills: Option<BTreeSet<String>>,
    pub attachments: Option<Value>,
    #[schema(format = "date-time")]
    pub application_deadline: Option<DateTime<Utc>>,
}

impl From<UpdateProjectRequestBody> for ProjectPatch {
    fn from(body: UpdateProjectRequestBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            requirements: body.requirements,
            budget_min: body.budget_min,
            budget_max: body.budget_max,
            budget_currency: body.budget_currency,
            estimated_timeline: body.estimated_timeline,
            required_skills: body.required_skills,
            attachments: body.attachments,
            application_deadline: body.application_deadline,
        }
    }
}

/// Status filter for the public project listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    pub status: ProjectStatus,
}

/// Create a draft project owned by the authenticated actor.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProjectRequestBody,
    responses(
        (status = 200, description = "Project created", body = Project),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Role does not permit creating projects", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    payload: web::Json<CreateProjectRequestBody>,
) -> ApiResult<web::Json<Project>> {
    let project = state
        .projects
        .create(actor.email(), payload.into_inner().into())
        .await?;
    Ok(web::Json(project))
}

/// List projects in a lifecycle status. Public.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "Projects in the requested status", body = [Project])
    ),
    tags = ["projects"],
    operation_id = "listProjectsByStatus"
)]
#[get("/projects")]
pub async fn list_projects_by_status(
    state: web::Data<HttpState>,
    query: web::Query<ProjectListQuery>,
) -> ApiResult<web::Json<Vec<Project>>> {
    let projects = state.projects.list_by_status(query.status).await?;
    Ok(web::Json(projects))
}

/// List projects owned by the authenticated actor.
#[utoipa::path(
    get,
    path = "/api/v1/projects/mine",
    responses(
        (status = 200, description = "Projects owned by the caller", body = [Project]),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["projects"],
    operation_id = "listMyProjects"
)]
#[get("/projects/mine")]
pub async fn list_my_projects(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
) -> ApiResult<web::Json<Vec<Project>>> {
    let projects = state.projects.list_mine(actor.email()).await?;
    Ok(web::Json(projects))
}

/// Fetch a project. Public.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Project not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/projects/{id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Project>> {
    let project = state.projects.get(ProjectId::from(path.into_inner())).await?;
    Ok(web::Json(project))
}

/// Apply a partial update. Creator-only.
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{id}",
    params(("id" = Uuid, Path, description = "Project identifier")),
    request_body = UpdateProjectRequestBody,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 403, description = "Only the creator can modify the project", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "Project not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["projects"],
    operation_id = "updateProject"
)]
#[patch("/projects/{id}")]
pub async fn update_project(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateProjectRequestBody>,
) -> ApiResult<web::Json<Project>> {
    let project = state
        .projects
        .update(
            ProjectId::from(path.into_inner()),
            actor.email(),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(project))
}

/// Open the project for applications. Creator-only.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/publish",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project published", body = Project),
        (status = 400, description = "Only draft projects can be published", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Only the creator can modify the project", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["projects"],
    operation_id = "publishProject"
)]
#[post("/projects/{id}/publish")]
pub async fn publish_project(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Project>> {
    let project = state
        .projects
        .publish(ProjectId::from(path.into_inner()), actor.email())
        .await?;
    Ok(web::Json(project))
}

/// Record one public view of the project.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/views",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 204, description = "View recorded"),
        (status = 404, description = "Project not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["projects"],
    operation_id = "recordProjectView"
)]
#[post("/projects/{id}/views")]
pub async fn record_project_view(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .projects
        .increment_view_count(ProjectId::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a project. Creator-only.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 403, description = "Only the creator can modify the project", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .projects
        .delete(ProjectId::from(path.into_inner()), actor.email())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
