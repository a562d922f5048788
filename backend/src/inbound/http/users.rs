//! User registration and profile HTTP handlers.
//!
//! ```text
//! POST   /api/v1/users
//! GET    /api/v1/users/me
//! PATCH  /api/v1/users/me
//! DELETE /api/v1/users/me
//! ```

use std::collections::BTreeSet;

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{EmailAddress, User, UserDraft, UserPatch, UserRole};
use crate::inbound::http::auth::AuthenticatedActor;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for registering a user.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequestBody {
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

/// Request payload for a partial profile update.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequestBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile: Option<Value>,
    pub preferences: Option<Value>,
    pub skills: Option<BTreeSet<String>>,
}

impl From<UpdateProfileRequestBody> for UserPatch {
    fn from(body: UpdateProfileRequestBody) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            profile: body.profile,
            preferences: body.preferences,
            skills: body.skills,
        }
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserRequestBody,
    responses(
        (status = 200, description = "User registered", body = User),
        (status = 400, description = "Invalid request or email already registered", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserRequestBody>,
) -> ApiResult<web::Json<User>> {
    let body = payload.into_inner();
    let user = state
        .identities
        .register(UserDraft {
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            role: body.role,
        })
        .await?;
    Ok(web::Json(user))
}

/// Fetch the authenticated user's own record.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "User not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["users"],
    operation_id = "getCurrentUser"
)]
#[get("/users/me")]
pub async fn get_current_user(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
) -> ApiResult<web::Json<User>> {
    let user = state.identities.find_by_email(actor.email()).await?;
    Ok(web::Json(user))
}

/// Apply a partial update to the authenticated user's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequestBody,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    payload: web::Json<UpdateProfileRequestBody>,
) -> ApiResult<web::Json<User>> {
    let user = state
        .identities
        .update_profile(actor.email(), payload.into_inner().into())
        .await?;
    Ok(web::Json(user))
}

/// Deactivate the authenticated user's account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    responses(
        (status = 204, description = "Account deactivated"),
        (status = 401, description = "Unauthorized", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["users"],
    operation_id = "deactivateCurrentUser"
)]
#[delete("/users/me")]
pub async fn deactivate_current_user(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
) -> ApiResult<HttpResponse> {
    state.identities.deactivate(actor.email()).await?;
    Ok(HttpResponse::NoContent().finish())
}
