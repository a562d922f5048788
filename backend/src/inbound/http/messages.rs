//! Project messaging HTTP handlers.
//!
//! ```text
//! POST   /api/v1/projects/{id}/messages
//! GET    /api/v1/projects/{id}/messages
//! GET    /api/v1/projects/{id}/messages/{messageId}
//! PATCH  /api/v1/projects/{id}/messages/{messageId}
//! DELETE /api/v1/projects/{id}/messages/{messageId}
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Message, MessageDraft, MessageId, MessagePatch, ProjectId};
use crate::inbound::http::auth::AuthenticatedActor;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for posting a message.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequestBody {
    pub content: String,
    pub attachments: Option<Value>,
}

/// Request payload for editing a message.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageRequestBody {
    pub content: Option<String>,
    pub attachments: Option<Value>,
}

/// Post a message on a project. Participants only.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/messages",
    params(("id" = Uuid, Path, description = "Project identifier")),
    request_body = SendMessageRequestBody,
    responses(
        (status = 200, description = "Message posted", body = Message),
        (status = 403, description = "Not allowed to message on this project", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/projects/{id}/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<SendMessageRequestBody>,
) -> ApiResult<web::Json<Message>> {
    let body = payload.into_inner();
    let message = state
        .messages
        .send(
            ProjectId::from(path.into_inner()),
            actor.email(),
            MessageDraft {
                content: body.content,
                attachments: body.attachments,
            },
        )
        .await?;
    Ok(web::Json(message))
}

/// List a project's messages in creation order. Participants only.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/messages",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Messages on the project", body = [Message]),
        (status = 403, description = "Not allowed to view messages for this project", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["messages"],
    operation_id = "listProjectMessages"
)]
#[get("/projects/{id}/messages")]
pub async fn list_project_messages(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Message>>> {
    let messages = state
        .messages
        .list_by_project(ProjectId::from(path.into_inner()), actor.email())
        .await?;
    Ok(web::Json(messages))
}

/// Fetch one message on a project. Participants only.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/messages/{messageId}",
    params(
        ("id" = Uuid, Path, description = "Project identifier"),
        ("messageId" = Uuid, Path, description = "Message identifier")
    ),
    responses(
        (status = 200, description = "Message", body = Message),
        (status = 400, description = "Message does not belong to this project", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "Message not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["messages"],
    operation_id = "getMessage"
)]
#[get("/projects/{id}/messages/{message_id}")]
pub async fn get_message(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<web::Json<Message>> {
    let (project_id, message_id) = path.into_inner();
    let message = state
        .messages
        .get(
            ProjectId::from(project_id),
            MessageId::from(message_id),
            actor.email(),
        )
        .await?;
    Ok(web::Json(message))
}

/// Edit a message. Sender-only.
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{id}/messages/{messageId}",
    params(
        ("id" = Uuid, Path, description = "Project identifier"),
        ("messageId" = Uuid, Path, description = "Message identifier")
    ),
    request_body = UpdateMessageRequestBody,
    responses(
        (status = 200, description = "Message updated", body = Message),
        (status = 403, description = "Only the sender can update the message", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["messages"],
    operation_id = "updateMessage"
)]
#[patch("/projects/{id}/messages/{message_id}")]
pub async fn update_message(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<UpdateMessageRequestBody>,
) -> ApiResult<web::Json<Message>> {
    let (project_id, message_id) = path.into_inner();
    let body = payload.into_inner();
    let message = state
        .messages
        .update(
            ProjectId::from(project_id),
            MessageId::from(message_id),
            actor.email(),
            MessagePatch {
                content: body.content,
                attachments: body.attachments,
            },
        )
        .await?;
    Ok(web::Json(message))
}

/// Delete a message. Sender or project creator.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}/messages/{messageId}",
    params(
        ("id" = Uuid, Path, description = "Project identifier"),
        ("messageId" = Uuid, Path, description = "Message identifier")
    ),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 403, description = "Not allowed to delete this message", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["messages"],
    operation_id = "deleteMessage"
)]
#[delete("/projects/{id}/messages/{message_id}")]
pub async fn delete_message(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (project_id, message_id) = path.into_inner();
    state
        .messages
        .delete(
            ProjectId::from(project_id),
            MessageId::from(message_id),
            actor.email(),
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
