//! Escrow payment HTTP handlers.
//!
//! ```text
//! POST   /api/v1/projects/{id}/payments
//! GET    /api/v1/projects/{id}/payments
//! GET    /api/v1/payments?status=PENDING
//! GET    /api/v1/payments/{id}
//! PATCH  /api/v1/payments/{id}
//! POST   /api/v1/payments/{id}/release
//! POST   /api/v1/payments/{id}/refund
//! DELETE /api/v1/payments/{id}
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    CurrencyCode, Payment, PaymentDraft, PaymentId, PaymentPatch, PaymentStatus, ProjectId,
    UserId,
};
use crate::inbound::http::auth::AuthenticatedActor;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for opening a payment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequestBody {
    #[schema(format = "uuid")]
    pub payee_id: Uuid,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: Option<CurrencyCode>,
    pub metadata: Option<Value>,
}

impl From<CreatePaymentRequestBody> for PaymentDraft {
    fn from(body: CreatePaymentRequestBody) -> Self {
        Self {
            payee_id: UserId::from(body.payee_id),
            amount: body.amount,
            currency: body.currency,
            metadata: body.metadata,
        }
    }
}

/// Request payload for a partial payment update.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequestBody {
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    pub currency: Option<CurrencyCode>,
    pub metadata: Option<Value>,
}

impl From<UpdatePaymentRequestBody> for PaymentPatch {
    fn from(body: UpdatePaymentRequestBody) -> Self {
        Self {
            amount: body.amount,
            currency: body.currency,
            metadata: body.metadata,
        }
    }
}

/// Status filter for the cross-project payment listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListQuery {
    pub status: PaymentStatus,
}

/// Open a pending payment towards an applicant. Creator-only.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/payments",
    params(("id" = Uuid, Path, description = "Project identifier")),
    request_body = CreatePaymentRequestBody,
    responses(
        (status = 200, description = "Payment opened", body = Payment),
        (status = 400, description = "Invalid amount or payee never applied", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Only the project creator can create payments", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/projects/{id}/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<CreatePaymentRequestBody>,
) -> ApiResult<web::Json<Payment>> {
    let payment = state
        .payments
        .create(
            ProjectId::from(path.into_inner()),
            actor.email(),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(payment))
}

/// List payments on a project, filtered to what the caller may see.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/payments",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Payments visible to the caller", body = [Payment]),
        (status = 403, description = "Not allowed to view payments for this project", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["payments"],
    operation_id = "listProjectPayments"
)]
#[get("/projects/{id}/payments")]
pub async fn list_project_payments(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Payment>>> {
    let payments = state
        .payments
        .list_by_project(ProjectId::from(path.into_inner()), actor.email())
        .await?;
    Ok(web::Json(payments))
}

/// List payments in an escrow status, across projects.
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(PaymentListQuery),
    responses(
        (status = 200, description = "Payments in the requested status", body = [Payment])
    ),
    tags = ["payments"],
    operation_id = "listPaymentsByStatus"
)]
#[get("/payments")]
pub async fn list_payments_by_status(
    state: web::Data<HttpState>,
    query: web::Query<PaymentListQuery>,
) -> ApiResult<web::Json<Vec<Payment>>> {
    let payments = state.payments.list_by_status(query.status).await?;
    Ok(web::Json(payments))
}

/// Fetch a payment by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["payments"],
    operation_id = "getPayment"
)]
#[get("/payments/{id}")]
pub async fn get_payment(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Payment>> {
    let payment = state.payments.get(PaymentId::from(path.into_inner())).await?;
    Ok(web::Json(payment))
}

/// Apply a partial update to a pending payment. Payer-only.
#[utoipa::path(
    patch,
    path = "/api/v1/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment identifier")),
    request_body = UpdatePaymentRequestBody,
    responses(
        (status = 200, description = "Payment updated", body = Payment),
        (status = 400, description = "Only pending payments can be updated", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Only the payer can update this payment", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["payments"],
    operation_id = "updatePayment"
)]
#[patch("/payments/{id}")]
pub async fn update_payment(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
    payload: web::Json<UpdatePaymentRequestBody>,
) -> ApiResult<web::Json<Payment>> {
    let payment = state
        .payments
        .update(
            PaymentId::from(path.into_inner()),
            actor.email(),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(payment))
}

/// Disburse the escrowed funds to the payee. Payer-only; terminal.
#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/release",
    params(("id" = Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Payment released", body = Payment),
        (status = 400, description = "Payment already released or refunded", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Only the payer can release this payment", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["payments"],
    operation_id = "releasePayment"
)]
#[post("/payments/{id}/release")]
pub async fn release_payment(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Payment>> {
    let payment = state
        .payments
        .release(PaymentId::from(path.into_inner()), actor.email())
        .await?;
    Ok(web::Json(payment))
}

/// Return the escrowed funds to the payer. Payer-only; terminal.
#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/refund",
    params(("id" = Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 200, description = "Payment refunded", body = Payment),
        (status = 400, description = "Payment already refunded or released", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Only the payer can refund this payment", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["payments"],
    operation_id = "refundPayment"
)]
#[post("/payments/{id}/refund")]
pub async fn refund_payment(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Payment>> {
    let payment = state
        .payments
        .refund(PaymentId::from(path.into_inner()), actor.email())
        .await?;
    Ok(web::Json(payment))
}

/// Delete a payment. Payer-only; released payments are immutable.
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment identifier")),
    responses(
        (status = 204, description = "Payment deleted"),
        (status = 400, description = "Cannot delete a released payment", body = crate::inbound::http::error::ApiError),
        (status = 403, description = "Only the payer can delete this payment", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["payments"],
    operation_id = "deletePayment"
)]
#[delete("/payments/{id}")]
pub async fn delete_payment(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .payments
        .delete(PaymentId::from(path.into_inner()), actor.email())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
