//! Payment aggregate with a linear escrow-style status machine.
//!
//! PENDING → RELEASED and PENDING → REFUNDED are the only transitions driven
//! by this core; both are terminal. ESCROW and FAILED are representable for
//! external gateway integration but never produced here. `captured_at` and
//! `refunded_at` are stamped exactly once, on the corresponding transition.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{CurrencyCode, DomainError, ProjectId, UserId};

/// Stable payment identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for PaymentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Escrow status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Escrow,
    Released,
    Refunded,
    Failed,
}

/// Escrow-style payment between a project's creator and an applicant.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    id: PaymentId,
    project_id: ProjectId,
    payer_id: UserId,
    payee_id: UserId,
    #[schema(value_type = String)]
    amount: Decimal,
    currency: CurrencyCode,
    status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
    captured_at: Option<DateTime<Utc>>,
    refunded_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Partial payment update; only PENDING payments are mutable.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub amount: Option<Decimal>,
    pub currency: Option<CurrencyCode>,
    pub metadata: Option<Value>,
}

fn validate_amount(amount: Decimal) -> Result<(), DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::invalid_request("Amount must be positive"));
    }
    Ok(())
}

impl Payment {
    /// Create a new pending payment.
    #[expect(clippy::too_many_arguments, reason = "flat creation record")]
    pub fn new(
        id: PaymentId,
        project_id: ProjectId,
        payer_id: UserId,
        payee_id: UserId,
        amount: Decimal,
        currency: Option<CurrencyCode>,
        metadata: Option<Value>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_amount(amount)?;
        Ok(Self {
            id,
            project_id,
            payer_id,
            payee_id,
            amount,
            currency: currency.unwrap_or_else(CurrencyCode::usd),
            status: PaymentStatus::Pending,
            metadata,
            captured_at: None,
            refunded_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Only PENDING payments are mutable.
    pub fn apply_patch(
        &mut self,
        patch: PaymentPatch,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status != PaymentStatus::Pending {
            return Err(DomainError::invalid_request(
                "Only pending payments can be updated",
            ));
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            self.amount = amount;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(metadata) = patch.metadata {
            self.metadata = Some(metadata);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Disburse the escrowed funds to the payee. Terminal.
    pub fn release(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.status {
            PaymentStatus::Released => {
                Err(DomainError::invalid_request("Payment already released"))
            }
            PaymentStatus::Refunded => Err(DomainError::invalid_request(
                "Cannot release a refunded payment",
            )),
            _ => {
                self.status = PaymentStatus::Released;
                self.captured_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
        }
    }

    /// Return the escrowed funds to the payer. Terminal.
    pub fn refund(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.status {
            PaymentStatus::Refunded => {
                Err(DomainError::invalid_request("Payment already refunded"))
            }
            PaymentStatus::Released => Err(DomainError::invalid_request(
                "Cannot refund a released payment",
            )),
            _ => {
                self.status = PaymentStatus::Refunded;
                self.refunded_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> PaymentId {
        self.id
    }

    /// Parent project.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Paying party, normally the project creator.
    #[must_use]
    pub fn payer_id(&self) -> UserId {
        self.payer_id
    }

    /// Receiving party, normally an accepted applicant.
    #[must_use]
    pub fn payee_id(&self) -> UserId {
        self.payee_id
    }

    /// Payment amount, strictly positive.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Settlement currency.
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Current escrow status.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    /// Disbursement timestamp, stamped once on release.
    #[must_use]
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    /// Refund timestamp, stamped once on refund.
    #[must_use]
    pub fn refunded_at(&self) -> Option<DateTime<Utc>> {
        self.refunded_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn pending() -> Payment {
        Payment::new(
            PaymentId::random(),
            ProjectId::random(),
            UserId::random(),
            UserId::random(),
            Decimal::new(10_000, 2),
            None,
            None,
            Utc::now(),
        )
        .expect("valid payment")
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let err = Payment::new(
            PaymentId::random(),
            ProjectId::random(),
            UserId::random(),
            UserId::random(),
            Decimal::new(-1, 0),
            None,
            None,
            Utc::now(),
        )
        .expect_err("negative amount");
        assert_eq!(err.message(), "Amount must be positive");
    }

    #[test]
    fn release_is_terminal() {
        let mut payment = pending();
        let now = Utc::now();
        payment.release(now).expect("first release");
        assert_eq!(payment.status(), PaymentStatus::Released);
        assert_eq!(payment.captured_at(), Some(now));

        let err = payment.release(Utc::now()).expect_err("double release");
        assert_eq!(err.message(), "Payment already released");
    }

    #[test]
    fn release_after_refund_is_rejected() {
        let mut payment = pending();
        payment.refund(Utc::now()).expect("refund");
        let err = payment.release(Utc::now()).expect_err("refunded payment");
        assert_eq!(err.message(), "Cannot release a refunded payment");
    }

    #[test]
    fn refund_after_release_is_rejected() {
        let mut payment = pending();
        payment.release(Utc::now()).expect("release");
        let err = payment.refund(Utc::now()).expect_err("released payment");
        assert_eq!(err.message(), "Cannot refund a released payment");
    }

    #[test]
    fn only_pending_payments_accept_patches() {
        let mut payment = pending();
        payment.release(Utc::now()).expect("release");
        let err = payment
            .apply_patch(PaymentPatch::default(), Utc::now())
            .expect_err("released payment");
        assert_eq!(err.message(), "Only pending payments can be updated");
    }
}
