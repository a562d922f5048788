//! Escrow payment service.
//!
//! Payments are creator-initiated, always towards a user who has applied to
//! the project, and move through a linear PENDING → RELEASED / REFUNDED
//! machine. Listing is participant-gated: the creator sees every payment on
//! the project, an applicant only those where they are the payee.

use std::sync::Arc;

use mockable::Clock;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use crate::domain::access::{is_project_creator, require_creator, ProjectAccessPolicy};
use crate::domain::ports::{
    ApplicationRepository, CacheKey, EntityCache, PaymentRepository, ProjectRepository,
    UserRepository,
};
use crate::domain::{
    CurrencyCode, DomainError, EmailAddress, Payment, PaymentId, PaymentPatch, PaymentStatus,
    Project, ProjectId, User, UserId,
};

/// Creation record for a new escrow payment.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub payee_id: UserId,
    pub amount: Decimal,
    pub currency: Option<CurrencyCode>,
    pub metadata: Option<Value>,
}

/// Escrow payment manager.
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    projects: Arc<dyn ProjectRepository>,
    applications: Arc<dyn ApplicationRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn EntityCache<Payment>>,
    access: ProjectAccessPolicy,
    clock: Arc<dyn Clock>,
}

impl PaymentService {
    /// Create the service with its repositories, cache, and clock.
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        projects: Arc<dyn ProjectRepository>,
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn EntityCache<Payment>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let access = ProjectAccessPolicy::new(Arc::clone(&applications));
        Self {
            payments,
            projects,
            applications,
            users,
            cache,
            access,
            clock,
        }
    }

    /// Open a pending payment from the project creator towards an applicant.
    pub async fn create(
        &self,
        project_id: ProjectId,
        actor_email: &EmailAddress,
        draft: PaymentDraft,
    ) -> Result<Payment, DomainError> {
        if draft.amount <= Decimal::ZERO {
            return Err(DomainError::invalid_request("Amount must be positive"));
        }
        let project = self.load_project(project_id).await?;
        let actor = self.resolve_user(actor_email).await?;
        require_creator(
            &project,
            &actor,
            "Only the project creator can create payments",
        )?;
        let payee = self
            .users
            .find_by_id(draft.payee_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;
        let applied = self
            .applications
            .exists_by_project_and_finisher(project_id, payee.id())
            .await?;
        if !applied {
            return Err(DomainError::invalid_request(
                "Payee must have applied to this project",
            ));
        }

        let payment = Payment::new(
            PaymentId::random(),
            project_id,
            actor.id(),
            payee.id(),
            draft.amount,
            draft.currency,
            draft.metadata,
            self.clock.utc(),
        )?;
        self.payments.save(&payment).await?;
        info!(payment = %payment.id(), project = %project_id, "payment created");
        Ok(payment)
    }

    /// Fetch a payment by identifier.
    pub async fn get(&self, id: PaymentId) -> Result<Payment, DomainError> {
        self.load(id).await
    }

    /// Apply a partial update. Payer-only, and only while PENDING.
    pub async fn update(
        &self,
        id: PaymentId,
        actor_email: &EmailAddress,
        patch: PaymentPatch,
    ) -> Result<Payment, DomainError> {
        let mut payment = self.load(id).await?;
        let actor = self.resolve_user(actor_email).await?;
        if payment.payer_id() != actor.id() {
            return Err(DomainError::forbidden(
                "Only the payer can update this payment",
            ));
        }
        payment.apply_patch(patch, self.clock.utc())?;
        self.payments.save(&payment).await?;
        self.cache.invalidate(&CacheKey::payment(id)).await;
        Ok(payment)
    }

    /// Disburse the escrowed funds to the payee. Payer-only; terminal.
    pub async fn release(
        &self,
        id: PaymentId,
        actor_email: &EmailAddress,
    ) -> Result<Payment, DomainError> {
        let mut payment = self.load(id).await?;
        let actor = self.resolve_user(actor_email).await?;
        if payment.payer_id() != actor.id() {
            return Err(DomainError::forbidden(
                "Only the payer can release this payment",
            ));
        }
        payment.release(self.clock.utc())?;
        self.payments.save(&payment).await?;
        self.cache.invalidate(&CacheKey::payment(id)).await;
        info!(payment = %id, "payment released");
        Ok(payment)
    }

    /// Return the escrowed funds to the payer. Payer-only; terminal.
    pub async fn refund(
        &self,
        id: PaymentId,
        actor_email: &EmailAddress,
    ) -> Result<Payment, DomainError> {
        let mut payment = self.load(id).await?;
        let actor = self.resolve_user(actor_email).await?;
        if payment.payer_id() != actor.id() {
            return Err(DomainError::forbidden(
                "Only the payer can refund this payment",
            ));
        }
        payment.refund(self.clock.utc())?;
        self.payments.save(&payment).await?;
        self.cache.invalidate(&CacheKey::payment(id)).await;
        info!(payment = %id, "payment refunded");
        Ok(payment)
    }

    /// Delete a payment. Payer-only; released payments are immutable history.
    pub async fn delete(
        &self,
        id: PaymentId,
        actor_email: &EmailAddress,
    ) -> Result<(), DomainError> {
        let payment = self.load(id).await?;
        let actor = self.resolve_user(actor_email).await?;
        if payment.payer_id() != actor.id() {
            return Err(DomainError::forbidden(
                "Only the payer can delete this payment",
            ));
        }
        if payment.status() == PaymentStatus::Released {
            return Err(DomainError::invalid_request(
                "Cannot delete a released payment",
            ));
        }
        self.payments.delete(id).await?;
        self.cache.invalidate(&CacheKey::payment(id)).await;
        Ok(())
    }

    /// List payments on a project, filtered to what the requester may see.
    ///
    /// The creator sees every payment; any other participant only payments
    /// where they are the payee.
    pub async fn list_by_project(
        &self,
        project_id: ProjectId,
        requester_email: &EmailAddress,
    ) -> Result<Vec<Payment>, DomainError> {
        let project = self.load_project(project_id).await?;
        let requester = self.resolve_user(requester_email).await?;
        self.access
            .require_participant(
                &project,
                &requester,
                "Not allowed to view payments for this project",
            )
            .await?;
        let mut payments = self.payments.list_by_project(project_id).await?;
        if !is_project_creator(&project, &requester) {
            payments.retain(|payment| payment.payee_id() == requester.id());
        }
        Ok(payments)
    }

    /// List payments in the given escrow status, across projects.
    pub async fn list_by_status(
        &self,
        status: PaymentStatus,
    ) -> Result<Vec<Payment>, DomainError> {
        Ok(self.payments.list_by_status(status).await?)
    }

    async fn load(&self, id: PaymentId) -> Result<Payment, DomainError> {
        let key = CacheKey::payment(id);
        if let Some(payment) = self.cache.get(&key).await {
            return Ok(payment);
        }
        let payment = self
            .payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment not found"))?;
        self.cache.put(&key, payment.clone()).await;
        Ok(payment)
    }

    async fn load_project(&self, id: ProjectId) -> Result<Project, DomainError> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Project not found"))
    }

    async fn resolve_user(&self, email: &EmailAddress) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}

#[cfg(test)]
#[path = "payments_tests.rs"]
mod tests;
