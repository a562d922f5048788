//! Actor identity extractor.
//!
//! Authentication itself happens upstream (an API gateway terminates the
//! session or token); the verified principal reaches this service as the
//! `x-authenticated-email` request header. The extractor validates the
//! address shape and hands handlers a typed [`EmailAddress`], so no handler
//! ever reads the header directly.

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpRequest};

use crate::domain::{DomainError, EmailAddress};
use crate::inbound::http::error::ApiError;

/// Name of the header carrying the upstream-verified principal.
pub const ACTOR_EMAIL_HEADER: &str = "x-authenticated-email";

/// Authenticated actor for the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedActor(EmailAddress);

impl AuthenticatedActor {
    /// The actor's normalized email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.0
    }
}

fn extract_actor(req: &HttpRequest) -> Result<AuthenticatedActor, DomainError> {
    let value = req
        .headers()
        .get(ACTOR_EMAIL_HEADER)
        .ok_or_else(|| DomainError::unauthorized("Authentication required"))?;
    let raw = value
        .to_str()
        .map_err(|_| DomainError::unauthorized("Authentication required"))?;
    let email = EmailAddress::new(raw)
        .map_err(|_| DomainError::unauthorized("Authentication required"))?;
    Ok(AuthenticatedActor(email))
}

impl FromRequest for AuthenticatedActor {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(extract_actor(req).map_err(ApiError::from))
    }
}
