//! HTTP inbound adapter exposing REST endpoints.

pub mod applications;
pub mod auth;
pub mod error;
pub mod health;
pub mod messages;
pub mod payments;
pub mod projects;
pub mod state;
pub mod users;

pub use error::ApiResult;
