//! Outbound adapters implementing the domain ports.
//!
//! Adapters are thin translators between domain types and infrastructure;
//! they contain no business logic. The in-memory implementations here back
//! the default wiring and the integration tests; a database-backed set can
//! be slotted in behind the same ports.

pub mod cache;
pub mod persistence;
