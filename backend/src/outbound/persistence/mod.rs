//! Persistence adapters for the repository ports.

mod memory;

pub use memory::{
    InMemoryApplicationRepository, InMemoryMessageRepository, InMemoryPaymentRepository,
    InMemoryProjectRepository, InMemoryUserRepository,
};
