//! In-memory persistence - used when PostgreSQL is unavailable and in tests.

mod repos;
mod store;

pub use repos::{
    InMemoryAuthorRepository, InMemoryEntryRepository, InMemoryGroupRepository,
    InMemoryPaymentRepository, InMemoryUserRepository,
};
pub use store::MemoryDatabase;
