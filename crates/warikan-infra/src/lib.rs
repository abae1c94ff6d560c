//! # Warikan Infrastructure
//!
//! Concrete implementations of the repository ports defined in `warikan-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL persistence via SeaORM
//!
//! The in-memory store is always built.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

pub use memory::MemoryDatabase;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, connect};
