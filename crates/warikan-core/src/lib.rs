//! # Warikan Core
//!
//! The domain layer: payment and blog records, their field rules, and the
//! repository ports the infrastructure crate implements.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
