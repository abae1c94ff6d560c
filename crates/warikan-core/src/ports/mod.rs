//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod pagination;
mod repository;

pub use pagination::{Page, PageRequest};
pub use repository::{
    AuthorRepository, BaseRepository, EntryFilter, EntryRepository, GroupRepository,
    PaymentRepository, UserRepository,
};
