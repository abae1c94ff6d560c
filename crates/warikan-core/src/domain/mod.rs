//! Domain entities - the records both APIs expose.

mod author;
mod entry;
mod group;
mod payment;
mod user;
mod validate;

pub use author::{Author, NewAuthor};
pub use entry::{Entry, EntryStatus, NewEntry};
pub use group::{Group, NewGroup};
pub use payment::{AMOUNT_MAX, AMOUNT_MIN, NewPayment, Payment};
pub use user::{NewUser, User};

/// Primary key type shared by every table.
pub type Id = i32;
