//! SeaORM entities, one module per table.

pub mod blog_user;
pub mod entry;
pub mod group;
pub mod payment;
pub mod payment_payee;
pub mod user;
pub mod user_group;
