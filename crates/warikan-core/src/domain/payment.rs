use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Id;
use super::user::normalize_ids;
use super::validate::Problems;
use crate::error::DomainError;

/// Smallest amount (yen) a payment can record.
pub const AMOUNT_MIN: i32 = 1;
/// Largest amount (yen) a payment can record.
pub const AMOUNT_MAX: i32 = 100_000;

pub const TITLE_MAX: usize = 128;

/// One user paying a sum on behalf of one or more other users.
///
/// `cleared` is whatever the client last set it to; nothing here derives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Id,
    pub paid_by: Id,
    /// Payees, ascending and unique.
    pub paid_for: Vec<Id>,
    pub amount: i32,
    pub title: String,
    pub date: NaiveDate,
    pub cleared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub paid_by: Id,
    pub paid_for: Vec<Id>,
    pub amount: i32,
    pub title: String,
    pub date: NaiveDate,
    pub cleared: bool,
}

impl NewPayment {
    /// Build a payment; `date` defaults to today (UTC).
    pub fn new(
        paid_by: Id,
        paid_for: Vec<Id>,
        amount: i32,
        title: &str,
        date: Option<NaiveDate>,
        cleared: bool,
    ) -> Self {
        Self {
            paid_by,
            paid_for: normalize_ids(paid_for),
            amount,
            title: title.trim().to_string(),
            date: date.unwrap_or_else(|| Utc::now().date_naive()),
            cleared,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_payment(self.amount, &self.title, &self.paid_for)
    }
}

impl Payment {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_payment(self.amount, &self.title, &self.paid_for)
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.trim().to_string();
    }

    pub fn set_paid_for(&mut self, paid_for: Vec<Id>) {
        self.paid_for = normalize_ids(paid_for);
    }

    /// Every user id this payment references.
    pub fn user_ids(&self) -> impl Iterator<Item = Id> + '_ {
        std::iter::once(self.paid_by).chain(self.paid_for.iter().copied())
    }
}

fn check_payment(amount: i32, title: &str, paid_for: &[Id]) -> Result<(), DomainError> {
    let mut problems = Problems::new();
    if amount < AMOUNT_MIN {
        problems.push(
            "amount",
            format!("Ensure this value is greater than or equal to {}.", AMOUNT_MIN),
        );
    }
    if amount > AMOUNT_MAX {
        problems.push(
            "amount",
            format!("Ensure this value is less than or equal to {}.", AMOUNT_MAX),
        );
    }
    problems.required_text("title", title, TITLE_MAX);
    if paid_for.is_empty() {
        problems.push("paid_for", "This list may not be empty.");
    }
    problems.finish()
}
