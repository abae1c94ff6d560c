use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;
use super::validate::Problems;
use crate::error::DomainError;

pub const USERNAME_MAX: usize = 150;

/// User entity - an account that can pay for or be paid for in a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
    /// Ids of the groups this user belongs to, ascending.
    pub groups: Vec<Id>,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
    pub groups: Vec<Id>,
}

impl NewUser {
    pub fn new(username: String, email: String, groups: Vec<Id>) -> Self {
        Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            date_joined: Utc::now(),
            groups: normalize_ids(groups),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_user(&self.username, &self.email)
    }
}

impl User {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_user(&self.username, &self.email)
    }

    pub fn is_member_of(&self, group_id: Id) -> bool {
        self.groups.binary_search(&group_id).is_ok()
    }

    pub fn set_username(&mut self, username: &str) {
        self.username = username.trim().to_string();
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = email.trim().to_string();
    }

    /// Replace group memberships, keeping them sorted and unique.
    pub fn set_groups(&mut self, groups: Vec<Id>) {
        self.groups = normalize_ids(groups);
    }
}

fn check_user(username: &str, email: &str) -> Result<(), DomainError> {
    let mut problems = Problems::new();
    problems.required_text("username", username, USERNAME_MAX);
    if !username.is_empty() && !username.chars().all(is_username_char) {
        problems.push(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    // Blank email is allowed for users.
    if !email.is_empty() {
        problems.email("email", email);
    }
    problems.finish()
}

fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

/// Sort and dedup a list of related ids.
pub(crate) fn normalize_ids(mut ids: Vec<Id>) -> Vec<Id> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
