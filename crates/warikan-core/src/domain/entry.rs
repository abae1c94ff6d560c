use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;
use super::validate::Problems;
use crate::error::DomainError;

pub const ENTRY_TITLE_MAX: usize = 128;

/// Publication label of an entry. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Draft,
    Public,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Public => "public",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EntryStatus::Draft),
            "public" => Ok(EntryStatus::Public),
            other => Err(DomainError::invalid(
                "status",
                format!("\"{}\" is not a valid choice.", other),
            )),
        }
    }
}

/// Entry entity - a blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Id,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: EntryStatus,
    pub author_id: Id,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: EntryStatus,
    pub author_id: Id,
}

impl NewEntry {
    pub fn new(title: String, body: String, status: EntryStatus, author_id: Id) -> Self {
        let now = Utc::now();
        Self {
            title: title.trim().to_string(),
            body,
            created_at: now,
            updated_at: now,
            status,
            author_id,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_entry(&self.title, &self.body)
    }
}

impl Entry {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_entry(&self.title, &self.body)
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.trim().to_string();
    }

    /// Mark the entry as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn check_entry(title: &str, body: &str) -> Result<(), DomainError> {
    let mut problems = Problems::new();
    problems.required_text("title", title, ENTRY_TITLE_MAX);
    if body.trim().is_empty() {
        problems.push("body", "This field may not be blank.");
    }
    problems.finish()
}
