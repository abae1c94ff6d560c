use serde::{Deserialize, Serialize};

use super::Id;
use super::validate::Problems;
use crate::error::DomainError;

pub const GROUP_NAME_MAX: usize = 150;

/// Named set of users. Consumers are the members of one such group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
}

impl NewGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_name(&self.name)
    }
}

impl Group {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_name(&self.name)
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }
}

fn check_name(name: &str) -> Result<(), DomainError> {
    let mut problems = Problems::new();
    problems.required_text("name", name, GROUP_NAME_MAX);
    problems.finish()
}
