use serde::{Deserialize, Serialize};

use super::Id;
use super::validate::Problems;
use crate::error::DomainError;

pub const AUTHOR_NAME_MAX: usize = 12;

/// Blog user - the author of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Id,
    pub name: String,
    pub mail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub mail: String,
}

impl NewAuthor {
    pub fn new(name: &str, mail: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            mail: mail.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_author(&self.name, &self.mail)
    }
}

impl Author {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_author(&self.name, &self.mail)
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    pub fn set_mail(&mut self, mail: &str) {
        self.mail = mail.trim().to_string();
    }
}

fn check_author(name: &str, mail: &str) -> Result<(), DomainError> {
    let mut problems = Problems::new();
    problems.required_text("name", name, AUTHOR_NAME_MAX);
    problems.email("mail", mail);
    problems.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_limit() {
        assert!(NewAuthor::new("twelve_chars", "a@b.jp").validate().is_ok());
        assert!(NewAuthor::new("thirteen_char", "a@b.jp").validate().is_err());
    }

    #[test]
    fn test_padding_does_not_count_toward_limit() {
        let author = NewAuthor::new("  twelve_chars  ", " a@b.jp ");
        assert_eq!(author.name, "twelve_chars");
        assert_eq!(author.mail, "a@b.jp");
        assert!(author.validate().is_ok());
    }

    #[test]
    fn test_mail_required() {
        let err = NewAuthor::new("hanako", "").validate().unwrap_err();
        assert!(err.to_string().contains("mail"));
    }
}
