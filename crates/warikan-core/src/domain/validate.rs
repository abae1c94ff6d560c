//! Field checks shared by the domain records.
//!
//! Each check pushes `field: reason` onto an error list so a record can
//! report every problem in one pass.

use crate::error::DomainError;

/// Collects field problems for one record.
#[derive(Debug, Default)]
pub(crate) struct Problems(Vec<String>);

impl Problems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, reason: impl AsRef<str>) {
        self.0.push(format!("{}: {}", field, reason.as_ref()));
    }

    /// Required, non-blank, at most `max` characters.
    pub fn required_text(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.push(field, "This field may not be blank.");
        } else {
            self.max_chars(field, value, max);
        }
    }

    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        self.max_chars(field, value, EMAIL_MAX);
        if !is_email(value) {
            self.push(field, "Enter a valid email address.");
        }
    }

    pub fn finish(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

pub(crate) const EMAIL_MAX: usize = 254;

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub(crate) fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut labels = domain.split('.');
    let valid_labels = labels.clone().all(|l| !l.is_empty());
    valid_labels && labels.nth(1).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_email() {
        assert!(is_email("taro@example.com"));
        assert!(is_email("a.b+c@mail.example.jp"));
        assert!(!is_email("taro"));
        assert!(!is_email("taro@localhost"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("taro@@example.com"));
        assert!(!is_email("ta ro@example.com"));
        assert!(!is_email("taro@example..com"));
    }

    #[test]
    fn test_problems_collects_everything() {
        let mut problems = Problems::new();
        problems.required_text("title", "   ", 10);
        problems.max_chars("name", "abcdef", 3);
        let err = problems.finish().unwrap_err();
        match err {
            DomainError::Validation(messages) => {
                assert_eq!(messages.len(), 2);
                assert!(messages[0].starts_with("title:"));
                assert!(messages[1].contains("no more than 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
