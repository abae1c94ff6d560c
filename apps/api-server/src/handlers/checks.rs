//! Request checks that need the repositories: references and uniqueness.

use warikan_core::DomainError;
use warikan_core::domain::Id;

use crate::middleware::error::{AppError, AppResult};

/// Field problems gathered across the record's own rules and lookups,
/// reported together as one `400`.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<String>);

impl FieldErrors {
    /// Start from a record's `validate()` outcome.
    pub fn from_validation(result: Result<(), DomainError>) -> AppResult<Self> {
        match result {
            Ok(()) => Ok(Self::default()),
            Err(DomainError::Validation(errors)) => Ok(Self(errors)),
            Err(other) => Err(other.into()),
        }
    }

    /// Keep the value of a field parse, or record why it failed.
    pub fn collect<T>(&mut self, result: Result<T, DomainError>) -> AppResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(DomainError::Validation(errors)) => {
                self.0.extend(errors);
                Ok(None)
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn push(&mut self, field: &str, reason: impl AsRef<str>) {
        self.0.push(format!("{}: {}", field, reason.as_ref()));
    }

    /// A related id that points at nothing.
    pub fn missing_pk(&mut self, field: &str, id: Id) {
        self.push(
            field,
            format!("Invalid pk \"{}\" - object does not exist.", id),
        );
    }

    pub fn finish(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_record_and_lookup_problems() {
        let mut errors =
            FieldErrors::from_validation(Err(DomainError::invalid("title", "blank"))).unwrap();
        errors.missing_pk("paid_by", 9);

        match errors.finish() {
            Err(AppError::Validation(messages)) => {
                assert_eq!(
                    messages,
                    vec![
                        "title: blank".to_string(),
                        "paid_by: Invalid pk \"9\" - object does not exist.".to_string(),
                    ]
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_collect_keeps_going_after_bad_field() {
        let mut errors = FieldErrors::default();
        let parsed: Option<u8> = errors
            .collect(Err(DomainError::invalid("status", "\"x\" is not a valid choice.")))
            .unwrap();
        assert!(parsed.is_none());
        assert_eq!(errors.collect(Ok::<_, DomainError>(3)).unwrap(), Some(3));
        errors.push("author", "missing");

        match errors.finish() {
            Err(AppError::Validation(messages)) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_is_ok() {
        assert!(FieldErrors::from_validation(Ok(())).unwrap().finish().is_ok());
    }
}
