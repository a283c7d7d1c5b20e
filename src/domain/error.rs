use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("`{field}` must not be empty")]
    MissingField { field: &'static str },
    #[error("domain validation failed: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Reject an absent (empty) parameter before a remote call is issued.
///
/// The value is otherwise passed through untouched; a password of spaces is
/// the backend's to judge.
pub fn require(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::missing(field));
    }
    Ok(())
}

/// Reject a blank resource id (slug, user id, file id). Ids are never
/// whitespace on the backend, so a blank one cannot address anything.
pub fn require_id(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::missing(field));
    }
    Ok(())
}
