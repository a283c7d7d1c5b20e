//! Post slugs double as document ids, so they must satisfy the backend's id
//! rules: at most 36 characters of `a-z A-Z 0-9 . - _`, not starting with a
//! special character.

use slug::slugify;
use thiserror::Error;

use super::ids::MAX_ID_LEN;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("`{id}` is longer than {max} characters", max = MAX_ID_LEN)]
    TooLong { id: String },
    #[error("`{id}` contains characters other than a-z, A-Z, 0-9, period, hyphen and underscore")]
    InvalidCharacter { id: String },
    #[error("`{id}` must start with a letter or digit")]
    LeadingSpecial { id: String },
}

/// Derive a document-id-safe slug from a post title.
pub fn derive_slug(title: &str) -> Result<String, SlugError> {
    if title.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let mut candidate = slugify(title);
    if candidate.len() > MAX_ID_LEN {
        candidate.truncate(MAX_ID_LEN);
        let trimmed = candidate.trim_end_matches('-').len();
        candidate.truncate(trimmed);
    }

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: title.to_string(),
        });
    }

    Ok(candidate)
}

/// Check a caller-chosen id against the backend's id rules.
pub fn validate_document_id(id: &str) -> Result<(), SlugError> {
    if id.is_empty() {
        return Err(SlugError::EmptyInput);
    }
    if id.len() > MAX_ID_LEN {
        return Err(SlugError::TooLong { id: id.to_string() });
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(SlugError::InvalidCharacter { id: id.to_string() });
    }
    if id.starts_with(['.', '-', '_']) {
        return Err(SlugError::LeadingSpecial { id: id.to_string() });
    }
    Ok(())
}
