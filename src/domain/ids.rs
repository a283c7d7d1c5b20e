//! Client-side generation of resource identifiers.

use uuid::Uuid;

/// Longest identifier the backend accepts for documents, files and users.
pub const MAX_ID_LEN: usize = 36;

/// Produce a fresh identifier for a new account or stored file.
///
/// The hyphen-free form keeps the value within [`MAX_ID_LEN`] and starts with
/// an alphanumeric character, which the backend requires.
pub fn unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}
