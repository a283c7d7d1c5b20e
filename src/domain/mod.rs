//! Domain layer: identifiers, access control, queries and write payloads.

pub mod error;
pub mod files;
pub mod ids;
pub mod permissions;
pub mod posts;
pub mod query;
pub mod slug;
