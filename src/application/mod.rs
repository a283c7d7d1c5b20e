//! Application services: the account and content façades over the backend.

pub mod auth;
pub mod backend;
pub mod content;
pub mod error;

#[cfg(test)]
pub(crate) mod testing;
