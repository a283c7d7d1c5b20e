//! Typed account, post and image-storage client for blogs hosted on an
//! Appwrite-compatible backend.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
