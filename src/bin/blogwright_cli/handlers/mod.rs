#![deny(clippy::all, clippy::pedantic)]

pub mod account;
pub mod files;
pub mod posts;
