//! Subcommand implementations.

pub mod export;
pub mod list;
pub mod users;
