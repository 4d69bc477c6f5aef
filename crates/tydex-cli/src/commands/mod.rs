//! CLI subcommand implementations.

pub mod extract;
pub mod files;
pub mod print;
