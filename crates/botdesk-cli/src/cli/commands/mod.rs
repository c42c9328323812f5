//! CLI command handlers.

pub mod bots;
pub mod config;
pub mod console;
pub mod pricing;
