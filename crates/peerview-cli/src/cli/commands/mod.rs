//! CLI command handlers.

pub mod catalog;
pub mod config;
pub mod run;
