//! CLI command handlers

pub mod commands;

pub use commands::{load_table, roundtrip, save, show, validate, OutputFormat};
