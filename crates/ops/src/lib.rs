//! `catalog-ops`: operator utilities for the poster catalog.
//!
//! Each subcommand opens what it needs (a database pool or an HTTP client),
//! runs one query or bulk write, prints a report, and exits.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
