//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the GraphQL server
//! - `migrate` - Database migrations
//! - `seed` - Load demo catalog data

pub mod args;

pub use args::{Cli, Commands};
