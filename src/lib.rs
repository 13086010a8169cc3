//! Movie Platform - A movie catalog with a GraphQL API
//!
//! Browsing, search, reviews and favorites over a GraphQL contract, with
//! real-time movie and review events delivered over WebSocket
//! subscriptions.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **events**: In-process publish/subscribe fan-out
//! - **infra**: Infrastructure concerns (database, repositories)
//! - **api**: GraphQL schema, HTTP transport, routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Load demo data
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use events::EventBus;
