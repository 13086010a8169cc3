//! API layer - HTTP transport and the GraphQL surface
//!
//! This module contains all HTTP-related concerns:
//! - GraphQL schema, resolvers and subscription streams
//! - Bearer-token context extraction (HTTP and WebSocket)
//! - Route definitions and the health endpoint

pub mod graphql;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
