//! GraphQL API with subscriptions for real-time updates
//!
//! This module provides the application's single API surface using
//! async-graphql: queries, mutations, and subscriptions over WebSocket.

pub mod auth;
mod mutation;
mod query;
mod schema;
mod subscription;
pub mod types;

pub use auth::{require_admin, require_auth, CurrentUser};
pub use schema::{build_schema, AppSchema};

use async_graphql::ID;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// Parse an opaque GraphQL ID into a UUID, rejecting malformed input
/// before it reaches the store.
pub(crate) fn parse_id(id: &ID, entity: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id.as_str())
        .map_err(|_| AppError::validation(format!("Invalid {} ID", entity)))
}

/// Run `validator` rules on an input object, folding all failures into a
/// single validation error.
pub(crate) fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|errors| AppError::validation(format_validation_errors(&errors)))
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
