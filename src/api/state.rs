//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::api::graphql::{build_schema, AppSchema};
use crate::config::Config;
use crate::events::EventBus;
use crate::infra::Database;
use crate::services::{AuthService, Services};

/// Application state shared by all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Executable GraphQL schema with services and event bus attached
    pub schema: AppSchema,
    /// Authentication service, used to resolve bearer tokens per request
    pub auth_service: Arc<dyn AuthService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create application state from a database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let events = Arc::new(EventBus::default());
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config.clone(),
            events.clone(),
        ));
        let auth_service = services.auth();
        let schema = build_schema(services, events);

        Self {
            schema,
            auth_service,
            database,
            config,
        }
    }
}
