//! GraphQL schema assembly.

use std::sync::Arc;

use async_graphql::Schema;

use super::mutation::MutationRoot;
use super::query::QueryRoot;
use super::subscription::SubscriptionRoot;
use crate::events::EventBus;
use crate::services::Services;

/// The application schema type
pub type AppSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Build the schema with the service container and event bus attached as
/// context data, shared by queries, mutations and subscriptions.
pub fn build_schema(services: Arc<Services>, events: Arc<EventBus>) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(services)
        .data(events)
        .finish()
}
