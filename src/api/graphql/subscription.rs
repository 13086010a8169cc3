//! GraphQL subscription root.
//!
//! Subscriptions attach to the in-process event bus: each subscriber gets
//! its own stream of full entity snapshots, starting from the moment of
//! subscription. No replay, at-most-once delivery.

use std::sync::Arc;

use async_graphql::{Context, Result, Subscription, ID};
use futures::{Stream, StreamExt};

use super::parse_id;
use super::types::{Movie, Review};
use crate::events::EventBus;

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Movies added to the catalog while subscribed
    async fn movie_added(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Movie>> {
        let events = ctx.data_unchecked::<Arc<EventBus>>();
        Ok(events.movie_added_stream().map(Movie::from))
    }

    /// Movie updates published while subscribed
    async fn movie_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Movie>> {
        let events = ctx.data_unchecked::<Arc<EventBus>>();
        Ok(events.movie_updated_stream().map(Movie::from))
    }

    /// Reviews created for one movie while subscribed
    async fn review_added(
        &self,
        ctx: &Context<'_>,
        movie_id: ID,
    ) -> Result<impl Stream<Item = Review>> {
        let movie_id = parse_id(&movie_id, "movie")?;
        let events = ctx.data_unchecked::<Arc<EventBus>>();
        Ok(events.review_added_stream(movie_id).map(Review::from))
    }
}
