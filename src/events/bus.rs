//! In-process broadcast topics for catalog events.
//!
//! Two topics: a global movie topic (created + updated) and a review topic
//! that subscribers filter by movie id. Delivery is fire-and-forget and
//! at-most-once: publishing never blocks or fails the mutation, nothing is
//! persisted or replayed, and a receiver that falls behind the channel
//! capacity loses the oldest events.

use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use uuid::Uuid;

use crate::config::EVENT_CHANNEL_CAPACITY;
use crate::domain::{Movie, Review};

/// Catalog change on the movie topic
#[derive(Debug, Clone)]
pub enum MovieEvent {
    Added(Movie),
    Updated(Movie),
}

/// New review on the review topic
#[derive(Debug, Clone)]
pub struct ReviewEvent {
    pub review: Review,
}

/// Broadcast hub shared by mutation services (publishers) and GraphQL
/// subscriptions (consumers).
pub struct EventBus {
    movies: broadcast::Sender<MovieEvent>,
    reviews: broadcast::Sender<ReviewEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

impl EventBus {
    /// Create a bus whose topics buffer `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (movies, _) = broadcast::channel(capacity);
        let (reviews, _) = broadcast::channel(capacity);
        Self { movies, reviews }
    }

    /// Publish a newly created movie. No-op without subscribers.
    pub fn publish_movie_added(&self, movie: Movie) {
        self.publish_movie(MovieEvent::Added(movie));
    }

    /// Publish an updated movie. No-op without subscribers.
    pub fn publish_movie_updated(&self, movie: Movie) {
        self.publish_movie(MovieEvent::Updated(movie));
    }

    fn publish_movie(&self, event: MovieEvent) {
        // SendError only means nobody is listening right now
        if self.movies.send(event).is_err() {
            tracing::trace!("movie event published with no subscribers");
        }
    }

    /// Publish a newly created review. No-op without subscribers.
    pub fn publish_review_added(&self, review: Review) {
        if self.reviews.send(ReviewEvent { review }).is_err() {
            tracing::trace!("review event published with no subscribers");
        }
    }

    /// Stream of movies created after the call, one independent copy per
    /// subscriber.
    pub fn movie_added_stream(&self) -> impl Stream<Item = Movie> {
        Self::filtered(self.movies.subscribe(), |event| match event {
            MovieEvent::Added(movie) => Some(movie),
            MovieEvent::Updated(_) => None,
        })
    }

    /// Stream of movies updated after the call
    pub fn movie_updated_stream(&self) -> impl Stream<Item = Movie> {
        Self::filtered(self.movies.subscribe(), |event| match event {
            MovieEvent::Updated(movie) => Some(movie),
            MovieEvent::Added(_) => None,
        })
    }

    /// Stream of reviews created for one movie after the call
    pub fn review_added_stream(&self, movie_id: Uuid) -> impl Stream<Item = Review> {
        Self::filtered(self.reviews.subscribe(), move |event| {
            (event.review.movie_id == movie_id).then_some(event.review)
        })
    }

    /// Adapt a broadcast receiver into a filtered stream. Lag errors are
    /// dropped silently: missed events are simply never delivered.
    fn filtered<E, T, F>(rx: broadcast::Receiver<E>, select: F) -> impl Stream<Item = T>
    where
        E: Clone + Send + 'static,
        T: Send + 'static,
        F: FnMut(E) -> Option<T> + Send + 'static,
    {
        let mut select = select;
        BroadcastStream::new(rx).filter_map(move |item| match item {
            Ok(event) => select(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::debug!("subscriber lagged, skipped {} events", skipped);
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn movie(title: &str) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "A movie long enough to describe".to_string(),
            genre_id: Uuid::new_v4(),
            year: 2020,
            director: "Jane Doe".to_string(),
            duration: 120,
            poster: "https://example.com/poster.jpg".to_string(),
            trailer_url: None,
            rating: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn review(movie_id: Uuid) -> Review {
        Review {
            id: Uuid::new_v4(),
            movie_id,
            user_id: Uuid::new_v4(),
            rating: 9,
            comment: "Loved it".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn added_stream_ignores_updates() {
        let bus = EventBus::default();
        let mut added = std::pin::pin!(bus.movie_added_stream());

        bus.publish_movie_updated(movie("Updated"));
        bus.publish_movie_added(movie("Added"));

        let received = added.next().await.unwrap();
        assert_eq!(received.title, "Added");
    }

    #[tokio::test]
    async fn each_subscriber_gets_its_own_copy() {
        let bus = EventBus::default();
        let mut first = std::pin::pin!(bus.movie_added_stream());
        let mut second = std::pin::pin!(bus.movie_added_stream());

        bus.publish_movie_added(movie("Broadcast"));

        assert_eq!(first.next().await.unwrap().title, "Broadcast");
        assert_eq!(second.next().await.unwrap().title, "Broadcast");
    }

    #[tokio::test]
    async fn review_stream_is_scoped_to_one_movie() {
        let bus = EventBus::default();
        let watched = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut stream = std::pin::pin!(bus.review_added_stream(watched));

        bus.publish_review_added(review(other));
        bus.publish_review_added(review(watched));

        let received = stream.next().await.unwrap();
        assert_eq!(received.movie_id, watched);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        // Must not panic or error
        bus.publish_movie_added(movie("Nobody listening"));
        bus.publish_review_added(review(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::default();
        bus.publish_movie_added(movie("Before subscribe"));

        let mut stream = std::pin::pin!(bus.movie_added_stream());
        bus.publish_movie_added(movie("After subscribe"));

        assert_eq!(stream.next().await.unwrap().title, "After subscribe");
    }
}
