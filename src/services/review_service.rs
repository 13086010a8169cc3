//! Review service - Review lifecycle and rating aggregation.
//!
//! Creation requires a live movie and at most one review per (movie, user);
//! deletion requires the author or an admin. The repository keeps the
//! movie's mean rating in step with every write. New reviews are published
//! on the per-movie review topic.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewReview, Review};
use crate::errors::{AppError, AppResult};
use crate::events::EventBus;
use crate::infra::{MovieRepository, ReviewRepository};

/// Review service trait for dependency injection.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Reviews for a movie, newest first. The movie may be soft-deleted;
    /// a wholly unknown movie id is an error.
    async fn list_reviews(&self, movie_id: Uuid) -> AppResult<Vec<Review>>;

    /// Submit a review for a live movie
    async fn create_review(&self, author_id: Uuid, review: NewReview) -> AppResult<Review>;

    /// Delete a review; allowed for its author or an admin
    async fn delete_review(&self, actor_id: Uuid, actor_is_admin: bool, id: Uuid)
        -> AppResult<()>;
}

/// Concrete implementation of ReviewService
pub struct ReviewManager {
    reviews: Arc<dyn ReviewRepository>,
    movies: Arc<dyn MovieRepository>,
    events: Arc<EventBus>,
}

impl ReviewManager {
    /// Create new review service instance
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        movies: Arc<dyn MovieRepository>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            reviews,
            movies,
            events,
        }
    }
}

#[async_trait]
impl ReviewService for ReviewManager {
    async fn list_reviews(&self, movie_id: Uuid) -> AppResult<Vec<Review>> {
        // Reviews of a soft-deleted movie remain queryable
        self.movies
            .find_by_id_with_deleted(movie_id)
            .await?
            .ok_or(AppError::NotFound("Movie"))?;

        self.reviews.find_by_movie(movie_id).await
    }

    async fn create_review(&self, author_id: Uuid, new: NewReview) -> AppResult<Review> {
        // A review can only be created against a live movie
        self.movies
            .find_by_id(new.movie_id)
            .await?
            .ok_or(AppError::NotFound("Movie"))?;

        if self
            .reviews
            .find_by_movie_and_user(new.movie_id, author_id)
            .await?
            .is_some()
        {
            return Err(AppError::validation("You have already reviewed this movie"));
        }

        let review = self.reviews.create(author_id, new).await?;
        self.events.publish_review_added(review.clone());

        tracing::info!(review_id = %review.id, movie_id = %review.movie_id, "review created");
        Ok(review)
    }

    async fn delete_review(
        &self,
        actor_id: Uuid,
        actor_is_admin: bool,
        id: Uuid,
    ) -> AppResult<()> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Review"))?;

        // Only the author or an admin may delete
        if !actor_is_admin && review.user_id != actor_id {
            return Err(AppError::Forbidden);
        }

        self.reviews.delete(id).await
    }
}
