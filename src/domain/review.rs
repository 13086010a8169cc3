//! Review domain entity and rating aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review domain entity
///
/// One review per (movie, user) pair; `rating` is an integer from 1 to 10.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to submit a review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub movie_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

/// Mean of the given review ratings, 0.0 for an empty set.
///
/// This is the catalog invariant: a movie's stored rating always equals
/// the mean over its current review set.
pub fn mean_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    sum as f64 / reviews.len() as f64
}
