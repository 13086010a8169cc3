//! Movie domain entity and catalog write models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Movie domain entity
///
/// `rating` is derived: the arithmetic mean of the movie's review ratings,
/// 0.0 while no reviews exist. `deleted_at` is the soft-delete marker;
/// soft-deleted movies stay out of every listing but keep their reviews
/// and favorites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre_id: Uuid,
    pub year: i32,
    pub director: String,
    /// Runtime in minutes
    pub duration: i32,
    pub poster: String,
    pub trailer_url: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Movie {
    /// Check if movie is soft deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if movie is active (not deleted)
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Fields required to add a movie to the catalog
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub genre_id: Uuid,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    pub poster: String,
    pub trailer_url: Option<String>,
}

/// Partial update of an existing movie; `None` fields are left untouched.
///
/// `trailer_url` is doubly optional: the outer `None` means "no change",
/// `Some(None)` clears the trailer.
#[derive(Debug, Clone, Default)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre_id: Option<Uuid>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub duration: Option<i32>,
    pub poster: Option<String>,
    pub trailer_url: Option<Option<String>>,
}
