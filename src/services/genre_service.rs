//! Genre service - Read access to the genre catalog.
//!
//! Genres are created by seeding; the API only reads them.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Genre;
use crate::errors::AppResult;
use crate::infra::GenreRepository;

/// Genre service trait for dependency injection.
#[async_trait]
pub trait GenreService: Send + Sync {
    /// List all genres, name ascending
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;

    /// Find a genre by ID; `None` when the reference is dangling
    async fn get_genre(&self, id: Uuid) -> AppResult<Option<Genre>>;
}

/// Concrete implementation of GenreService
pub struct GenreManager {
    genres: Arc<dyn GenreRepository>,
}

impl GenreManager {
    /// Create new genre service instance
    pub fn new(genres: Arc<dyn GenreRepository>) -> Self {
        Self { genres }
    }
}

#[async_trait]
impl GenreService for GenreManager {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.genres.list().await
    }

    async fn get_genre(&self, id: Uuid) -> AppResult<Option<Genre>> {
        self.genres.find_by_id(id).await
    }
}
