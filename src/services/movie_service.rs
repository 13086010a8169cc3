//! Movie service - Catalog browsing, search and admin management.
//!
//! Successful creates and updates publish a full movie snapshot on the
//! movie topic; the publish never fails the mutation.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::{Movie, MovieChanges, NewMovie};
use crate::errors::{AppError, AppResult};
use crate::events::EventBus;
use crate::infra::{GenreRepository, MovieRepository};

/// Movie service trait for dependency injection.
#[async_trait]
pub trait MovieService: Send + Sync {
    /// List active movies, newest first, optionally filtered by genre
    async fn list_movies(
        &self,
        genre_id: Option<Uuid>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> AppResult<Vec<Movie>>;

    /// Get an active movie by ID
    async fn get_movie(&self, id: Uuid) -> AppResult<Movie>;

    /// Find a movie by ID regardless of soft-delete state; reviews keep
    /// referring to deleted movies
    async fn get_movie_with_deleted(&self, id: Uuid) -> AppResult<Option<Movie>>;

    /// All active movies in a genre
    async fn movies_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Movie>>;

    /// Case-insensitive substring search over title, description, director
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Add a movie to the catalog (admin operation, checked at the API)
    async fn create_movie(&self, movie: NewMovie) -> AppResult<Movie>;

    /// Partially update a movie (admin operation, checked at the API)
    async fn update_movie(&self, id: Uuid, changes: MovieChanges) -> AppResult<Movie>;

    /// Soft delete a movie; its reviews and favorites remain
    async fn delete_movie(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of MovieService
pub struct MovieManager {
    movies: Arc<dyn MovieRepository>,
    genres: Arc<dyn GenreRepository>,
    events: Arc<EventBus>,
}

impl MovieManager {
    /// Create new movie service instance
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        genres: Arc<dyn GenreRepository>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            movies,
            genres,
            events,
        }
    }

    async fn ensure_genre_exists(&self, genre_id: Uuid) -> AppResult<()> {
        self.genres
            .find_by_id(genre_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound("Genre"))
    }
}

#[async_trait]
impl MovieService for MovieManager {
    async fn list_movies(
        &self,
        genre_id: Option<Uuid>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> AppResult<Vec<Movie>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0);
        self.movies.list(genre_id, limit, offset).await
    }

    async fn get_movie(&self, id: Uuid) -> AppResult<Movie> {
        self.movies
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Movie"))
    }

    async fn get_movie_with_deleted(&self, id: Uuid) -> AppResult<Option<Movie>> {
        self.movies.find_by_id_with_deleted(id).await
    }

    async fn movies_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Movie>> {
        self.movies.find_by_genre(genre_id).await
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        self.movies.search(query).await
    }

    async fn create_movie(&self, new: NewMovie) -> AppResult<Movie> {
        self.ensure_genre_exists(new.genre_id).await?;

        let movie = self.movies.create(new).await?;
        self.events.publish_movie_added(movie.clone());

        tracing::info!(movie_id = %movie.id, title = %movie.title, "movie created");
        Ok(movie)
    }

    async fn update_movie(&self, id: Uuid, changes: MovieChanges) -> AppResult<Movie> {
        if let Some(genre_id) = changes.genre_id {
            self.ensure_genre_exists(genre_id).await?;
        }

        let movie = self.movies.update(id, changes).await?;
        self.events.publish_movie_updated(movie.clone());

        Ok(movie)
    }

    async fn delete_movie(&self, id: Uuid) -> AppResult<()> {
        self.movies.delete(id).await?;
        tracing::info!(movie_id = %id, "movie soft-deleted");
        Ok(())
    }
}
