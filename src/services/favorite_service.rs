//! Favorite service - A user's favorited movies.
//!
//! Adding and removing are idempotent: favoriting twice or removing a
//! non-favorite succeeds without effect.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Movie;
use crate::errors::{AppError, AppResult};
use crate::infra::{FavoriteRepository, MovieRepository};

/// Favorite service trait for dependency injection.
#[async_trait]
pub trait FavoriteService: Send + Sync {
    /// The user's favorited movies (active only), most recently added first
    async fn favorite_movies(&self, user_id: Uuid) -> AppResult<Vec<Movie>>;

    /// Whether the user has favorited the movie
    async fn is_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<bool>;

    /// Favorite a live movie; a no-op if already favorited
    async fn add_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()>;

    /// Remove a favorite; a no-op if not favorited
    async fn remove_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of FavoriteService
pub struct FavoriteManager {
    favorites: Arc<dyn FavoriteRepository>,
    movies: Arc<dyn MovieRepository>,
}

impl FavoriteManager {
    /// Create new favorite service instance
    pub fn new(favorites: Arc<dyn FavoriteRepository>, movies: Arc<dyn MovieRepository>) -> Self {
        Self { favorites, movies }
    }
}

#[async_trait]
impl FavoriteService for FavoriteManager {
    async fn favorite_movies(&self, user_id: Uuid) -> AppResult<Vec<Movie>> {
        let favorites = self.favorites.list_by_user(user_id).await?;
        let ids: Vec<Uuid> = favorites.iter().map(|f| f.movie_id).collect();

        // Soft-deleted movies drop out of the lookup, and with them out of
        // the favorites listing
        let mut movies: HashMap<Uuid, Movie> = self
            .movies
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        // Preserve most-recently-favorited-first order
        Ok(favorites
            .iter()
            .filter_map(|f| movies.remove(&f.movie_id))
            .collect())
    }

    async fn is_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<bool> {
        Ok(self.favorites.find(user_id, movie_id).await?.is_some())
    }

    async fn add_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()> {
        self.movies
            .find_by_id(movie_id)
            .await?
            .ok_or(AppError::NotFound("Movie"))?;

        if self.favorites.find(user_id, movie_id).await?.is_some() {
            // Already in favorites
            return Ok(());
        }

        self.favorites.create(user_id, movie_id).await?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()> {
        self.favorites.delete(user_id, movie_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Favorite;
    use crate::infra::repositories::{MockFavoriteRepository, MockMovieRepository};
    use chrono::Utc;

    fn movie(id: Uuid) -> Movie {
        Movie {
            id,
            title: "Inception".to_string(),
            description: "A thief steals secrets through dream-sharing".to_string(),
            genre_id: Uuid::new_v4(),
            year: 2010,
            director: "Christopher Nolan".to_string(),
            duration: 148,
            poster: "https://example.com/inception.jpg".to_string(),
            trailer_url: None,
            rating: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn favorite(user_id: Uuid, movie_id: Uuid) -> Favorite {
        Favorite {
            id: Uuid::new_v4(),
            user_id,
            movie_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let user_id = Uuid::new_v4();
        let movie_id = Uuid::new_v4();

        let mut movies = MockMovieRepository::new();
        movies
            .expect_find_by_id()
            .returning(|id| Ok(Some(movie(id))));

        let mut favorites = MockFavoriteRepository::new();
        favorites
            .expect_find()
            .returning(|user_id, movie_id| Ok(Some(favorite(user_id, movie_id))));
        // Never inserts when the pair already exists
        favorites.expect_create().never();

        let service = FavoriteManager::new(Arc::new(favorites), Arc::new(movies));
        service.add_favorite(user_id, movie_id).await.unwrap();
    }

    #[tokio::test]
    async fn add_rejects_missing_movie() {
        let mut movies = MockMovieRepository::new();
        movies.expect_find_by_id().returning(|_| Ok(None));

        let service =
            FavoriteManager::new(Arc::new(MockFavoriteRepository::new()), Arc::new(movies));
        let result = service.add_favorite(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound("Movie")));
    }

    #[tokio::test]
    async fn remove_missing_favorite_is_silent() {
        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_delete().returning(|_, _| Ok(()));

        let service = FavoriteManager::new(
            Arc::new(favorites),
            Arc::new(MockMovieRepository::new()),
        );
        service
            .remove_favorite(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listing_drops_deleted_movies_and_keeps_order() {
        let user_id = Uuid::new_v4();
        let kept_first = Uuid::new_v4();
        let deleted = Uuid::new_v4();
        let kept_second = Uuid::new_v4();

        let mut favorites = MockFavoriteRepository::new();
        favorites.expect_list_by_user().returning(move |user_id| {
            Ok(vec![
                favorite(user_id, kept_first),
                favorite(user_id, deleted),
                favorite(user_id, kept_second),
            ])
        });

        let mut movies = MockMovieRepository::new();
        movies.expect_find_by_ids().returning(move |_| {
            // The soft-deleted movie is absent from the lookup result
            Ok(vec![movie(kept_second), movie(kept_first)])
        });

        let service = FavoriteManager::new(Arc::new(favorites), Arc::new(movies));
        let listed = service.favorite_movies(user_id).await.unwrap();

        let ids: Vec<Uuid> = listed.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![kept_first, kept_second]);
    }
}
