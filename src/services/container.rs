//! Service Container - Centralized service construction and access.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AuthService, Authenticator, FavoriteManager, FavoriteService, GenreManager, GenreService,
    MovieManager, MovieService, ReviewManager, ReviewService,
};
use crate::config::Config;
use crate::events::EventBus;
use crate::infra::{FavoriteStore, GenreStore, MovieStore, ReviewStore, UserStore};

/// Container providing access to all application services.
///
/// Holds services behind trait objects so tests can wire in alternative
/// implementations via `new`.
pub struct Services {
    auth: Arc<dyn AuthService>,
    movies: Arc<dyn MovieService>,
    genres: Arc<dyn GenreService>,
    reviews: Arc<dyn ReviewService>,
    favorites: Arc<dyn FavoriteService>,
}

impl Services {
    /// Create a container from already-built services
    pub fn new(
        auth: Arc<dyn AuthService>,
        movies: Arc<dyn MovieService>,
        genres: Arc<dyn GenreService>,
        reviews: Arc<dyn ReviewService>,
        favorites: Arc<dyn FavoriteService>,
    ) -> Self {
        Self {
            auth,
            movies,
            genres,
            reviews,
            favorites,
        }
    }

    /// Wire all services from a database connection and configuration
    pub fn from_connection(
        db: DatabaseConnection,
        config: Config,
        events: Arc<EventBus>,
    ) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let genre_repo = Arc::new(GenreStore::new(db.clone()));
        let movie_repo = Arc::new(MovieStore::new(db.clone()));
        let review_repo = Arc::new(ReviewStore::new(db.clone()));
        let favorite_repo = Arc::new(FavoriteStore::new(db));

        Self {
            auth: Arc::new(Authenticator::new(user_repo, config)),
            movies: Arc::new(MovieManager::new(
                movie_repo.clone(),
                genre_repo.clone(),
                events.clone(),
            )),
            genres: Arc::new(GenreManager::new(genre_repo)),
            reviews: Arc::new(ReviewManager::new(review_repo, movie_repo.clone(), events)),
            favorites: Arc::new(FavoriteManager::new(favorite_repo, movie_repo)),
        }
    }

    /// Get authentication service
    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    /// Get movie service
    pub fn movies(&self) -> Arc<dyn MovieService> {
        self.movies.clone()
    }

    /// Get genre service
    pub fn genres(&self) -> Arc<dyn GenreService> {
        self.genres.clone()
    }

    /// Get review service
    pub fn reviews(&self) -> Arc<dyn ReviewService> {
        self.reviews.clone()
    }

    /// Get favorite service
    pub fn favorites(&self) -> Arc<dyn FavoriteService> {
        self.favorites.clone()
    }
}
