//! Infrastructure layer - External systems integration
//!
//! This module handles database connections, migrations and repositories.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{
    FavoriteRepository, FavoriteStore, GenreRepository, GenreStore, MovieRepository, MovieStore,
    ReviewRepository, ReviewStore, UserRepository, UserStore,
};
