//! Seed command - Resets the catalog and loads demo data.
//!
//! Creates an admin and a regular user, the standard genres, and a handful
//! of movies so a fresh install has something to browse.

use std::sync::Arc;

use sea_orm::EntityTrait;

use crate::config::Config;
use crate::domain::{NewMovie, Password, UserRole};
use crate::errors::AppResult;
use crate::infra::repositories::entities::{favorite, genre, movie, review, user};
use crate::infra::{
    Database, GenreRepository, GenreStore, MovieRepository, MovieStore, UserRepository, UserStore,
};

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Arc::new(Database::connect(&config).await);
    let conn = db.get_connection();

    // Clear existing data, children before parents
    favorite::Entity::delete_many().exec(&conn).await?;
    review::Entity::delete_many().exec(&conn).await?;
    movie::Entity::delete_many().exec(&conn).await?;
    genre::Entity::delete_many().exec(&conn).await?;
    user::Entity::delete_many().exec(&conn).await?;
    tracing::info!("Cleared existing data");

    let users = UserStore::new(conn.clone());
    let genres = GenreStore::new(conn.clone());
    let movies = MovieStore::new(conn);

    users
        .create(
            "admin@test.com".to_string(),
            Password::new("admin123")?.into_string(),
            "Admin User".to_string(),
            UserRole::Admin,
        )
        .await?;
    users
        .create(
            "user@test.com".to_string(),
            Password::new("user123")?.into_string(),
            "Regular User".to_string(),
            UserRole::User,
        )
        .await?;
    tracing::info!("Created admin and demo users");

    let genre_data = [
        (
            "Action",
            "High-energy films with thrilling sequences and physical feats",
        ),
        (
            "Drama",
            "Serious, plot-driven presentations portraying realistic characters",
        ),
        (
            "Comedy",
            "Light-hearted plots designed to amuse and entertain",
        ),
        ("Horror", "Films designed to frighten and invoke fear"),
        ("Sci-Fi", "Science fiction films with futuristic themes"),
    ];

    let mut created_genres = Vec::with_capacity(genre_data.len());
    for (name, description) in genre_data {
        created_genres.push(
            genres
                .create(name.to_string(), description.to_string())
                .await?,
        );
    }
    tracing::info!("Created {} genres", created_genres.len());

    let action = created_genres[0].id;
    let drama = created_genres[1].id;
    let sci_fi = created_genres[4].id;

    let movie_data = [
        NewMovie {
            title: "The Matrix".to_string(),
            description: "A computer hacker learns about the true nature of reality".to_string(),
            genre_id: sci_fi,
            year: 1999,
            director: "Lana Wachowski, Lilly Wachowski".to_string(),
            duration: 136,
            poster: "https://via.placeholder.com/300x450?text=The+Matrix".to_string(),
            trailer_url: None,
        },
        NewMovie {
            title: "Inception".to_string(),
            description: "A thief who steals corporate secrets through dream-sharing technology"
                .to_string(),
            genre_id: sci_fi,
            year: 2010,
            director: "Christopher Nolan".to_string(),
            duration: 148,
            poster: "https://via.placeholder.com/300x450?text=Inception".to_string(),
            trailer_url: None,
        },
        NewMovie {
            title: "Die Hard".to_string(),
            description: "An NYPD officer tries to save hostages taken in a Los Angeles tower"
                .to_string(),
            genre_id: action,
            year: 1988,
            director: "John McTiernan".to_string(),
            duration: 132,
            poster: "https://via.placeholder.com/300x450?text=Die+Hard".to_string(),
            trailer_url: None,
        },
        NewMovie {
            title: "The Shawshank Redemption".to_string(),
            description: "Two imprisoned men bond over a number of years, finding solace"
                .to_string(),
            genre_id: drama,
            year: 1994,
            director: "Frank Darabont".to_string(),
            duration: 142,
            poster: "https://via.placeholder.com/300x450?text=Shawshank".to_string(),
            trailer_url: None,
        },
    ];

    for new in movie_data {
        movies.create(new).await?;
    }
    tracing::info!("Seeded demo movies");

    tracing::info!("Seeding complete");
    Ok(())
}
