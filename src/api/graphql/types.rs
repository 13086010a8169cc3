//! GraphQL object and input types
//!
//! Object types are API-facing views over domain entities; relationship
//! fields (movie genre, review author) resolve lazily through the service
//! container. Input objects carry `validator` rules checked before any
//! service call.

use std::sync::Arc;

use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::config::{MIN_MOVIE_YEAR, YEAR_FUTURE_WINDOW};
use crate::domain;
use crate::domain::UserRole;
use crate::errors::AppError;
use crate::services::Services;

// =============================================================================
// Object Types
// =============================================================================

/// User object type (never exposes the password hash)
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            id: ID(user.id.to_string()),
            email: user.email,
            name: user.name,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Genre object type
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Genre {
    pub id: ID,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[graphql(skip)]
    uuid: Uuid,
}

#[ComplexObject]
impl Genre {
    /// Active movies in this genre
    async fn movies(&self, ctx: &Context<'_>) -> Result<Vec<Movie>> {
        let services = ctx.data_unchecked::<Arc<Services>>();
        let movies = services.movies().movies_by_genre(self.uuid).await?;
        Ok(movies.into_iter().map(Movie::from).collect())
    }
}

impl From<domain::Genre> for Genre {
    fn from(genre: domain::Genre) -> Self {
        Self {
            id: ID(genre.id.to_string()),
            name: genre.name,
            description: genre.description,
            created_at: genre.created_at,
            updated_at: genre.updated_at,
            uuid: genre.id,
        }
    }
}

/// Movie object type
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Movie {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    pub poster: String,
    pub trailer_url: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[graphql(skip)]
    genre_id: Uuid,
}

#[ComplexObject]
impl Movie {
    /// The movie's genre; null if the reference is dangling
    async fn genre(&self, ctx: &Context<'_>) -> Result<Option<Genre>> {
        let services = ctx.data_unchecked::<Arc<Services>>();
        let genre = services.genres().get_genre(self.genre_id).await?;
        Ok(genre.map(Genre::from))
    }
}

impl From<domain::Movie> for Movie {
    fn from(movie: domain::Movie) -> Self {
        Self {
            id: ID(movie.id.to_string()),
            title: movie.title,
            description: movie.description,
            year: movie.year,
            director: movie.director,
            duration: movie.duration,
            poster: movie.poster,
            trailer_url: movie.trailer_url,
            rating: movie.rating,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
            genre_id: movie.genre_id,
        }
    }
}

/// Review object type
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Review {
    pub id: ID,
    pub movie_id: ID,
    pub user_id: ID,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[graphql(skip)]
    movie_ref: Uuid,
    #[graphql(skip)]
    user_ref: Uuid,
}

#[ComplexObject]
impl Review {
    /// The reviewed movie, present even after a soft delete
    async fn movie(&self, ctx: &Context<'_>) -> Result<Option<Movie>> {
        let services = ctx.data_unchecked::<Arc<Services>>();
        let movie = services.movies().get_movie_with_deleted(self.movie_ref).await?;
        Ok(movie.map(Movie::from))
    }

    /// The review author; null if the account no longer resolves
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let services = ctx.data_unchecked::<Arc<Services>>();
        match services.auth().get_user(self.user_ref).await {
            Ok(user) => Ok(Some(User::from(user))),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl From<domain::Review> for Review {
    fn from(review: domain::Review) -> Self {
        Self {
            id: ID(review.id.to_string()),
            movie_id: ID(review.movie_id.to_string()),
            user_id: ID(review.user_id.to_string()),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            updated_at: review.updated_at,
            movie_ref: review.movie_id,
            user_ref: review.user_id,
        }
    }
}

/// Token plus the authenticated user, returned by register/login
#[derive(Debug, Clone, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Input Types
// =============================================================================

/// Input for registering a new account
#[derive(Debug, InputObject, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
}

/// Input for logging in
#[derive(Debug, InputObject, Validate)]
pub struct LoginInput {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Input for adding a movie to the catalog
#[derive(Debug, InputObject, Validate)]
pub struct CreateMovieInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    #[validate(length(min = 10, max = 2000, message = "Description must be 10 to 2000 characters"))]
    pub description: String,
    pub genre_id: ID,
    #[validate(custom(function = "validate_release_year"))]
    pub year: i32,
    #[validate(length(min = 2, max = 100, message = "Director name must be 2 to 100 characters"))]
    pub director: String,
    #[validate(range(min = 1, max = 600, message = "Duration must be 1 to 600 minutes"))]
    pub duration: i32,
    #[validate(url(message = "Poster must be a valid URL"))]
    pub poster: String,
    /// Optional; an empty string means "no trailer"
    #[validate(url(message = "Trailer must be a valid URL"))]
    pub trailer_url: Option<String>,
}

/// Input for partially updating a movie; omitted fields are unchanged
#[derive(Debug, InputObject, Validate)]
pub struct UpdateMovieInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 2000, message = "Description must be 10 to 2000 characters"))]
    pub description: Option<String>,
    pub genre_id: Option<ID>,
    #[validate(custom(function = "validate_release_year"))]
    pub year: Option<i32>,
    #[validate(length(min = 2, max = 100, message = "Director name must be 2 to 100 characters"))]
    pub director: Option<String>,
    #[validate(range(min = 1, max = 600, message = "Duration must be 1 to 600 minutes"))]
    pub duration: Option<i32>,
    #[validate(url(message = "Poster must be a valid URL"))]
    pub poster: Option<String>,
    /// An empty string clears the trailer
    #[validate(url(message = "Trailer must be a valid URL"))]
    pub trailer_url: Option<String>,
}

/// Input for submitting a review
#[derive(Debug, InputObject, Validate)]
pub struct CreateReviewInput {
    pub movie_id: ID,
    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: i32,
    #[validate(length(min = 5, max = 1000, message = "Comment must be 5 to 1000 characters"))]
    pub comment: String,
}

/// Release years run from 1900 to shortly past the current year
fn validate_release_year(year: i32) -> Result<(), ValidationError> {
    let max_year = Utc::now().year() + YEAR_FUTURE_WINDOW;
    if year < MIN_MOVIE_YEAR || year > max_year {
        let mut error = ValidationError::new("release_year");
        error.message = Some(
            format!("Year must be between {} and {}", MIN_MOVIE_YEAR, max_year).into(),
        );
        return Err(error);
    }
    Ok(())
}
