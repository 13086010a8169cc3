//! GraphQL mutation root.
//!
//! Authorization is checked per mutation: register/login are anonymous,
//! reviews and favorites need an authenticated user, catalog management
//! needs an admin. Inputs are validated before any service call.

use std::sync::Arc;

use async_graphql::{Context, Object, Result, ID};

use super::auth::{require_admin, require_auth};
use super::types::{
    AuthPayload, CreateMovieInput, CreateReviewInput, LoginInput, Movie, RegisterInput, Review,
    UpdateMovieInput, User,
};
use super::{parse_id, validate_input};
use crate::domain::{MovieChanges, NewMovie, NewReview};
use crate::services::Services;

pub struct MutationRoot;

/// An empty trailer URL means "no trailer"
fn normalize_trailer(trailer_url: Option<String>) -> Option<String> {
    trailer_url.filter(|url| !url.is_empty())
}

#[Object]
impl MutationRoot {
    /// Create an account and sign in
    async fn register(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<AuthPayload> {
        validate_input(&input)?;

        let services = ctx.data_unchecked::<Arc<Services>>();
        let (user, token) = services
            .auth()
            .register(input.email, input.password, input.name)
            .await?;

        Ok(AuthPayload {
            token: token.access_token,
            user: User::from(user),
        })
    }

    /// Sign in with email and password
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthPayload> {
        validate_input(&input)?;

        let services = ctx.data_unchecked::<Arc<Services>>();
        let (user, token) = services.auth().login(input.email, input.password).await?;

        Ok(AuthPayload {
            token: token.access_token,
            user: User::from(user),
        })
    }

    /// Add a movie to the catalog (admin only)
    async fn create_movie(&self, ctx: &Context<'_>, input: CreateMovieInput) -> Result<Movie> {
        require_admin(ctx)?;

        let mut input = input;
        input.trailer_url = normalize_trailer(input.trailer_url);
        validate_input(&input)?;

        let genre_id = parse_id(&input.genre_id, "genre")?;
        let new = NewMovie {
            title: input.title,
            description: input.description,
            genre_id,
            year: input.year,
            director: input.director,
            duration: input.duration,
            poster: input.poster,
            trailer_url: input.trailer_url,
        };

        let services = ctx.data_unchecked::<Arc<Services>>();
        let movie = services.movies().create_movie(new).await?;
        Ok(Movie::from(movie))
    }

    /// Update a movie's details (admin only)
    async fn update_movie(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateMovieInput,
    ) -> Result<Movie> {
        require_admin(ctx)?;

        let id = parse_id(&id, "movie")?;

        // An empty trailer string clears the stored trailer
        let trailer_change = match &input.trailer_url {
            None => None,
            Some(url) if url.is_empty() => Some(None),
            Some(url) => Some(Some(url.clone())),
        };

        let mut input = input;
        input.trailer_url = normalize_trailer(input.trailer_url);
        validate_input(&input)?;

        let genre_id = input
            .genre_id
            .map(|gid| parse_id(&gid, "genre"))
            .transpose()?;

        let changes = MovieChanges {
            title: input.title,
            description: input.description,
            genre_id,
            year: input.year,
            director: input.director,
            duration: input.duration,
            poster: input.poster,
            trailer_url: trailer_change,
        };

        let services = ctx.data_unchecked::<Arc<Services>>();
        let movie = services.movies().update_movie(id, changes).await?;
        Ok(Movie::from(movie))
    }

    /// Soft delete a movie (admin only); its reviews remain queryable
    async fn delete_movie(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        require_admin(ctx)?;

        let id = parse_id(&id, "movie")?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        services.movies().delete_movie(id).await?;
        Ok(true)
    }

    /// Submit a review for a movie (one per user per movie)
    async fn create_review(&self, ctx: &Context<'_>, input: CreateReviewInput) -> Result<Review> {
        let caller = require_auth(ctx)?;
        validate_input(&input)?;

        let movie_id = parse_id(&input.movie_id, "movie")?;
        let new = NewReview {
            movie_id,
            rating: input.rating,
            comment: input.comment,
        };

        let services = ctx.data_unchecked::<Arc<Services>>();
        let review = services.reviews().create_review(caller.id, new).await?;
        Ok(Review::from(review))
    }

    /// Delete a review (author or admin)
    async fn delete_review(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let caller = require_auth(ctx)?;

        let id = parse_id(&id, "review")?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        services
            .reviews()
            .delete_review(caller.id, caller.is_admin(), id)
            .await?;
        Ok(true)
    }

    /// Favorite a movie; idempotent
    async fn add_to_favorites(&self, ctx: &Context<'_>, movie_id: ID) -> Result<bool> {
        let caller = require_auth(ctx)?;

        let movie_id = parse_id(&movie_id, "movie")?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        services.favorites().add_favorite(caller.id, movie_id).await?;
        Ok(true)
    }

    /// Remove a movie from favorites; idempotent
    async fn remove_from_favorites(&self, ctx: &Context<'_>, movie_id: ID) -> Result<bool> {
        let caller = require_auth(ctx)?;

        let movie_id = parse_id(&movie_id, "movie")?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        services
            .favorites()
            .remove_favorite(caller.id, movie_id)
            .await?;
        Ok(true)
    }
}
