//! GraphQL query root.

use std::sync::Arc;

use async_graphql::{Context, Object, Result, ID};

use super::auth::{current_user, require_auth};
use super::types::{Genre, Movie, Review, User};
use super::parse_id;
use crate::services::Services;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The currently authenticated user
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let caller = require_auth(ctx)?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        let user = services.auth().get_user(caller.id).await?;
        Ok(User::from(user))
    }

    /// Active movies, newest first, optionally filtered by genre
    async fn movies(
        &self,
        ctx: &Context<'_>,
        genre_id: Option<ID>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Vec<Movie>> {
        let genre_id = genre_id.map(|id| parse_id(&id, "genre")).transpose()?;
        let limit = limit.map(|v| v.max(0) as u64);
        let offset = offset.map(|v| v.max(0) as u64);

        let services = ctx.data_unchecked::<Arc<Services>>();
        let movies = services.movies().list_movies(genre_id, limit, offset).await?;
        Ok(movies.into_iter().map(Movie::from).collect())
    }

    /// A single active movie
    async fn movie(&self, ctx: &Context<'_>, id: ID) -> Result<Movie> {
        let id = parse_id(&id, "movie")?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        let movie = services.movies().get_movie(id).await?;
        Ok(Movie::from(movie))
    }

    /// Reviews for a movie, newest first
    async fn reviews(&self, ctx: &Context<'_>, movie_id: ID) -> Result<Vec<Review>> {
        let movie_id = parse_id(&movie_id, "movie")?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        let reviews = services.reviews().list_reviews(movie_id).await?;
        Ok(reviews.into_iter().map(Review::from).collect())
    }

    /// All genres, name ascending
    async fn genres(&self, ctx: &Context<'_>) -> Result<Vec<Genre>> {
        let services = ctx.data_unchecked::<Arc<Services>>();
        let genres = services.genres().list_genres().await?;
        Ok(genres.into_iter().map(Genre::from).collect())
    }

    /// Case-insensitive substring search over title, description and director
    async fn search_movies(&self, ctx: &Context<'_>, query: String) -> Result<Vec<Movie>> {
        let services = ctx.data_unchecked::<Arc<Services>>();
        let movies = services.movies().search_movies(&query).await?;
        Ok(movies.into_iter().map(Movie::from).collect())
    }

    /// The calling user's favorited movies, most recently added first
    async fn favorites(&self, ctx: &Context<'_>) -> Result<Vec<Movie>> {
        let caller = require_auth(ctx)?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        let movies = services.favorites().favorite_movies(caller.id).await?;
        Ok(movies.into_iter().map(Movie::from).collect())
    }

    /// Whether the calling user has favorited the movie; false when anonymous
    async fn is_favorite(&self, ctx: &Context<'_>, movie_id: ID) -> Result<bool> {
        let Some(caller) = current_user(ctx) else {
            return Ok(false);
        };

        let movie_id = parse_id(&movie_id, "movie")?;
        let services = ctx.data_unchecked::<Arc<Services>>();
        Ok(services.favorites().is_favorite(caller.id, movie_id).await?)
    }
}
