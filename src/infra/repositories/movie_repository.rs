//! Movie repository implementation with soft delete support.

use async_trait::async_trait;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::movie::{self, ActiveModel, Entity as MovieEntity};
use crate::config::SEARCH_RESULT_LIMIT;
use crate::domain::{Movie, MovieChanges, NewMovie};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Movie repository trait for dependency injection.
///
/// All query methods exclude soft-deleted movies unless stated otherwise.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Find active movie by ID (excludes soft-deleted)
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>>;

    /// Find movie by ID including soft-deleted
    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Movie>>;

    /// List active movies, newest first, optionally filtered by genre
    async fn list(&self, genre_id: Option<Uuid>, limit: u64, offset: u64)
        -> AppResult<Vec<Movie>>;

    /// All active movies in a genre
    async fn find_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Movie>>;

    /// Active movies among the given IDs
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Movie>>;

    /// Case-insensitive substring search over title, description and
    /// director, capped at the search result limit
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Create a new movie with rating 0
    async fn create(&self, movie: NewMovie) -> AppResult<Movie>;

    /// Apply a partial update to an active movie
    async fn update(&self, id: Uuid, changes: MovieChanges) -> AppResult<Movie>;

    /// Soft delete movie by ID (sets deleted_at timestamp)
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of MovieRepository with soft delete
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl MovieRepository for MovieStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let result = MovieEntity::find_by_id(id)
            .filter(movie::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Movie::from))
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let result = MovieEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Movie::from))
    }

    async fn list(
        &self,
        genre_id: Option<Uuid>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<Movie>> {
        let mut query = MovieEntity::find().filter(movie::Column::DeletedAt.is_null());

        if let Some(genre_id) = genre_id {
            query = query.filter(movie::Column::GenreId.eq(genre_id));
        }

        let models = query
            .order_by_desc(movie::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Movie::from).collect())
    }

    async fn find_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Movie>> {
        let models = MovieEntity::find()
            .filter(movie::Column::DeletedAt.is_null())
            .filter(movie::Column::GenreId.eq(genre_id))
            .order_by_desc(movie::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Movie::from).collect())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Movie>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = MovieEntity::find()
            .filter(movie::Column::DeletedAt.is_null())
            .filter(movie::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Movie::from).collect())
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        let pattern = format!("%{}%", escape_like(query));

        let matches = Condition::any()
            .add(Expr::col(movie::Column::Title).ilike(pattern.clone()))
            .add(Expr::col(movie::Column::Description).ilike(pattern.clone()))
            .add(Expr::col(movie::Column::Director).ilike(pattern));

        let models = MovieEntity::find()
            .filter(movie::Column::DeletedAt.is_null())
            .filter(matches)
            .limit(SEARCH_RESULT_LIMIT)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Movie::from).collect())
    }

    async fn create(&self, new: NewMovie) -> AppResult<Movie> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            description: Set(new.description),
            genre_id: Set(new.genre_id),
            year: Set(new.year),
            director: Set(new.director),
            duration: Set(new.duration),
            poster: Set(new.poster),
            trailer_url: Set(new.trailer_url),
            rating: Set(0.0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Movie::from(model))
    }

    async fn update(&self, id: Uuid, changes: MovieChanges) -> AppResult<Movie> {
        // Only active movies can be updated
        let model = MovieEntity::find_by_id(id)
            .filter(movie::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Movie"))?;

        let mut active: ActiveModel = model.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(genre_id) = changes.genre_id {
            active.genre_id = Set(genre_id);
        }
        if let Some(year) = changes.year {
            active.year = Set(year);
        }
        if let Some(director) = changes.director {
            active.director = Set(director);
        }
        if let Some(duration) = changes.duration {
            active.duration = Set(duration);
        }
        if let Some(poster) = changes.poster {
            active.poster = Set(poster);
        }
        if let Some(trailer_url) = changes.trailer_url {
            active.trailer_url = Set(trailer_url);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Movie::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let model = MovieEntity::find_by_id(id)
            .filter(movie::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Movie"))?;

        let mut active: ActiveModel = model.into();
        let now = chrono::Utc::now();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100% rust"), "100\\% rust");
        assert_eq!(escape_like("the_matrix"), "the\\_matrix");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
    }
}
