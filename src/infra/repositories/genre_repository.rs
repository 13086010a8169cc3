//! Genre repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::genre::{self, ActiveModel, Entity as GenreEntity};
use crate::domain::Genre;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Genre repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// Find genre by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>>;

    /// List all genres, name ascending
    async fn list(&self) -> AppResult<Vec<Genre>>;

    /// Create a new genre
    async fn create(&self, name: String, description: String) -> AppResult<Genre>;
}

/// Concrete implementation of GenreRepository
pub struct GenreStore {
    db: DatabaseConnection,
}

impl GenreStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for GenreStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let result = GenreEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Genre::from))
    }

    async fn list(&self) -> AppResult<Vec<Genre>> {
        let models = GenreEntity::find()
            .order_by_asc(genre::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Genre::from).collect())
    }

    async fn create(&self, name: String, description: String) -> AppResult<Genre> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Genre"),
                _ => AppError::from(e),
            }
        })?;

        Ok(Genre::from(model))
    }
}
