//! Favorite repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::favorite::{self, ActiveModel, Entity as FavoriteEntity};
use crate::domain::Favorite;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Favorite repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// The favorite entry for a (user, movie) pair, if any
    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Favorite>>;

    /// A user's favorites, most recent first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>>;

    /// Record a favorite
    async fn create(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Favorite>;

    /// Remove a favorite if present
    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of FavoriteRepository
pub struct FavoriteStore {
    db: DatabaseConnection,
}

impl FavoriteStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepository for FavoriteStore {
    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Favorite>> {
        let result = FavoriteEntity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::MovieId.eq(movie_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Favorite::from))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        let models = FavoriteEntity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Favorite::from).collect())
    }

    async fn create(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Favorite> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            movie_id: Set(movie_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::conflict("Favorite")
                }
                _ => AppError::from(e),
            }
        })?;

        Ok(Favorite::from(model))
    }

    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()> {
        let existing = FavoriteEntity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::MovieId.eq(movie_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        if let Some(model) = existing {
            model.delete(&self.db).await.map_err(AppError::from)?;
        }

        Ok(())
    }
}
