//! Review repository implementation.
//!
//! Review writes carry a side effect: the parent movie's `rating` column is
//! the mean of its reviews. Insert/delete and the recompute run in one
//! database transaction so the stored mean always reflects the review set
//! it was computed from.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::movie::{self, Entity as MovieEntity};
use super::entities::review::{self, ActiveModel, Entity as ReviewEntity};
use crate::domain::{mean_rating, NewReview, Review};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Review repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Find review by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;

    /// Reviews for a movie, newest first
    async fn find_by_movie(&self, movie_id: Uuid) -> AppResult<Vec<Review>>;

    /// The one review a user wrote for a movie, if any
    async fn find_by_movie_and_user(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Review>>;

    /// Insert a review and recompute the movie's mean rating atomically
    async fn create(&self, user_id: Uuid, review: NewReview) -> AppResult<Review>;

    /// Delete a review and recompute the movie's mean rating atomically
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ReviewRepository
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write the mean of the movie's current reviews to the movie row.
    /// Must run inside the same transaction as the review write.
    async fn recompute_rating(txn: &DatabaseTransaction, movie_id: Uuid) -> AppResult<()> {
        let reviews: Vec<Review> = ReviewEntity::find()
            .filter(review::Column::MovieId.eq(movie_id))
            .all(txn)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(Review::from)
            .collect();

        let rating = mean_rating(&reviews);

        MovieEntity::update_many()
            .col_expr(movie::Column::Rating, Expr::value(rating))
            .col_expr(movie::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(movie::Column::Id.eq(movie_id))
            .exec(txn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn insert_and_recompute(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        new: NewReview,
    ) -> AppResult<Review> {
        let now = chrono::Utc::now();
        let movie_id = new.movie_id;

        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            movie_id: Set(new.movie_id),
            user_id: Set(user_id),
            rating: Set(new.rating),
            comment: Set(new.comment),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The (movie, user) unique index backstops the service-level check
        let model = active_model.insert(txn).await.map_err(|e| match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Review"),
            _ => AppError::from(e),
        })?;

        Self::recompute_rating(txn, movie_id).await?;
        Ok(Review::from(model))
    }

    async fn delete_and_recompute(txn: &DatabaseTransaction, id: Uuid) -> AppResult<()> {
        let model = ReviewEntity::find_by_id(id)
            .one(txn)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound("Review"))?;

        let movie_id = model.movie_id;

        ReviewEntity::delete_by_id(id)
            .exec(txn)
            .await
            .map_err(AppError::from)?;

        Self::recompute_rating(txn, movie_id).await
    }

    /// Run `op` inside a serializable read-write transaction, committing on
    /// success and rolling back on error.
    async fn transactional<T, F>(&self, op: F) -> AppResult<T>
    where
        T: Send,
        F: for<'a> FnOnce(
                &'a DatabaseTransaction,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        match op(&txn).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Review::from))
    }

    async fn find_by_movie(&self, movie_id: Uuid) -> AppResult<Vec<Review>> {
        let models = ReviewEntity::find()
            .filter(review::Column::MovieId.eq(movie_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Review::from).collect())
    }

    async fn find_by_movie_and_user(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find()
            .filter(review::Column::MovieId.eq(movie_id))
            .filter(review::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Review::from))
    }

    async fn create(&self, user_id: Uuid, new: NewReview) -> AppResult<Review> {
        self.transactional(move |txn| Box::pin(Self::insert_and_recompute(txn, user_id, new)))
            .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.transactional(move |txn| Box::pin(Self::delete_and_recompute(txn, id)))
            .await
    }
}
