//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250310_000001_create_users_table;
mod m20250310_000002_create_genres_table;
mod m20250310_000003_create_movies_table;
mod m20250310_000004_create_reviews_table;
mod m20250310_000005_create_favorites_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000001_create_users_table::Migration),
            Box::new(m20250310_000002_create_genres_table::Migration),
            Box::new(m20250310_000003_create_movies_table::Migration),
            Box::new(m20250310_000004_create_reviews_table::Migration),
            Box::new(m20250310_000005_create_favorites_table::Migration),
        ]
    }
}
