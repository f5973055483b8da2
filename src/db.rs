use std::sync::Arc;

use anyhow::Result;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::PgPoolOptions;

use crate::{
    config::AppConfig,
    store::{DocumentStore, MemoryStore, PgDocumentStore},
};

pub type DbPool = sqlx::PgPool;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Applies the SQL files under `migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Wrap an existing pool in a SeaORM connection.
pub fn create_orm_conn(pool: DbPool) -> DatabaseConnection {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool)
}

/// Picks the document store for the configuration: PostgreSQL when a
/// database URL is set (migrations are applied first), memory otherwise.
pub async fn create_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            tracing::info!("using postgres document store");
            Ok(Arc::new(PgDocumentStore::new(create_orm_conn(pool))))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, data is kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
