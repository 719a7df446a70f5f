use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::models::{Post, Profile, User};
use crate::database::repository::Document;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("Duplicate {collection} key: {key}")]
    DuplicateKey { collection: &'static str, key: String },

    #[error("Stored document is unreadable: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the Postgres pool backing the document collections
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Creates the document tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for collection in [User::COLLECTION, Profile::COLLECTION, Post::COLLECTION] {
            let table = Self::quote_identifier(collection)?;
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    owner TEXT NOT NULL,
                    body JSONB NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )"
            );
            sqlx::query(&ddl).execute(&self.pool).await?;

            let index = format!(
                "CREATE INDEX IF NOT EXISTS {} ON {table} (owner)",
                Self::quote_identifier(&format!("{collection}_owner_idx"))?
            );
            sqlx::query(&index).execute(&self.pool).await?;
        }

        // At most one profile per user and one user per email
        for collection in [User::COLLECTION, Profile::COLLECTION] {
            let unique = format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} (owner)",
                Self::quote_identifier(&format!("{collection}_owner_key"))?,
                Self::quote_identifier(collection)?
            );
            sqlx::query(&unique).execute(&self.pool).await?;
        }

        info!("Document schema ready");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Quote a collection name after checking it is a plain identifier
    pub(crate) fn quote_identifier(name: &str) -> Result<String, DatabaseError> {
        if !Self::is_valid_identifier(name) {
            return Err(DatabaseError::InvalidCollection(name.to_string()));
        }
        Ok(format!("\"{}\"", name))
    }

    fn is_valid_identifier(name: &str) -> bool {
        !name.is_empty()
            && name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
            && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }
}
