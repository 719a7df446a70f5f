use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::repository::{Document, Lookup, Repository};

/// Document collection stored as JSONB rows `(id, owner, body)`
pub struct PgRepository<T> {
    table: String,
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T: Document> PgRepository<T> {
    pub fn new(pool: PgPool) -> Result<Self, DatabaseError> {
        Ok(Self {
            table: DatabaseManager::quote_identifier(T::COLLECTION)?,
            pool,
            _phantom: PhantomData,
        })
    }

    fn decode(row: &sqlx::postgres::PgRow) -> Result<T, DatabaseError> {
        let body: Value = row.try_get("body")?;
        Ok(serde_json::from_value(body)?)
    }

    async fn fetch_one_where(&self, column: &str, value: &str) -> Result<Lookup<T>, DatabaseError> {
        let sql = format!("SELECT body FROM {} WHERE {} = $1 LIMIT 1", self.table, column);
        let row = sqlx::query(&sql).bind(value).fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::decode).transpose().map(Lookup::from)
    }
}

#[async_trait]
impl<T: Document> Repository<T> for PgRepository<T> {
    async fn get_by_id(&self, id: &str) -> Result<Lookup<T>, DatabaseError> {
        self.fetch_one_where("id", id).await
    }

    async fn get_by_owner(&self, owner: &str) -> Result<Lookup<T>, DatabaseError> {
        self.fetch_one_where("owner", owner).await
    }

    async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT body FROM {} ORDER BY updated_at DESC", self.table);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(Self::decode).collect()
    }

    async fn save(&self, doc: &T) -> Result<(), DatabaseError> {
        let body = serde_json::to_value(doc)?;
        let sql = format!(
            "INSERT INTO {} (id, owner, body, updated_at) VALUES ($1, $2, $3, now())
             ON CONFLICT (id) DO UPDATE
             SET owner = EXCLUDED.owner, body = EXCLUDED.body, updated_at = now()",
            self.table
        );
        sqlx::query(&sql)
            .bind(doc.id())
            .bind(doc.owner_key())
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error::<T>(e, doc.owner_key()))?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_by_owner(&self, owner: &str) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE owner = $1", self.table);
        let result = sqlx::query(&sql).bind(owner).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

const UNIQUE_VIOLATION: &str = "23505";

/// Unique-index violations on the owner key become [`DatabaseError::DuplicateKey`]
fn write_error<T: Document>(err: sqlx::Error, owner: &str) -> DatabaseError {
    let unique_violation = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);

    if unique_violation {
        DatabaseError::DuplicateKey {
            collection: T::COLLECTION,
            key: owner.to_string(),
        }
    } else {
        DatabaseError::Sqlx(err)
    }
}
