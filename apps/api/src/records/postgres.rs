use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use crate::records::{BuildFn, Collection, RecordStore, StoreError};

/// PostgreSQL backend: one table per collection, `(id BIGINT, data JSONB, updated_at)`.
///
/// Table names come from `Collection::table`, never from user input.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list(&self, collection: Collection) -> Result<Vec<(i64, Value)>, StoreError> {
        let sql = format!("SELECT id, data FROM {} ORDER BY id ASC", collection.table());
        Ok(sqlx::query_as::<_, (i64, Value)>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get(&self, collection: Collection, id: i64) -> Result<Option<Value>, StoreError> {
        let sql = format!("SELECT data FROM {} WHERE id = $1", collection.table());
        Ok(sqlx::query_scalar::<_, Value>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn put(&self, collection: Collection, id: i64, data: Value) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, data, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, updated_at = now()
            "#,
            collection.table()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(data)
            .execute(&self.pool)
            .await?;
        debug!("Saved {collection} record {id}");
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: i64) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_new(
        &self,
        collection: Collection,
        build: BuildFn,
    ) -> Result<(i64, Value), StoreError> {
        let table = collection.table();
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent inserts; plain reads are unaffected.
        sqlx::query(&format!("LOCK TABLE {table} IN SHARE ROW EXCLUSIVE MODE"))
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, (i64, Value)>(&format!(
            "SELECT id, data FROM {table} ORDER BY id ASC"
        ))
        .fetch_all(&mut *tx)
        .await?;
        let id = existing.last().map(|(id, _)| *id).unwrap_or(0).max(0) + 1;
        let data = build(id, &existing)?;

        sqlx::query(&format!(
            "INSERT INTO {table} (id, data, updated_at) VALUES ($1, $2, now())"
        ))
        .bind(id)
        .bind(&data)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Inserted {collection} record {id}");
        Ok((id, data))
    }

    async fn replace_all(
        &self,
        collection: Collection,
        rows: Vec<(i64, Value)>,
    ) -> Result<(), StoreError> {
        let table = collection.table();
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;

        let insert = format!("INSERT INTO {table} (id, data, updated_at) VALUES ($1, $2, now())");
        let count = rows.len();
        for (id, data) in rows {
            sqlx::query(&insert)
                .bind(id)
                .bind(data)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!("Replaced {collection} with {count} records");
        Ok(())
    }
}
