//! # Key-Value Repository
//!
//! String values keyed by string, with upsert semantics. Multi-key writes
//! run in one transaction so a session is never half-saved.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;

/// Repository over the `kv_store` table.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    pool: SqlitePool,
}

impl KeyValueStore {
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueStore { pool }
    }

    /// Reads a value. `None` if the key was never set or was removed.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Inserts or replaces a value.
    pub async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "kv set");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes several values atomically.
    pub async fn set_many(&self, pairs: &[(&str, &str)]) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for (key, value) in pairs {
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(*value)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(keys = pairs.len(), "kv set_many committed");
        Ok(())
    }

    /// Deletes a key. Returns `true` if it existed.
    pub async fn remove(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes several keys atomically.
    pub async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for key in keys {
            sqlx::query("DELETE FROM kv_store WHERE key = ?1")
                .bind(*key)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    async fn kv() -> super::KeyValueStore {
        Database::new(DbConfig::in_memory()).await.unwrap().kv()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        assert_eq!(kv().await.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let kv = kv().await;
        kv.set("empID", "EMP01").await.unwrap();
        kv.set("empID", "EMP02").await.unwrap();
        assert_eq!(kv.get("empID").await.unwrap().as_deref(), Some("EMP02"));
    }

    #[tokio::test]
    async fn test_many_and_remove() {
        let kv = kv().await;
        kv.set_many(&[("a", "1"), ("b", "2"), ("c", "3")]).await.unwrap();

        assert!(kv.remove("a").await.unwrap());
        assert!(!kv.remove("a").await.unwrap());

        kv.remove_many(&["b", "c", "missing"]).await.unwrap();
        assert_eq!(kv.get("b").await.unwrap(), None);
        assert_eq!(kv.get("c").await.unwrap(), None);
    }
}
