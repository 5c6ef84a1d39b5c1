//! `SQLite` implementation of [`KeyValueStore`].

use std::future::Future;

use sqlx::SqlitePool;

use zonehub_app::ports::KeyValueStore;
use zonehub_domain::error::ZoneHubError;

use crate::error::StorageError;

const SELECT_BY_KEY: &str = "SELECT value FROM kv_store WHERE key = ?";
const UPSERT: &str = "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// `SQLite`-backed key-value store. Values are stored as JSON text.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, ZoneHubError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            let row: Option<(String,)> = sqlx::query_as(SELECT_BY_KEY)
                .bind(&key)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            let value = row
                .map(|(text,)| serde_json::from_str(&text))
                .transpose()
                .map_err(StorageError::from)?;
            Ok(value)
        }
    }

    fn set(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            sqlx::query(UPSERT)
                .bind(&key)
                .bind(value.to_string())
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            tracing::debug!(%key, "stored value");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteKeyValueStore {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteKeyValueStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_return_none_when_key_missing() {
        let store = setup().await;
        assert_eq!(store.get("random-color").await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_store_and_read_json_value() {
        let store = setup().await;
        let value = serde_json::json!({ "d1": 1_010_000 });
        store.set("random-color", value.clone()).await.unwrap();
        assert_eq!(store.get("random-color").await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn should_overwrite_existing_value() {
        let store = setup().await;
        store.set("k", serde_json::json!(1)).await.unwrap();
        store.set("k", serde_json::json!(2)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(serde_json::json!(2)));
    }

    #[tokio::test]
    async fn should_keep_keys_separate() {
        let store = setup().await;
        store.set("a", serde_json::json!("x")).await.unwrap();
        store.set("b", serde_json::json!("y")).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(serde_json::json!("x")));
    }
}
