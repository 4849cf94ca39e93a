use async_trait::async_trait;
use sqlx::{migrate::MigrateDatabase, query, query_scalar, Pool, Sqlite, SqlitePool};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to prepare the database: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("failed to encode saved words: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String-keyed slots holding opaque string values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the whole value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    async fn remove(&self, key: &str) -> StorageResult<()>;
}

pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn initialize(database_url: &str) -> StorageResult<Self> {
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            tracing::info!(database_url, "creating database");
            Sqlite::create_database(database_url).await?;
        }
        let pool = SqlitePool::connect(database_url).await?;
        Self::migrated(pool).await
    }

    /// A private database that lives as long as the returned value.
    #[cfg(test)]
    pub async fn in_memory() -> StorageResult<Self> {
        // every connection to :memory: opens a fresh database
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::migrated(pool).await
    }

    async fn migrated(pool: Pool<Sqlite>) -> StorageResult<Self> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for Storage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = query_scalar::<_, String>("SELECT value FROM key_value WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        query(
            "INSERT INTO key_value(key, value) VALUES(?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        query("DELETE FROM key_value WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;

    /// Store used by tests that don't care about SQLite.
    #[derive(Default)]
    pub struct MemoryStore {
        slots: Mutex<HashMap<String, String>>,
        reject_writes: bool,
    }

    impl MemoryStore {
        /// Reads work, every `set` and `remove` fails like a locked database.
        pub fn read_only(key: &str, value: &str) -> Self {
            let mut store = Self::with(key, value);
            store.reject_writes = true;
            store
        }

        fn check_writable(&self) -> StorageResult<()> {
            if self.reject_writes {
                Err(StorageError::Database(sqlx::Error::PoolTimedOut))
            } else {
                Ok(())
            }
        }

        pub fn with(key: &str, value: &str) -> Self {
            let store = Self::default();
            store
                .slots
                .lock()
                .unwrap()
                .insert(key.to_owned(), value.to_owned());
            store
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.slots.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.raw(key))
        }

        async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.check_writable()?;
            self.slots
                .lock()
                .unwrap()
                .insert(key.to_owned(), value.to_owned());
            Ok(())
        }

        async fn remove(&self, key: &str) -> StorageResult<()> {
            self.check_writable()?;
            self.slots.lock().unwrap().remove(key);
            Ok(())
        }
    }
}
