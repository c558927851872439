mod food_repo;
mod reading_repo;

pub use food_repo::FoodEntryRepository;
pub use reading_repo::ReadingRepository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::StoreError;

/// File name used when the database lives in a data directory
pub const DATABASE_FILE: &str = "diary.db";

/// Shared handle to the diary database.
///
/// The connection is opened on first use and reused afterwards. Cloning the
/// handle shares the same connection, so construct it once and hand clones
/// to each repository.
#[derive(Clone, Debug)]
pub struct StorageHandle {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    pool: OnceCell<SqlitePool>,
}

impl StorageHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                pool: OnceCell::new(),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn is_open(&self) -> bool {
        self.inner.pool.get().is_some_and(|pool| !pool.is_closed())
    }

    /// Open the database, creating the file if missing. Later calls return
    /// the already-open pool.
    ///
    /// Fails with `StorageUnavailable` once the handle has been closed.
    pub async fn open(&self) -> Result<&SqlitePool, StoreError> {
        let pool = self
            .inner
            .pool
            .get_or_try_init(|| connect(&self.inner.path))
            .await?;

        if pool.is_closed() {
            return Err(StoreError::StorageUnavailable {
                path: self.inner.path.clone(),
                source: Box::new(sqlx::Error::PoolClosed),
            });
        }
        Ok(pool)
    }

    /// Create the `foods` and `blood_sugar` tables if they don't exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let pool = self.open().await?;
        sqlx::migrate!("./migrations").run(pool).await?;
        tracing::debug!("Schema ready in {}", self.path().display());
        Ok(())
    }

    /// Close the connection for every clone of this handle. The handle is
    /// not reopened afterwards; call this when the process is done with the
    /// database.
    pub async fn close(&self) {
        if let Some(pool) = self.inner.pool.get() {
            pool.close().await;
        }
    }
}

async fn connect(path: &Path) -> Result<SqlitePool, StoreError> {
    let unavailable = |source: Box<dyn std::error::Error + Send + Sync>| {
        StoreError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        }
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| unavailable(Box::new(e)))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    // One connection: statements from every caller run one at a time.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| unavailable(Box::new(e)))?;

    tracing::debug!("Opened database {}", path.display());
    Ok(pool)
}

/// Open the database at `path` and make sure the schema exists.
pub async fn init_db(path: impl Into<PathBuf>) -> Result<StorageHandle, StoreError> {
    let storage = StorageHandle::new(path);
    storage.ensure_schema().await?;
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_db_creates_tables() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let storage = init_db(&db_path).await.unwrap();
        let pool = storage.open().await.unwrap();

        // Verify tables exist
        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["blood_sugar", "foods"]);
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_open_is_lazy_and_idempotent() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("diary.db");

        let storage = StorageHandle::new(&db_path);
        assert!(!storage.is_open());
        assert!(!db_path.exists());

        let shared = storage.clone();
        let first = storage.open().await.unwrap();
        let second = shared.open().await.unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(storage.is_open());
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_repeatable() {
        let temp_dir = tempdir().unwrap();
        let storage = StorageHandle::new(temp_dir.path().join("test.db"));

        storage.ensure_schema().await.unwrap();
        storage.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_schema_on_existing_tables() {
        let temp_dir = tempdir().unwrap();
        let storage = StorageHandle::new(temp_dir.path().join("test.db"));
        let pool = storage.open().await.unwrap();

        // A database created before migrations were tracked
        sqlx::query("CREATE TABLE foods (id TEXT PRIMARY KEY NOT NULL, name TEXT NOT NULL, calories REAL, carbs REAL, protein REAL, fat REAL, date TEXT)")
            .execute(pool)
            .await
            .unwrap();

        storage.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_after_close_fails() {
        let temp_dir = tempdir().unwrap();
        let storage = init_db(temp_dir.path().join("test.db")).await.unwrap();
        let shared = storage.clone();
        assert!(shared.is_open());

        storage.close().await;

        assert!(!shared.is_open());
        let err = shared.open().await.unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_conflicting_table_is_schema_error() {
        let temp_dir = tempdir().unwrap();
        let storage = StorageHandle::new(temp_dir.path().join("test.db"));
        let pool = storage.open().await.unwrap();

        // Existing foods table without a date column
        sqlx::query("CREATE TABLE foods (id TEXT)")
            .execute(pool)
            .await
            .unwrap();

        let err = storage.ensure_schema().await.unwrap_err();
        assert!(matches!(err, StoreError::Schema(_)));
        assert!(err.to_string().contains("Failed to create database schema"));
    }

    #[tokio::test]
    async fn test_open_fails_when_directory_is_a_file() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let storage = StorageHandle::new(blocker.join("diary.db"));
        let err = storage.open().await.unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
        assert!(!storage.is_open());

        let err = storage.ensure_schema().await.unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
    }
}
