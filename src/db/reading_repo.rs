use crate::db::StorageHandle;
use crate::error::StoreError;
use crate::models::BloodSugarReading;

pub struct ReadingRepository {
    storage: StorageHandle,
}

#[derive(sqlx::FromRow)]
struct ReadingRow {
    id: String,
    level: f64,
    time: String,
    notes: Option<String>,
    date: String,
}

impl From<ReadingRow> for BloodSugarReading {
    fn from(row: ReadingRow) -> Self {
        BloodSugarReading {
            id: row.id,
            level: row.level,
            time: row.time,
            notes: row.notes,
            date: row.date,
        }
    }
}

/// Empty notes are stored as NULL
fn notes_column(notes: &Option<String>) -> Option<&str> {
    notes.as_deref().filter(|n| !n.is_empty())
}

/// SQLite stores NaN as NULL, which the NOT NULL level column rejects
fn level_column(level: f64) -> f64 {
    if level.is_nan() {
        0.0
    } else {
        level
    }
}

impl ReadingRepository {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    /// Readings taken on `date`, earliest first.
    ///
    /// Times are compared as strings, so they must be stored zero-padded.
    /// Read failures are logged and yield an empty list.
    pub async fn list_by_date(&self, date: &str) -> Vec<BloodSugarReading> {
        match self.try_list_by_date(date).await {
            Ok(readings) => readings,
            Err(e) => {
                tracing::warn!("Failed to load blood sugar readings for {}: {}", date, e);
                Vec::new()
            }
        }
    }

    pub async fn try_list_by_date(
        &self,
        date: &str,
    ) -> Result<Vec<BloodSugarReading>, StoreError> {
        if date.is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.storage.open().await?;
        let rows: Vec<ReadingRow> =
            sqlx::query_as("SELECT * FROM blood_sugar WHERE date = ? ORDER BY time ASC")
                .bind(date)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(BloodSugarReading::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<BloodSugarReading>, StoreError> {
        let pool = self.storage.open().await?;
        let row: Option<ReadingRow> = sqlx::query_as("SELECT * FROM blood_sugar WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(BloodSugarReading::from))
    }

    /// Insert a reading as given. Callers validate level and time first.
    ///
    /// A NaN level is stored as 0.
    pub async fn create(&self, reading: &BloodSugarReading) -> Result<(), StoreError> {
        let pool = self.storage.open().await?;

        sqlx::query("INSERT INTO blood_sugar (id, level, time, notes, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&reading.id)
            .bind(level_column(reading.level))
            .bind(&reading.time)
            .bind(notes_column(&reading.notes))
            .bind(&reading.date)
            .execute(pool)
            .await
            .map_err(|e| StoreError::from_insert("blood_sugar", &reading.id, e))?;

        Ok(())
    }

    /// Replace level, time and notes. Returns `false` when no row has that id.
    pub async fn update(&self, reading: &BloodSugarReading) -> Result<bool, StoreError> {
        let pool = self.storage.open().await?;

        let result =
            sqlx::query("UPDATE blood_sugar SET level = ?, time = ?, notes = ? WHERE id = ?")
                .bind(level_column(reading.level))
                .bind(&reading.time)
                .bind(notes_column(&reading.notes))
                .bind(&reading.id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let pool = self.storage.open().await?;
        let result = sqlx::query("DELETE FROM blood_sugar WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
