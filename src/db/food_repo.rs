use crate::db::StorageHandle;
use crate::error::StoreError;
use crate::models::{finite_or_zero, FoodEntry};

pub struct FoodEntryRepository {
    storage: StorageHandle,
}

#[derive(sqlx::FromRow)]
struct FoodRow {
    id: String,
    name: String,
    calories: Option<f64>,
    carbs: Option<f64>,
    protein: Option<f64>,
    fat: Option<f64>,
    date: Option<String>,
}

impl From<FoodRow> for FoodEntry {
    fn from(row: FoodRow) -> Self {
        FoodEntry {
            id: row.id,
            name: row.name,
            calories: row.calories.unwrap_or(0.0),
            carbs: row.carbs.unwrap_or(0.0),
            protein: row.protein.unwrap_or(0.0),
            fat: row.fat.unwrap_or(0.0),
            date: row.date.unwrap_or_default(),
        }
    }
}

impl FoodEntryRepository {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    /// Entries logged on `date`, ordered by name.
    ///
    /// Read failures are logged and yield an empty list; use
    /// [`try_list_by_date`](Self::try_list_by_date) to see them.
    pub async fn list_by_date(&self, date: &str) -> Vec<FoodEntry> {
        match self.try_list_by_date(date).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to load food entries for {}: {}", date, e);
                Vec::new()
            }
        }
    }

    pub async fn try_list_by_date(&self, date: &str) -> Result<Vec<FoodEntry>, StoreError> {
        if date.is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.storage.open().await?;
        let rows: Vec<FoodRow> =
            sqlx::query_as("SELECT * FROM foods WHERE date = ? ORDER BY name")
                .bind(date)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(FoodEntry::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<FoodEntry>, StoreError> {
        let pool = self.storage.open().await?;
        let row: Option<FoodRow> = sqlx::query_as("SELECT * FROM foods WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(FoodEntry::from))
    }

    /// Insert a new entry. Fails with `ConstraintViolation` if the id is taken.
    pub async fn create(&self, entry: &FoodEntry) -> Result<(), StoreError> {
        let pool = self.storage.open().await?;

        sqlx::query(
            r#"
            INSERT INTO foods (id, name, calories, carbs, protein, fat, date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.name)
        .bind(finite_or_zero(entry.calories))
        .bind(finite_or_zero(entry.carbs))
        .bind(finite_or_zero(entry.protein))
        .bind(finite_or_zero(entry.fat))
        .bind(&entry.date)
        .execute(pool)
        .await
        .map_err(|e| StoreError::from_insert("foods", &entry.id, e))?;

        Ok(())
    }

    /// Replace name and nutrition values. `id` and `date` are left as stored.
    ///
    /// Returns `false` when no row has that id.
    pub async fn update(&self, entry: &FoodEntry) -> Result<bool, StoreError> {
        let pool = self.storage.open().await?;

        let result = sqlx::query(
            r#"
            UPDATE foods
            SET name = ?, calories = ?, carbs = ?, protein = ?, fat = ?
            WHERE id = ?
            "#,
        )
        .bind(&entry.name)
        .bind(finite_or_zero(entry.calories))
        .bind(finite_or_zero(entry.carbs))
        .bind(finite_or_zero(entry.protein))
        .bind(finite_or_zero(entry.fat))
        .bind(&entry.id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let pool = self.storage.open().await?;
        let result = sqlx::query("DELETE FROM foods WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
