//! Per-day view over both stores.

use serde::Serialize;

use crate::db::{FoodEntryRepository, ReadingRepository, StorageHandle};
use crate::models::{BloodSugarReading, FoodEntry, NutritionTotals};

/// Everything logged on one day
#[derive(Debug, Clone, Serialize)]
pub struct DayLedger {
    pub date: String,
    pub foods: Vec<FoodEntry>,
    pub readings: Vec<BloodSugarReading>,
}

/// Count, range and mean of a day's readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadingSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl DayLedger {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            foods: Vec::new(),
            readings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty() && self.readings.is_empty()
    }

    pub fn nutrition_totals(&self) -> NutritionTotals {
        self.foods.iter().collect()
    }

    /// `None` when nothing was measured that day
    pub fn reading_summary(&self) -> Option<ReadingSummary> {
        if self.readings.is_empty() {
            return None;
        }

        let levels = self.readings.iter().map(|r| r.level);
        let min = levels.clone().fold(f64::INFINITY, f64::min);
        let max = levels.clone().fold(f64::NEG_INFINITY, f64::max);
        let average = levels.sum::<f64>() / self.readings.len() as f64;

        Some(ReadingSummary {
            count: self.readings.len(),
            min,
            max,
            average,
        })
    }
}

/// Loads the ledger for whichever date is currently selected.
///
/// Holds no data of its own; every [`load`](Self::load) goes back to the
/// stores.
pub struct DayAggregator {
    foods: FoodEntryRepository,
    readings: ReadingRepository,
    selected: Option<String>,
}

impl DayAggregator {
    pub fn new(storage: &StorageHandle) -> Self {
        Self {
            foods: FoodEntryRepository::new(storage.clone()),
            readings: ReadingRepository::new(storage.clone()),
            selected: None,
        }
    }

    pub fn select(&mut self, date: impl Into<String>) {
        self.selected = Some(date.into());
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn foods(&self) -> &FoodEntryRepository {
        &self.foods
    }

    pub fn readings(&self) -> &ReadingRepository {
        &self.readings
    }

    /// Fetch both collections for the selected date. Returns `None` until a
    /// date is selected. Read failures show up as empty collections.
    pub async fn load(&self) -> Option<DayLedger> {
        let date = self.selected.as_deref()?;

        let foods = self.foods.list_by_date(date).await;
        let readings = self.readings.list_by_date(date).await;

        Some(DayLedger {
            date: date.to_string(),
            foods,
            readings,
        })
    }

    /// Select `date` and load its ledger in one step.
    pub async fn load_date(&mut self, date: impl Into<String>) -> DayLedger {
        let date = date.into();
        let foods = self.foods.list_by_date(&date).await;
        let readings = self.readings.list_by_date(&date).await;
        self.selected = Some(date.clone());

        DayLedger {
            date,
            foods,
            readings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    async fn setup() -> (DayAggregator, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = init_db(temp_dir.path().join("test.db")).await.unwrap();
        (DayAggregator::new(&storage), temp_dir)
    }

    #[tokio::test]
    async fn test_load_without_selection() {
        let (aggregator, _dir) = setup().await;
        assert!(aggregator.selected().is_none());
        assert!(aggregator.load().await.is_none());
    }

    #[tokio::test]
    async fn test_load_combines_both_stores() {
        let (mut aggregator, _dir) = setup().await;
        let day = "2025-01-15";

        aggregator
            .foods()
            .create(&FoodEntry::new("Rice", day).with_calories(200.0).with_carbs(45.0))
            .await
            .unwrap();
        aggregator
            .foods()
            .create(&FoodEntry::new("Chicken", day).with_calories(250.0).with_protein(30.0))
            .await
            .unwrap();
        aggregator
            .foods()
            .create(&FoodEntry::new("Cake", "2025-01-16").with_calories(400.0))
            .await
            .unwrap();
        aggregator
            .readings()
            .create(&BloodSugarReading::new(150.0, "13:00", day))
            .await
            .unwrap();
        aggregator
            .readings()
            .create(&BloodSugarReading::new(90.0, "07:00", day))
            .await
            .unwrap();

        aggregator.select(day);
        let ledger = aggregator.load().await.unwrap();

        assert_eq!(ledger.date, day);
        let names: Vec<&str> = ledger.foods.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Chicken", "Rice"]);
        let times: Vec<&str> = ledger.readings.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, vec!["07:00", "13:00"]);

        let totals = ledger.nutrition_totals();
        assert_eq!(totals.calories, 450.0);
        assert_eq!(totals.carbs, 45.0);
        assert_eq!(totals.protein, 30.0);

        let summary = ledger.reading_summary().unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.min, 90.0);
        assert_eq!(summary.max, 150.0);
        assert_eq!(summary.average, 120.0);
    }

    #[tokio::test]
    async fn test_changing_selection_reloads() {
        let (mut aggregator, _dir) = setup().await;
        aggregator
            .readings()
            .create(&BloodSugarReading::new(100.0, "08:00", "2025-01-15"))
            .await
            .unwrap();

        aggregator.select("2025-01-15");
        assert_eq!(aggregator.load().await.unwrap().readings.len(), 1);

        aggregator.select("2025-01-16");
        let ledger = aggregator.load().await.unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.reading_summary().is_none());
    }

    #[tokio::test]
    async fn test_load_date_selects_and_loads() {
        let (mut aggregator, _dir) = setup().await;
        aggregator
            .foods()
            .create(&FoodEntry::new("Apple", "2025-01-15").with_calories(95.0))
            .await
            .unwrap();

        let ledger = aggregator.load_date("2025-01-15").await;
        assert_eq!(ledger.date, "2025-01-15");
        assert_eq!(ledger.foods.len(), 1);
        assert_eq!(aggregator.selected(), Some("2025-01-15"));

        let reloaded = aggregator.load().await.unwrap();
        assert_eq!(reloaded.foods, ledger.foods);
    }

    #[test]
    fn test_empty_ledger_totals() {
        let ledger = DayLedger::empty("2025-01-15");
        assert!(ledger.is_empty());
        assert_eq!(ledger.nutrition_totals(), NutritionTotals::default());
    }
}
