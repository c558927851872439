//! Glucon diary ledger
//!
//! Local storage for a diabetes diary: meals and blood-sugar readings,
//! partitioned by calendar day and kept in an embedded SQLite database.

pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;

pub use db::{init_db, FoodEntryRepository, ReadingRepository, StorageHandle};
pub use error::{StoreError, ValidationError};
pub use ledger::{DayAggregator, DayLedger, ReadingSummary};
pub use models::{BloodSugarReading, FoodEntry, NutritionTotals, ReadingStatus};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
