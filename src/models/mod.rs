mod food_entry;
mod reading;

pub use food_entry::{coerce_amount, FoodEntry, NutritionTotals};
pub(crate) use food_entry::finite_or_zero;
pub use reading::{
    current_time, normalize_time, parse_level, BloodSugarReading, ReadingStatus,
};

use chrono::{Local, NaiveDate};

use crate::error::ValidationError;

/// Date format used for the `date` partition key
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate a `YYYY-MM-DD` date and return it in canonical form.
pub fn parse_date(input: &str) -> Result<String, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// Today's local date as a partition key
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}
