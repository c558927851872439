use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use uuid::Uuid;

use crate::error::ValidationError;

/// A meal logged on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub date: String,
}

impl FoodEntry {
    /// Create an entry with a fresh time-ordered id and zeroed nutrition values
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: name.into(),
            calories: 0.0,
            carbs: 0.0,
            protein: 0.0,
            fat: 0.0,
            date: date.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_calories(mut self, calories: f64) -> Self {
        self.calories = calories;
        self
    }

    pub fn with_carbs(mut self, carbs: f64) -> Self {
        self.carbs = carbs;
        self
    }

    pub fn with_protein(mut self, protein: f64) -> Self {
        self.protein = protein;
        self
    }

    pub fn with_fat(mut self, fat: f64) -> Self {
        self.fat = fat;
        self
    }

    /// Only the name is required; numbers are accepted as given.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }

    pub fn nutrition(&self) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories,
            carbs: self.carbs,
            protein: self.protein,
            fat: self.fat,
        }
    }
}

impl fmt::Display for FoodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.nutrition())
    }
}

/// Summed nutrition values for one or more entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.calories += rhs.calories;
        self.carbs += rhs.carbs;
        self.protein += rhs.protein;
        self.fat += rhs.fat;
    }
}

impl<'a> FromIterator<&'a FoodEntry> for NutritionTotals {
    fn from_iter<I: IntoIterator<Item = &'a FoodEntry>>(iter: I) -> Self {
        let mut totals = NutritionTotals::default();
        for entry in iter {
            totals += entry.nutrition();
        }
        totals
    }
}

/// Format: "Calories: 650 | Carbs: 80g | Protein: 25g | Fat: 28g"
impl fmt::Display for NutritionTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Calories: {:.0} | Carbs: {:.1}g | Protein: {:.1}g | Fat: {:.1}g",
            self.calories, self.carbs, self.protein, self.fat
        )
    }
}

/// Turn free-form numeric input into a stored amount.
///
/// Missing, unparseable and non-finite input all become 0. Negative numbers
/// pass through unchanged.
pub fn coerce_amount(input: Option<&str>) -> f64 {
    input
        .and_then(|s| s.trim().parse::<f64>().ok())
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
