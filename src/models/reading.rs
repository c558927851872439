use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ValidationError;

/// A blood-sugar measurement in mg/dL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodSugarReading {
    pub id: String,
    pub level: f64,
    pub time: String,
    pub notes: Option<String>,
    pub date: String,
}

impl BloodSugarReading {
    pub fn new(level: f64, time: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            level,
            time: time.into(),
            notes: None,
            date: date.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Blank notes are treated as no notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }

    pub fn status(&self) -> ReadingStatus {
        ReadingStatus::classify(self.level)
    }

    /// Checks a reading before it is saved: level must be a positive number
    /// and time must be a valid `HH:MM` clock time.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.level.is_finite() && self.level > 0.0) {
            return Err(ValidationError::InvalidLevel(self.level.to_string()));
        }
        normalize_time(&self.time)?;
        Ok(())
    }
}

impl fmt::Display for BloodSugarReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} mg/dL ({})", self.time, self.level, self.status())?;
        if let Some(notes) = &self.notes {
            write!(f, " - {}", notes)?;
        }
        Ok(())
    }
}

/// Band a blood-sugar level falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    Low,
    Normal,
    High,
    VeryHigh,
}

impl ReadingStatus {
    /// Below 70 is low, 70..=140 normal, up to 180 high, above that very high.
    pub fn classify(level: f64) -> Self {
        if level < 70.0 {
            ReadingStatus::Low
        } else if level <= 140.0 {
            ReadingStatus::Normal
        } else if level <= 180.0 {
            ReadingStatus::High
        } else {
            ReadingStatus::VeryHigh
        }
    }

    /// Badge colour used when rendering the status
    pub fn color(&self) -> &'static str {
        match self {
            ReadingStatus::Low => "#ff4444",
            ReadingStatus::Normal => "#00C851",
            ReadingStatus::High => "#ffbb33",
            ReadingStatus::VeryHigh => "#ff4444",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingStatus::Low => write!(f, "Low"),
            ReadingStatus::Normal => write!(f, "Normal"),
            ReadingStatus::High => write!(f, "High"),
            ReadingStatus::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Parse a level typed by the user. Must be a number greater than zero.
pub fn parse_level(input: &str) -> Result<f64, ValidationError> {
    match input.trim().parse::<f64>() {
        Ok(level) if level.is_finite() && level > 0.0 => Ok(level),
        _ => Err(ValidationError::InvalidLevel(input.to_string())),
    }
}

/// Normalize a clock time to zero-padded `HH:MM`.
///
/// Readings are ordered by comparing the stored strings, so `7:30` has to
/// become `07:30` before it is saved.
pub fn normalize_time(input: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidTime(input.to_string());

    let (hours, minutes) = input.trim().split_once(':').ok_or_else(invalid)?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(format!("{:02}:{:02}", hours, minutes))
}

/// Current local wall-clock time as `HH:MM`
pub fn current_time() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
