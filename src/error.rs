//! Error types for the diary ledger.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot open database '{}': {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to create database schema: {0}")]
    Schema(#[from] sqlx::migrate::MigrateError),

    #[error("A {table} record with id '{id}' already exists")]
    ConstraintViolation { table: &'static str, id: String },

    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a failed INSERT, turning primary key clashes into
    /// `ConstraintViolation`.
    pub(crate) fn from_insert(table: &'static str, id: &str, err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::ConstraintViolation {
                    table,
                    id: id.to_string(),
                }
            }
            _ => StoreError::Query(err),
        }
    }
}

/// Input rejected before it reaches the store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter a food name")]
    EmptyName,

    #[error("Invalid blood sugar level '{0}': must be a number greater than 0")]
    InvalidLevel(String),

    #[error("Invalid time '{0}'. Use HH:MM.")]
    InvalidTime(String),

    #[error("Invalid date format '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),
}
