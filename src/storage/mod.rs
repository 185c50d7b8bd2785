//! Filesystem document store.
//!
//! The league keeps three collections as JSONL files under the data
//! directory:
//! - Calendar events (with official results)
//! - Predictions, one per (user, event, session)
//! - Users, including points, rank and rank history

pub mod jsonl;

pub use jsonl::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Event, Prediction, User};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unreadable record at {path:?} line {line}: {source}")]
    Corrupt {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn league_dir(&self) -> PathBuf {
        self.data_dir.join("league")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Read the calendar, sorted by round.
pub fn read_calendar(config: &StorageConfig, mode: ReadMode) -> Result<Vec<Event>, StorageError> {
    let mut events: Vec<Event> =
        JsonlReader::for_entity(config, EntityType::Event).read_with(mode)?;
    events.sort_by_key(|e| e.id);
    Ok(events)
}

/// Replace the calendar.
pub fn write_calendar(config: &StorageConfig, events: &[Event]) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::Event).write_all(events)
}

pub fn read_predictions(
    config: &StorageConfig,
    mode: ReadMode,
) -> Result<Vec<Prediction>, StorageError> {
    JsonlReader::for_entity(config, EntityType::Prediction).read_with(mode)
}

pub fn write_predictions(
    config: &StorageConfig,
    predictions: &[Prediction],
) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::Prediction).write_all(predictions)
}

/// Read users in stored order; the ranking tie-break depends on it.
pub fn read_users(config: &StorageConfig, mode: ReadMode) -> Result<Vec<User>, StorageError> {
    JsonlReader::for_entity(config, EntityType::User).read_with(mode)
}

pub fn write_users(config: &StorageConfig, users: &[User]) -> Result<usize, StorageError> {
    JsonlWriter::for_entity(config, EntityType::User).write_all(users)
}
