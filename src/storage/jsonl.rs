//! JSONL (JSON Lines) storage.
//!
//! Each collection is one file, each line one JSON document. Writers replace
//! the whole file through a temporary sibling and a rename, so a failed
//! write leaves the previous contents in place.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};

/// Collections kept by the league.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Event,
    Prediction,
    User,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Event => "events.jsonl",
            EntityType::Prediction => "predictions.jsonl",
            EntityType::User => "users.jsonl",
        }
    }
}

/// Get the path of a collection file.
pub fn entity_path(config: &StorageConfig, entity: EntityType) -> PathBuf {
    config.league_dir().join(entity.filename())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write entities, replacing the entire file.
    ///
    /// Serialization happens before the target is touched; the target is
    /// swapped in with a rename once every line is flushed.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        let mut lines = Vec::with_capacity(entities.len());
        for entity in entities {
            lines.push(serde_json::to_string(entity)?);
        }

        self.ensure_dir()?;
        let staging = self.staging_path();
        {
            let file = File::create(&staging)?;
            let mut writer = BufWriter::new(file);
            for line in &lines {
                writeln!(writer, "{}", line)?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&staging, &self.path)?;

        info!("Wrote {} entities to {:?}", lines.len(), self.path);
        Ok(lines.len())
    }
}

/// How a reader treats lines that fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Skip bad lines with a warning.
    #[default]
    Lenient,
    /// Fail on the first bad line. Use before rewriting the collection,
    /// otherwise the skipped lines would be dropped from the store.
    Strict,
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    /// Read all entities from the file, skipping lines that fail to parse.
    ///
    /// A missing file is an empty collection.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        self.read_with(ReadMode::Lenient)
    }

    /// Read all entities, failing with [`StorageError::Corrupt`] on a bad line.
    pub fn read_all_strict(&self) -> Result<Vec<T>, StorageError> {
        self.read_with(ReadMode::Strict)
    }

    pub fn read_with(&self, mode: ReadMode) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(source) if mode == ReadMode::Strict => {
                    return Err(StorageError::Corrupt {
                        path: self.path.clone(),
                        line: index + 1,
                        source,
                    });
                }
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }

    /// Read entities matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }
}
