//! High score persistence.
//!
//! The simulation only ever sees [`ScoreStore`]; failures stay in here and
//! degrade to "no high score yet" or a skipped save.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk layout. Keys the game does not know about are carried through saves.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    high_score: u32,
    #[serde(flatten)]
    other: BTreeMap<String, serde_json::Value>,
}

pub trait ScoreStore {
    fn high_score(&self) -> u32;
    fn set_high_score(&mut self, score: u32);
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access score file {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("score file {} is malformed: {source}", .path.display())]
    Malformed { path: PathBuf, source: serde_json::Error },
}

/// Key-value scores kept as a flat JSON object on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ScoreFile, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ScoreFile::default()),
            Err(source) => return Err(StoreError::Io { path: self.path.clone(), source }),
        };

        serde_json::from_str(&text)
            .map_err(|source| StoreError::Malformed { path: self.path.clone(), source })
    }

    fn save(&self, scores: &ScoreFile) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(scores)
            .map_err(|source| StoreError::Malformed { path: self.path.clone(), source })?;

        fs::write(&self.path, text).map_err(|source| StoreError::Io { path: self.path.clone(), source })
    }
}

impl ScoreStore for FileStore {
    fn high_score(&self) -> u32 {
        match self.load() {
            Ok(scores) => scores.high_score,
            Err(e) => {
                warn!("{}, starting without a high score", e);
                0
            }
        }
    }

    fn set_high_score(&mut self, score: u32) {
        // A broken file is replaced rather than blocking the save
        let mut scores = self.load().unwrap_or_else(|e| {
            warn!("{}, overwriting it", e);
            ScoreFile::default()
        });
        scores.high_score = score;

        match self.save(&scores) {
            Ok(()) => debug!("saved high score {} to {}", score, self.path.display()),
            Err(e) => warn!("high score not saved: {}", e),
        }
    }
}

/// In-memory store; clones share the same value.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStore {
    best: std::rc::Rc<std::cell::Cell<u32>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_score(score: u32) -> Self {
        let store = MemoryStore::default();
        store.best.set(score);
        store
    }
}

#[cfg(test)]
impl ScoreStore for MemoryStore {
    fn high_score(&self) -> u32 {
        self.best.get()
    }

    fn set_high_score(&mut self, score: u32) {
        self.best.set(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("scores.json"));
        assert_eq!(store.high_score(), 0);
    }

    #[test]
    fn saved_score_survives_a_new_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");

        let mut store = FileStore::new(&path);
        store.set_high_score(120);

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.high_score(), 120);
    }

    #[test]
    fn other_keys_are_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, r#"{"games_played": 7, "player": "ana", "high_score": 40}"#).unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.high_score(), 40);
        store.set_high_score(55);

        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["games_played"], 7);
        assert_eq!(saved["player"], "ana");
        assert_eq!(saved["high_score"], 55);
    }

    #[test]
    fn malformed_file_degrades_and_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();

        let mut store = FileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Malformed { .. })));
        assert_eq!(store.high_score(), 0);

        store.set_high_score(10);
        assert_eq!(store.high_score(), 10);
    }

    #[test]
    fn unwritable_path_does_not_panic() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("missing").join("scores.json"));
        store.set_high_score(99);
        assert_eq!(store.high_score(), 0);
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryStore::with_score(5);
        let mut writer = store.clone();
        writer.set_high_score(8);
        assert_eq!(store.high_score(), 8);
    }
}
