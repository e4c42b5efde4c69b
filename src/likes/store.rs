//! Durable set of liked product ids.
//!
//! The coordinator never reaches for ambient storage: it is handed a [`LikeStore`].
//! [`MemoryLikeStore`] keeps the set for the lifetime of the process,
//! [`FileLikeStore`] keeps it in a JSON file across runs.

use crate::model::ProductId;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

pub type LikedSet = BTreeSet<ProductId>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LikeStoreError {
    #[error("Like store I/O error: {0}")]
    Io(String),

    #[error("Like store is corrupt: {0}")]
    Corrupt(String),
}

/// Key-value view over the liked set.
pub trait LikeStore: Send + Sync {
    /// Current content of the set.
    fn load(&self) -> Result<LikedSet, LikeStoreError>;

    /// Replaces the whole set.
    fn save(&self, liked: &LikedSet) -> Result<(), LikeStoreError>;

    fn get(&self, id: &ProductId) -> Result<bool, LikeStoreError> {
        Ok(self.load()?.contains(id))
    }

    fn set(&self, id: &ProductId, liked: bool) -> Result<(), LikeStoreError> {
        let mut set = self.load()?;
        if liked {
            set.insert(id.clone());
        } else {
            set.remove(id);
        }
        self.save(&set)
    }

    /// Restores a snapshot taken with [`load`](LikeStore::load).
    fn rollback(&self, snapshot: &LikedSet) -> Result<(), LikeStoreError> {
        debug!(size = snapshot.len(), "Rolling back liked set");
        self.save(snapshot)
    }
}

#[derive(Debug, Default)]
pub struct MemoryLikeStore {
    liked: Mutex<LikedSet>,
}

impl MemoryLikeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(liked: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            liked: Mutex::new(liked.into_iter().collect()),
        }
    }
}

impl LikeStore for MemoryLikeStore {
    fn load(&self) -> Result<LikedSet, LikeStoreError> {
        Ok(self.liked.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, liked: &LikedSet) -> Result<(), LikeStoreError> {
        *self.liked.lock().unwrap_or_else(|e| e.into_inner()) = liked.clone();
        Ok(())
    }
}

/// Liked set stored as a JSON array of ids. A missing file is an empty set.
#[derive(Debug, Clone)]
pub struct FileLikeStore {
    path: PathBuf,
}

impl FileLikeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the set is written to before being renamed over `path`.
    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl LikeStore for FileLikeStore {
    fn load(&self) -> Result<LikedSet, LikeStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LikedSet::new()),
            Err(e) => return Err(LikeStoreError::Io(e.to_string())),
        };
        serde_json::from_str(&content).map_err(|e| LikeStoreError::Corrupt(e.to_string()))
    }

    fn save(&self, liked: &LikedSet) -> Result<(), LikeStoreError> {
        let json = serde_json::to_string(liked).map_err(|e| LikeStoreError::Io(e.to_string()))?;
        // Write then rename, so a crash never leaves a half-written set behind.
        let tmp = self.staging_path();
        fs::write(&tmp, json).map_err(|e| LikeStoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| LikeStoreError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_and_rollback() {
        let store = MemoryLikeStore::new();
        let snapshot = store.load().unwrap();

        store.set(&ProductId::from("p1"), true).unwrap();
        assert!(store.get(&ProductId::from("p1")).unwrap());

        store.rollback(&snapshot).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("likes.json");

        let store = FileLikeStore::new(&path);
        assert!(store.load().unwrap().is_empty());
        store.set(&ProductId::from("p1"), true).unwrap();
        store.set(&ProductId::from("p2"), true).unwrap();
        store.set(&ProductId::from("p1"), false).unwrap();

        let reopened = FileLikeStore::new(&path);
        let liked = reopened.load().unwrap();
        assert_eq!(liked.into_iter().collect::<Vec<_>>(), vec![ProductId::from("p2")]);
    }

    #[test]
    fn file_store_stages_beside_tmp_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("likes.tmp");
        let store = FileLikeStore::new(&path);
        assert_eq!(store.staging_path(), dir.path().join("likes.tmp.tmp"));

        store.set(&ProductId::from("p1"), true).unwrap();

        assert!(FileLikeStore::new(&path).get(&ProductId::from("p1")).unwrap());
        assert!(!store.staging_path().exists());
    }

    #[test]
    fn file_store_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("likes.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileLikeStore::new(&path).load().unwrap_err();
        assert!(matches!(err, LikeStoreError::Corrupt(_)));
    }
}
