//! Match history storage.
//!
//! Matches are kept as JSON Lines under the data directory, in
//! `normalized/matches.jsonl`.

pub mod jsonl;
pub mod repository;

pub use jsonl::MatchStore;
pub use repository::{
    DistinctField, FilterError, JsonlMatchRepository, MatchFilter, MatchPage, MatchRepository,
    MemoryMatchRepository, ResultClass, SortOrder,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
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

    pub fn normalized_dir(&self) -> PathBuf {
        self.data_dir.join("normalized")
    }

    pub fn matches_path(&self) -> PathBuf {
        self.normalized_dir().join("matches.jsonl")
    }
}
