//! JSONL match store.
//!
//! One `MatchRecord` per line. The file is the source of truth; every read
//! loads it whole, which gives each request a consistent snapshot.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::MatchRecord;

/// Counts from an upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// Reads and writes the match file.
#[derive(Debug, Clone)]
pub struct MatchStore {
    path: PathBuf,
}

impl MatchStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The store under a data directory.
    pub fn open(config: &StorageConfig) -> Self {
        Self::new(config.matches_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Read every record. A missing file is an empty store; lines that fail
    /// to parse are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<MatchRecord>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping line {} in {:?}: {}", i + 1, self.path, e),
            }
        }

        debug!("Read {} matches from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Replace the file contents. Records go to a sibling temp file that is
    /// then renamed over the store, so readers never see a partial file.
    pub fn write_all(&self, records: &[MatchRecord]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp = self.path.with_extension("jsonl.tmp");
        let mut writer = BufWriter::new(File::create(&tmp)?);
        for record in records {
            writeln!(writer, "{}", serde_json::to_string(record)?)?;
        }
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp, &self.path)?;

        info!("Wrote {} matches to {:?}", records.len(), self.path);
        Ok(records.len())
    }

    /// Insert new records and overwrite existing ones with the same id.
    /// Existing order is kept; new records are appended in input order.
    pub fn upsert(&self, records: &[MatchRecord]) -> Result<UpsertSummary, StorageError> {
        let mut all = self.read_all()?;
        let mut index: HashMap<String, usize> = all
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str().to_string(), i))
            .collect();

        let mut summary = UpsertSummary::default();
        for record in records {
            match index.get(record.id.as_str()) {
                Some(&i) => {
                    all[i] = record.clone();
                    summary.updated += 1;
                }
                None => {
                    index.insert(record.id.as_str().to_string(), all.len());
                    all.push(record.clone());
                    summary.inserted += 1;
                }
            }
        }

        self.write_all(&all)?;
        Ok(summary)
    }

    /// Remove every record.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.write_all(&[])?;
        Ok(())
    }
}
