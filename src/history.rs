// =============================================================================
// history.rs - THE QUERY LEDGER
// =============================================================================
//
// Every query and whatever the court said back, appended as one JSON line.
// Pub/sub is fire-and-forget; this is not. When someone asks "what did the
// court actually send us last Tuesday", the raw body is sitting right here.
//
// The fetcher knows nothing about this file. The caller decides what to keep.
// =============================================================================

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{CaseQuery, FetchOutcome, ParsedCaseRecord};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to serialize history entry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no history entry with id {0}")]
    NotFound(Uuid),
}

/// One logged query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub query: CaseQuery,
    /// `FetchOutcome::kind()` at the time of the query.
    pub outcome: String,
    pub message: Option<String>,
    pub raw_body: Option<String>,
    pub record: Option<ParsedCaseRecord>,
}

impl HistoryEntry {
    pub fn new(query: &CaseQuery, outcome: &FetchOutcome) -> Self {
        let message = match outcome {
            FetchOutcome::NetworkFailure { message } => Some(message.clone()),
            _ => None,
        };

        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            query: query.clone(),
            outcome: outcome.kind().to_string(),
            message,
            raw_body: outcome.raw_body().map(str::to_string),
            record: outcome.record().cloned(),
        }
    }
}

/// Append-only JSON-lines store.
pub struct QueryHistory {
    path: PathBuf,
}

impl QueryHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Log a query and its outcome.
    pub fn record(
        &self,
        query: &CaseQuery,
        outcome: &FetchOutcome,
    ) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry::new(query, outcome);
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_error(e))?;

        debug!(id = %entry.id, outcome = %entry.outcome, "Query recorded in history");
        Ok(entry)
    }

    /// Every entry in insertion order. A missing file is an empty history.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    line = index + 1,
                    error = %e,
                    "Skipping malformed history line"
                ),
            }
        }

        Ok(entries)
    }

    pub fn find(&self, id: Uuid) -> Result<HistoryEntry, HistoryError> {
        self.entries()?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or(HistoryError::NotFound(id))
    }
}
