//! Append-only result store.
//!
//! The result file doubles as the resumption ledger: a vector whose
//! completion marker is present is skipped on the next run. Writes are
//! flushed to disk before the next vector begins, so an interrupted run
//! loses at most the vector that was in flight. A partially written
//! record without its marker counts as not complete.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;

/// Marker line recorded when a vector's response matched expectations.
pub fn completion_marker(test_id: &str) -> String {
    format!("TEST VECTOR {test_id} OK")
}

/// Marker line recorded when a vector's response did not match. Never
/// consulted for resumption.
pub fn failure_marker(test_id: &str) -> String {
    format!("TEST VECTOR {test_id} NOK")
}

/// Append-only writer and resumption scanner for one result file.
pub struct ResultStore {
    path: PathBuf,
    file: File,
}

impl ResultStore {
    /// Open the store, creating the file if it does not exist. Existing
    /// content is preserved; all writes append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a completion marker for exactly this test ID exists.
    ///
    /// Reads the file fresh on every call so markers written by this
    /// process are visible immediately.
    pub fn is_complete(&self, test_id: &str) -> Result<bool, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let marker = completion_marker(test_id);
        for line in BufReader::new(file).lines() {
            if line?.trim() == marker {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Append one line, flush-durable before returning.
    pub fn append_line(&mut self, line: &str) -> Result<(), StoreError> {
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.sync_data()?;
        debug!(line, "result line recorded");
        Ok(())
    }

    /// Append a pre-rendered multi-line block, flush-durable before
    /// returning.
    pub fn append_block(&mut self, block: &str) -> Result<(), StoreError> {
        self.file.write_all(block.as_bytes())?;
        self.file.sync_data()?;
        Ok(())
    }
}
