// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Layout of the client's state directory.
//!
//! ```text
//! <state_dir>/
//!   config.toml               client configuration
//!   pending_operations.json   durable queue
//!   queue.lock                single-writer lock
//!   last_sync.txt             time of the last completed flush (RFC 3339)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::sync::{FileQueueStore, QUEUE_KEY};

const CONFIG_FILE_NAME: &str = "config.toml";
const LAST_SYNC_FILE_NAME: &str = "last_sync.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StateDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn last_sync_path(&self) -> PathBuf {
        self.root.join(LAST_SYNC_FILE_NAME)
    }

    /// Open the durable queue, taking the single-writer lock.
    pub fn open_store(&self) -> Result<FileQueueStore> {
        Ok(FileQueueStore::open(&self.root, QUEUE_KEY)?)
    }

    /// Read the last sync marker. A missing or unparsable marker reads as `None`.
    pub fn read_last_sync(&self) -> Option<DateTime<Utc>> {
        let content = fs::read_to_string(self.last_sync_path()).ok()?;
        match DateTime::parse_from_rfc3339(content.trim()) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable last sync marker");
                None
            }
        }
    }

    pub fn write_last_sync(&self, ts: DateTime<Utc>) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.last_sync_path(), format!("{}\n", ts.to_rfc3339()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
