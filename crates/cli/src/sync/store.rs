// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable queue store.
//!
//! Persists the full ordered list of pending operations as a single blob
//! under a fixed key. There is no per-item addressing: every save rewrites
//! the whole collection and every load reads it back whole.

use std::fs::{File, OpenOptions};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fs2::FileExt;
use tq_core::{blob, PendingOperation};

/// Key the queue blob is stored under.
pub const QUEUE_KEY: &str = "pending_operations";

const LOCK_FILE_NAME: &str = "queue.lock";

/// Error type for queue persistence.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Reading or writing the blob failed.
    #[error("storage error: {0}")]
    Storage(#[from] tq_core::Error),

    /// The blocking storage task did not complete.
    #[error("storage task failed: {0}")]
    Task(String),

    /// Another writer holds the queue.
    #[error("queue is locked by another process: {0}")]
    Locked(PathBuf),

    /// The store refused the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for queue persistence.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage for the ordered queue of pending operations.
///
/// This trait abstracts over the backing medium, allowing for easy testing
/// with in-memory implementations.
pub trait QueueStore: Send + Sync {
    /// Load the whole queue.
    ///
    /// Fails soft: an unreadable or corrupt blob yields an empty queue so a
    /// damaged store never blocks startup.
    fn load(&self) -> Pin<Box<dyn Future<Output = Vec<PendingOperation>> + Send + '_>>;

    /// Replace the whole queue.
    ///
    /// Callers observe either the previous or the new collection, never a
    /// partial write.
    fn save<'a>(
        &'a self,
        ops: &'a [PendingOperation],
    ) -> Pin<Box<dyn Future<Output = PersistenceResult<()>> + Send + 'a>>;
}

/// File-backed queue store: one key maps to one JSON file in a state directory.
///
/// Holds an exclusive advisory lock on the directory's lock file for its
/// whole lifetime, so only one process writes the queue at a time.
pub struct FileQueueStore {
    /// Path to the queue blob.
    path: PathBuf,
    /// Held for the lifetime of the store.
    _lock: File,
}

impl FileQueueStore {
    /// Open the store for `key` inside `dir`, creating the directory if needed.
    pub fn open(dir: &Path, key: &str) -> PersistenceResult<Self> {
        std::fs::create_dir_all(dir).map_err(tq_core::Error::from)?;

        let lock_path = dir.join(LOCK_FILE_NAME);
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(tq_core::Error::from)?;
        lock.try_lock_exclusive()
            .map_err(|_| PersistenceError::Locked(lock_path.clone()))?;

        Ok(FileQueueStore {
            path: dir.join(format!("{key}.json")),
            _lock: lock,
        })
    }

    /// Path of the queue blob.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QueueStore for FileQueueStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = Vec<PendingOperation>> + Send + '_>> {
        let path = self.path.clone();
        Box::pin(async move {
            let result = tokio::task::spawn_blocking(move || blob::read(&path)).await;
            match result {
                Ok(Ok(ops)) => ops,
                Ok(Err(e)) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "discarding unreadable queue");
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!(error = %e, "queue load task failed");
                    Vec::new()
                }
            }
        })
    }

    fn save<'a>(
        &'a self,
        ops: &'a [PendingOperation],
    ) -> Pin<Box<dyn Future<Output = PersistenceResult<()>> + Send + 'a>> {
        let path = self.path.clone();
        let ops = ops.to_vec();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || blob::write(&path, &ops))
                .await
                .map_err(|e| PersistenceError::Task(e.to_string()))??;
            Ok(())
        })
    }
}

/// In-memory queue store.
///
/// Keeps the serialized blob rather than the values so loads go through the
/// same decode path as the file store. Clones share the same blob.
#[derive(Clone, Default)]
pub struct MemoryQueueStore {
    blob: Arc<Mutex<Option<String>>>,
    fail_saves: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Overwrite the raw blob, bypassing serialization.
    pub fn set_raw(&self, raw: impl Into<String>) {
        *self.blob.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw.into());
    }

    /// The raw blob as last written.
    pub fn raw(&self) -> Option<String> {
        self.blob.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Decode the current blob synchronously.
    pub fn snapshot(&self) -> Vec<PendingOperation> {
        self.raw()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }
}

impl QueueStore for MemoryQueueStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = Vec<PendingOperation>> + Send + '_>> {
        Box::pin(async move {
            let Some(raw) = self.raw() else {
                return Vec::new();
            };
            match serde_json::from_str(&raw) {
                Ok(ops) => ops,
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable queue");
                    Vec::new()
                }
            }
        })
    }

    fn save<'a>(
        &'a self,
        ops: &'a [PendingOperation],
    ) -> Pin<Box<dyn Future<Output = PersistenceResult<()>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(PersistenceError::Unavailable("writes disabled".into()));
            }
            let raw = serde_json::to_string(ops).map_err(tq_core::Error::from)?;
            self.set_raw(raw);
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}
