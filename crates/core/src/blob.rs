// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-collection JSON blob files.
//!
//! A blob holds an entire ordered collection as one JSON array. Writes go to
//! a temporary file in the same directory which is fsynced and then renamed
//! over the target, so readers observe either the old or the new collection
//! and never a partial write.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Reads a blob, returning an empty vec if the file doesn't exist or is empty.
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&content)
        .map_err(|e| Error::CorruptedData(format!("{}: {e}", path.display())))
}

/// Replaces the blob at `path` with `records`.
pub fn write<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer(&mut tmp, records)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
#[path = "blob_tests.rs"]
mod tests;
