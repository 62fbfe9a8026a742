//! Memory log — what Jimbruz remembers about you.
//!
//! The backing file is a pretty-printed JSON array:
//!
//! ```json
//! [
//!   { "time": 1718000000.123, "note": "Accepted food. Energy->7.0, Trust->2.0" }
//! ]
//! ```
//!
//! Every append re-reads the whole array, pushes one entry and rewrites the
//! file. The rewrite goes to a sibling `.tmp` file first and is renamed over
//! the original, so a concurrent reader sees either the old array or the new
//! one, never half of one. Writers are serialized by ownership: every
//! mutation takes `&mut self`.
//!
//! A missing or unparsable file reads as an empty history. Corruption is
//! logged, not surfaced.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{JimbruzError, Result};

/// One remembered interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Seconds since the Unix epoch, fractional.
    pub time: f64,
    /// Free-text summary of what happened.
    pub note: String,
}

impl MemoryEntry {
    /// Create an entry stamped with the current time.
    #[must_use]
    pub fn now(note: impl Into<String>) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let time = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        Self {
            time,
            note: note.into(),
        }
    }

    /// The timestamp in the local time zone, if it is representable.
    #[must_use]
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        #[allow(clippy::cast_possible_truncation)]
        let millis = (self.time * 1000.0).round() as i64;
        Local.timestamp_millis_opt(millis).single()
    }
}

/// Handle to the JSON memory file.
#[derive(Debug)]
pub struct MemoryLog {
    path: PathBuf,
}

impl MemoryLog {
    /// Open the memory log at `path`, creating its parent directory.
    ///
    /// The file itself is created lazily on the first append.
    ///
    /// # Errors
    ///
    /// Returns [`JimbruzError::Io`] if the parent directory cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "Memory log opened");
        Ok(Self { path })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. Missing or corrupt files read as empty; malformed
    /// entries inside a valid array are skipped.
    #[must_use]
    pub fn load(&self) -> Vec<MemoryEntry> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read memory file");
                return Vec::new();
            }
        };

        let raw: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Memory file is not a JSON array, treating as empty"
                );
                return Vec::new();
            }
        };

        raw.into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(path = %self.path.display(), index, error = %e, "Skipping malformed memory entry");
                    None
                }
            })
            .collect()
    }

    /// The last `n` entries, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<MemoryEntry> {
        let mut entries = self.load();
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
        entries
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.load().len()
    }

    /// Whether nothing has been remembered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a note stamped with the current time and rewrite the file.
    ///
    /// # Errors
    ///
    /// Returns [`JimbruzError::Serialization`] if encoding fails, or
    /// [`JimbruzError::Io`] if the file cannot be written.
    pub fn append(&mut self, note: impl Into<String>) -> Result<MemoryEntry> {
        let start = Instant::now();

        let mut entries = self.load();
        let entry = MemoryEntry::now(note);
        entries.push(entry.clone());

        let json = serde_json::to_vec_pretty(&entries)
            .map_err(|e| JimbruzError::Serialization(e.to_string()))?;

        let tmp = self.tmp_path();
        fs::write(&tmp, &json)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(
            entries = entries.len(),
            bytes = json.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Appended memory"
        );

        Ok(entry)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("memories.json"), OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
