//! Session log — a plain-text trail of events, one line each.
//!
//! Lines look like `[2024-06-10 14:03:22] feed-refuse`. The file is only
//! ever appended to; nothing in Jimbruz reads it back.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::warn;

use crate::error::Result;

/// Timestamp format used at the start of every line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only event log.
#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Open the session log at `path`, creating its parent directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the parent directory cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event line. Failures are logged and dropped.
    pub fn record(&self, event: &str) {
        if let Err(e) = self.try_record(event) {
            warn!(path = %self.path.display(), error = %e, event, "Could not write session log");
        }
    }

    fn try_record(&self, event: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(file, "[{stamp}] {event}")
    }
}
