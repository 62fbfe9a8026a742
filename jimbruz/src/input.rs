//! Line input fed from a dedicated reader thread.
//!
//! Blocking reads on stdin cannot be cancelled. Doing them on a plain std
//! thread (not a runtime blocking task) means dropping the tokio runtime
//! never waits for one; the thread ends at the next EOF, once the receiver
//! is gone, or with the process.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 16;

/// A stream of input lines, without their line endings.
#[derive(Debug)]
pub struct Lines {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl Lines {
    /// Start reading `reader` on its own thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        thread::Builder::new()
            .name("jimbruz-input".into())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
                debug!("Input reader finished");
            })?;
        Ok(Self { rx })
    }

    /// Lines from the process's standard input.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn stdin() -> io::Result<Self> {
        Self::spawn(io::BufReader::new(io::stdin()))
    }

    /// The next line, or `None` at end of input. Cancel safe.
    ///
    /// # Errors
    ///
    /// Returns the reader's I/O error.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.rx.recv().await.transpose()
    }
}
