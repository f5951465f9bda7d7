//! Re-parse scheduling for `--watch`.
//!
//! File events arrive from `notify` on a channel. Edits are coalesced into a single
//! pending source. A parse is triggered only once no new source has arrived for the
//! quiet period, and never for a source equal to the one parsed last.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Holds at most one pending input and releases it after a quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
    delivered: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            delivered: None,
        }
    }

    /// Queues `input`, replacing any pending one. Returns false when it was dropped as a
    /// duplicate.
    pub fn submit(&mut self, input: T, now: Instant) -> bool {
        let duplicate = match &self.pending {
            Some((pending, _)) => *pending == input,
            None => self.delivered.as_ref() == Some(&input),
        };
        if duplicate {
            return false;
        }
        self.pending = Some((input, now));
        true
    }

    /// Time left until the pending input is due, `None` when nothing is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let (_, since) = self.pending.as_ref()?;
        Some(self.quiet.saturating_sub(now.saturating_duration_since(*since)))
    }

    /// Takes the pending input once it has been quiet for long enough.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, since) = self.pending.as_ref()?;
        if now.saturating_duration_since(*since) < self.quiet {
            return None;
        }
        let (input, _) = self.pending.take()?;
        self.delivered = Some(input.clone());
        Some(input)
    }
}

/// Watches one file through the platform's `notify` backend.
///
/// The parent directory is watched rather than the file, so editors that save by
/// replacing the file keep being seen.
pub struct FileWatcher {
    path: PathBuf,
    events: Receiver<notify::Result<Event>>,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path = std::fs::canonicalize(path)
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        let dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();

        let (tx, events) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })
        .context("Failed to create file watcher")?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        Ok(Self {
            path,
            events,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the watched file.
    pub fn read(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    /// Waits up to `timeout` for an event on the file and returns its new content.
    ///
    /// Events for other files, watcher errors and unreadable content yield `None`.
    /// Fails only when the watcher has stopped.
    pub fn next_change(&self, timeout: Duration) -> Result<Option<String>> {
        let event = match self.events.recv_timeout(timeout) {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => {
                log::warn!("File watcher error: {e}");
                return Ok(None);
            }
            Err(RecvTimeoutError::Timeout) => return Ok(None),
            Err(RecvTimeoutError::Disconnected) => anyhow::bail!("file watcher stopped"),
        };
        if !touches(&event, &self.path) {
            return Ok(None);
        }
        log::trace!("{:?} on {}", event.kind, self.path.display());

        match self.read() {
            Ok(source) => Ok(Some(source)),
            Err(e) => {
                log::warn!("Failed to read {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }
}

/// Whether `event` may have changed the content of `path`.
fn touches(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|changed| changed == path)
}
