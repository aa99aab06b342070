//! Synchronous tail engine: applies resolution results and runs poll ticks.
//!
//! Every observable follows compare-before-notify: a [`ChangeEvent`] is only
//! produced when the new value differs from the stored one, so repeated
//! ticks over an unchanged file produce nothing.

use std::path::Path;
use std::time::SystemTime;

use crate::event::{ChangeEvent, replace_if_changed};
use crate::resolver::{self, ResolvedLogLocation};
use crate::snapshot;
use crate::state::TailState;

/// Tracks one game log and turns file changes into [`ChangeEvent`]s.
#[derive(Debug, Default)]
pub struct LogReader {
    tail: TailState,
    exists: bool,
}

impl LogReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_file_path(&self) -> Option<&Path> {
        self.tail.file_path()
    }

    pub fn log_file_exists(&self) -> bool {
        self.exists
    }

    /// Modification time of the log as `HH:MM:SS`, empty before the first tick.
    pub fn last_update(&self) -> &str {
        self.tail.last_modified_label()
    }

    pub fn last_log_line(&self) -> &str {
        self.tail.last_line()
    }

    pub fn byte_offset(&self) -> u64 {
        self.tail.byte_offset()
    }

    /// Whether a tick has something to work with.
    pub fn can_monitor(&self) -> bool {
        self.exists && self.tail.file_path().is_some()
    }

    /// Resolves `root` and applies the result.
    pub fn find_log_file(&mut self, root: &Path) -> Vec<ChangeEvent> {
        let location = resolver::resolve(root);
        self.apply_location(&location)
    }

    /// Applies a resolution result.
    ///
    /// Re-applying the path already tracked is a no-op and keeps the offset.
    /// When nothing was found the previous path is kept but marked missing.
    pub fn apply_location(&mut self, location: &ResolvedLogLocation) -> Vec<ChangeEvent> {
        let mut events = Vec::new();

        match location.resolved_path.as_deref() {
            Some(path) if location.exists => {
                if self.tail.set_path(path) {
                    tracing::info!(path = %path.display(), "tracking game log");
                    events.push(ChangeEvent::PathChanged(path.to_path_buf()));
                }
                self.set_exists(true, &mut events);
            }
            _ => self.set_exists(false, &mut events),
        }

        events
    }

    /// Runs one poll cycle against the tracked file.
    ///
    /// Never fails: I/O problems end the tick early and the next tick
    /// retries from the same offset.
    pub fn tick(&mut self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();

        let Some(path) = self.tail.file_path().map(Path::to_path_buf) else {
            return events;
        };

        let metadata = match std::fs::metadata(&path) {
            Ok(m) if m.is_file() => m,
            _ => {
                self.set_exists(false, &mut events);
                return events;
            }
        };
        self.set_exists(true, &mut events);

        if let Ok(modified) = metadata.modified() {
            let label = format_timestamp(modified);
            if self.tail.set_last_modified(label.clone()) {
                events.push(ChangeEvent::LastModifiedChanged(label));
            }
        }

        let mut file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "could not open game log, retrying next tick");
                return events;
            }
        };

        let size = match file.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "could not stat game log");
                return events;
            }
        };

        let previous_line = self.tail.last_line().to_string();
        let lines = match self.tail.read_appended(&mut file, size) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "error reading game log");
                return events;
            }
        };

        if !lines.is_empty() {
            tracing::trace!(count = lines.len(), "new game log lines");
            if self.tail.last_line() != previous_line {
                events.push(ChangeEvent::LastLineChanged(
                    self.tail.last_line().to_string(),
                ));
            }
            events.push(ChangeEvent::NewLinesAvailable(lines));
        }

        events
    }

    /// Returns the last `count` lines of the tracked log without touching
    /// the tail offset.
    pub fn read_last_lines(&self, count: usize) -> Vec<String> {
        match self.tail.file_path() {
            Some(path) if self.exists => snapshot::read_last_lines(path, count),
            _ => Vec::new(),
        }
    }

    fn set_exists(&mut self, exists: bool, events: &mut Vec<ChangeEvent>) {
        if replace_if_changed(&mut self.exists, exists) {
            tracing::debug!(exists, "game log existence changed");
            events.push(ChangeEvent::ExistenceChanged(exists));
        }
    }
}

/// Renders a file time as local `HH:MM:SS`.
fn format_timestamp(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .format("%H:%M:%S")
        .to_string()
}
