//! One-shot reads of the end of a log file.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Number of lines returned when the caller has no preference.
pub const DEFAULT_SNAPSHOT_LINES: usize = 10;

/// Returns the last `count` lines of the file at `path`, oldest first.
///
/// Reads the whole file and keeps no state, so it never interferes with an
/// active tail. An empty path, a missing file or a read failure all yield
/// an empty list.
pub fn read_last_lines(path: &Path, count: usize) -> Vec<String> {
    if path.as_os_str().is_empty() {
        return Vec::new();
    }

    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not open log for snapshot");
            return Vec::new();
        }
    };

    let mut tail: VecDeque<String> = VecDeque::with_capacity(count.min(1024));
    for raw in BufReader::new(file).split(b'\n') {
        let raw = match raw {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "error reading log for snapshot");
                return Vec::new();
            }
        };

        tail.push_back(
            String::from_utf8_lossy(&raw)
                .trim_end_matches('\r')
                .to_string(),
        );
        if tail.len() > count {
            tail.pop_front();
        }
    }

    tail.into()
}
