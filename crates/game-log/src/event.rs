//! Change events raised by the log reader.

use std::path::PathBuf;

/// A single observed change. Raised at most once per field per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    PathChanged(PathBuf),
    ExistenceChanged(bool),
    /// Complete, non-empty lines appended since the previous read, in order.
    NewLinesAvailable(Vec<String>),
    /// Modification time of the log file as `HH:MM:SS`.
    LastModifiedChanged(String),
    LastLineChanged(String),
    MonitoringChanged(bool),
}

/// Stores `value` in `slot` and reports whether it differed.
pub(crate) fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
