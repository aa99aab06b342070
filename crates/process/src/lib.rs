//! Game process detection.
//!
//! A one-shot [`is_process_running`] query plus a [`ProcessWatcher`] that
//! repeats it on an interval and reports status changes.

#[cfg(windows)]
#[path = "platform_windows.rs"]
mod platform;

#[cfg(not(windows))]
#[path = "platform_unix.rs"]
mod platform;

mod watcher;

pub use watcher::{
    DEFAULT_CHECK_INTERVAL_MS, OnProcessEventFn, ProcessEvent, ProcessStatus, ProcessWatcher,
};

/// Executable name of the game client.
pub const GAME_PROCESS_NAME: &str = "StarCitizen.exe";

/// Returns `true` if a process called `name` is currently running.
///
/// Lookup failures count as "not running".
pub async fn is_process_running(name: &str) -> bool {
    platform::is_running(name).await
}
