//! Game.log discovery and incremental tailing.
//!
//! [`resolve`] finds the active log under a game root. [`LogMonitor`] polls
//! it on a timer, reading only appended bytes and reporting
//! [`ChangeEvent`]s. [`read_last_lines`] takes an independent snapshot of
//! the end of the file.

mod event;
mod reader;
mod resolver;
mod snapshot;
mod state;
mod tailer;

pub use event::ChangeEvent;
pub use reader::LogReader;
pub use resolver::{CHANNEL_DIRS, LOG_FILE_NAME, ResolvedLogLocation, resolve};
pub use snapshot::{DEFAULT_SNAPSHOT_LINES, read_last_lines};
pub use state::TailState;
pub use tailer::{DEFAULT_POLL_INTERVAL_MS, LogMonitor, OnEventFn};
