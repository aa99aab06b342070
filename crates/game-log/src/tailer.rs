//! Timer-driven log monitor.
//!
//! Wraps a [`LogReader`] in a tokio task that ticks at a fixed interval.
//! The reader sits behind a mutex and every tick runs to completion while
//! holding it, so ticks never overlap and re-targeting never races a tick.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::event::ChangeEvent;
use crate::reader::LogReader;
use crate::resolver::{self, ResolvedLogLocation};

/// Callback invoked with every change event, in the order they occur.
pub type OnEventFn = Box<dyn Fn(ChangeEvent) + Send + Sync + 'static>;

/// Poll interval used when `start` is given 0.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Watches the game log and reports changes through a callback.
///
/// Dropping the monitor ends its poll task.
pub struct LogMonitor {
    inner: Arc<Mutex<MonitorState>>,
    shutdown: CancellationToken,
}

struct MonitorState {
    reader: LogReader,
    on_event: OnEventFn,
    /// Set while the poll task is running.
    cancel: Option<CancellationToken>,
    /// Parent of every `cancel` token, fired when the monitor is dropped.
    shutdown: CancellationToken,
    interval: Duration,
}

impl MonitorState {
    fn emit(&self, events: Vec<ChangeEvent>) {
        for event in events {
            (self.on_event)(event);
        }
    }

    fn is_monitoring(&self) -> bool {
        self.cancel.is_some()
    }

    /// Starts the poll task. Caller holds the lock.
    fn start(&mut self, interval: Duration, inner: &Arc<Mutex<MonitorState>>) {
        if !self.reader.can_monitor() {
            tracing::debug!("cannot start monitoring, no valid log file");
            return;
        }

        let was_monitoring = self.is_monitoring();
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }

        let cancel = self.shutdown.child_token();
        self.cancel = Some(cancel.clone());
        self.interval = interval;

        let task_inner = Arc::clone(inner);
        tokio::spawn(async move {
            poll_loop(task_inner, interval, cancel).await;
        });

        // Initial tick so callers see the current state without waiting.
        let events = self.reader.tick();
        self.emit(events);

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            "started monitoring game log"
        );
        if !was_monitoring {
            self.emit(vec![ChangeEvent::MonitoringChanged(true)]);
        }
    }

    /// Stops the poll task. Caller holds the lock.
    fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
            tracing::info!("stopped monitoring game log");
            self.emit(vec![ChangeEvent::MonitoringChanged(false)]);
        }
    }
}

impl LogMonitor {
    /// Creates an idle monitor with the given event callback.
    pub fn new(on_event: OnEventFn) -> Self {
        let shutdown = CancellationToken::new();
        Self {
            inner: Arc::new(Mutex::new(MonitorState {
                reader: LogReader::new(),
                on_event,
                cancel: None,
                shutdown: shutdown.clone(),
                interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            })),
            shutdown,
        }
    }

    /// Resolves `root` and tracks the log found there.
    ///
    /// Does not start or stop monitoring.
    pub async fn find_log_file(&self, root: &Path) -> ResolvedLogLocation {
        let location = resolver::resolve(root);
        let mut state = self.inner.lock().await;
        let events = state.reader.apply_location(&location);
        state.emit(events);
        location
    }

    /// Re-resolves `root` after the game directory changed.
    ///
    /// Resolving to the path already tracked changes nothing, so the tail
    /// continues where it was. A different path is tracked from its start;
    /// if monitoring was active it is restarted against the new file with
    /// the same interval. If no log is found monitoring stops.
    pub async fn retarget(&self, root: &Path) -> ResolvedLogLocation {
        let location = resolver::resolve(root);
        let mut state = self.inner.lock().await;

        let unchanged = location.exists
            && location.resolved_path.as_deref() == state.reader.log_file_path()
            && state.reader.log_file_exists();
        if unchanged {
            tracing::debug!(root = %root.display(), "game log unchanged after re-resolve");
            return location;
        }

        let was_monitoring = state.is_monitoring();
        let interval = state.interval;
        state.stop();

        let events = state.reader.apply_location(&location);
        state.emit(events);

        if was_monitoring && location.exists {
            state.start(interval, &self.inner);
        }
        location
    }

    /// Starts polling every `interval_ms` milliseconds (0 = default).
    ///
    /// Ignored unless a log file has been found. Runs one tick before
    /// returning. Calling it while active replaces the interval.
    pub async fn start(&self, interval_ms: u64) {
        let interval_ms = match interval_ms {
            0 => DEFAULT_POLL_INTERVAL_MS,
            v => v,
        };
        let mut state = self.inner.lock().await;
        state.start(Duration::from_millis(interval_ms), &self.inner);
    }

    /// Stops polling. No-op when idle.
    pub async fn stop(&self) {
        self.inner.lock().await.stop();
    }

    pub async fn is_monitoring(&self) -> bool {
        self.inner.lock().await.is_monitoring()
    }

    pub async fn log_file_path(&self) -> Option<PathBuf> {
        self.inner
            .lock()
            .await
            .reader
            .log_file_path()
            .map(Path::to_path_buf)
    }

    pub async fn log_file_exists(&self) -> bool {
        self.inner.lock().await.reader.log_file_exists()
    }

    pub async fn last_update(&self) -> String {
        self.inner.lock().await.reader.last_update().to_string()
    }

    pub async fn last_log_line(&self) -> String {
        self.inner.lock().await.reader.last_log_line().to_string()
    }

    /// Returns the last `count` lines of the tracked log. See
    /// [`crate::read_last_lines`].
    pub async fn read_last_lines(&self, count: usize) -> Vec<String> {
        self.inner.lock().await.reader.read_last_lines(count)
    }
}

impl Drop for LogMonitor {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Ticks the reader until `cancel` fires.
async fn poll_loop(inner: Arc<Mutex<MonitorState>>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; `start` already ran it.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let mut state = inner.lock().await;
                // A stop may have landed while we waited for the lock.
                if cancel.is_cancelled() {
                    break;
                }
                let events = state.reader.tick();
                state.emit(events);
            }
        }
    }

    tracing::debug!("game log poll task exited");
}
