//! Periodic game process checks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::platform;

/// Default interval between checks.
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 3000;

/// Status change reported by the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    GameRunningChanged(bool),
    /// Wall-clock time of the latest check as `HH:MM:SS`.
    LastCheckTimeChanged(String),
    /// Raised after every check, changed or not.
    CheckCompleted(bool),
}

/// Callback invoked with each process event.
pub type OnProcessEventFn = Box<dyn Fn(ProcessEvent) + Send + Sync + 'static>;

/// Last observed process status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStatus {
    pub game_running: bool,
    pub last_check_time: String,
}

impl ProcessStatus {
    /// Records a check result and returns the resulting events.
    pub fn record(&mut self, running: bool, checked_at: String) -> Vec<ProcessEvent> {
        let mut events = Vec::new();
        if self.last_check_time != checked_at {
            self.last_check_time.clone_from(&checked_at);
            events.push(ProcessEvent::LastCheckTimeChanged(checked_at));
        }
        if self.game_running != running {
            self.game_running = running;
            events.push(ProcessEvent::GameRunningChanged(running));
        }
        events.push(ProcessEvent::CheckCompleted(running));
        events
    }
}

/// Watches for a named process.
pub struct ProcessWatcher {
    inner: Arc<Mutex<WatcherInner>>,
}

struct WatcherInner {
    process_name: String,
    status: ProcessStatus,
    on_event: OnProcessEventFn,
    cancel: Option<CancellationToken>,
}

impl ProcessWatcher {
    /// Creates a watcher for `process_name`.
    pub fn new(process_name: impl Into<String>, on_event: OnProcessEventFn) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WatcherInner {
                process_name: process_name.into(),
                status: ProcessStatus::default(),
                on_event,
                cancel: None,
            })),
        }
    }

    /// Checks once and returns whether the process is running.
    pub async fn check_now(&self) -> bool {
        check(&self.inner).await
    }

    /// Checks immediately, then every `interval_ms` milliseconds
    /// (0 = [`DEFAULT_CHECK_INTERVAL_MS`]). Restarts if already running.
    pub async fn start(&self, interval_ms: u64) {
        let interval_ms = match interval_ms {
            0 => DEFAULT_CHECK_INTERVAL_MS,
            v => v,
        };

        {
            let mut inner = self.inner.lock().await;
            if let Some(cancel) = inner.cancel.take() {
                cancel.cancel();
            }
            tracing::info!(
                process = %inner.process_name,
                interval_ms,
                "starting process monitoring"
            );
        }

        check(&self.inner).await;

        let cancel = CancellationToken::new();
        self.inner.lock().await.cancel = Some(cancel.clone());

        let inner = Arc::clone(&self.inner);
        let interval = Duration::from_millis(interval_ms);
        tokio::spawn(async move {
            check_loop(inner, interval, cancel).await;
        });
    }

    /// Stops periodic checks.
    pub async fn stop(&self) {
        if let Some(cancel) = self.inner.lock().await.cancel.take() {
            cancel.cancel();
            tracing::info!("stopped process monitoring");
        }
    }

    /// Returns `true` while periodic checks are scheduled.
    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.cancel.is_some()
    }

    /// Returns the last observed status.
    pub async fn status(&self) -> ProcessStatus {
        self.inner.lock().await.status.clone()
    }
}

async fn check(inner: &Arc<Mutex<WatcherInner>>) -> bool {
    let name = inner.lock().await.process_name.clone();
    let running = platform::is_running(&name).await;
    let checked_at = chrono::Local::now().format("%H:%M:%S").to_string();

    let mut guard = inner.lock().await;
    let events = guard.status.record(running, checked_at);
    for event in events {
        (guard.on_event)(event);
    }
    tracing::debug!(process = %name, running, "process check completed");
    running
}

async fn check_loop(
    inner: Arc<Mutex<WatcherInner>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // Skip the first immediate tick, `start` already checked.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                check(&inner).await;
            }
        }
    }
}
