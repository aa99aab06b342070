//! Application orchestrator, wires settings, log monitor, process watcher
//! and update checker together.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use logi_game_log::{ChangeEvent, LogMonitor};
use logi_process::{GAME_PROCESS_NAME, ProcessEvent, ProcessWatcher};
use logi_settings::{SettingsStore, is_valid_game_directory};
use logi_updater::{UpdateChecker, UpdateStatus};

use crate::cli::Args;

/// How often the settings file is re-read for external edits.
const SETTINGS_RELOAD_INTERVAL: Duration = Duration::from_secs(5);

/// Runs until Ctrl-C.
pub async fn run(args: Args) -> anyhow::Result<()> {
    // -- Settings --
    let mut settings = match &args.settings {
        Some(path) => SettingsStore::load(path.clone())?,
        None => SettingsStore::load_default()?,
    };

    if let Some(dir) = &args.game_dir {
        if !is_valid_game_directory(dir) {
            tracing::warn!(game_directory = %dir, "game directory does not exist or is not readable");
        }
        if settings.set_game_directory(dir.clone()) {
            settings.save()?;
        }
    }

    // -- Game log --
    let monitor = Arc::new(LogMonitor::new(Box::new(on_log_event)));
    let location = monitor
        .find_log_file(Path::new(settings.game_directory()))
        .await;

    if location.exists {
        for line in monitor.read_last_lines(args.tail_lines).await {
            println!("{line}");
        }
        monitor.start(args.interval_ms).await;
    } else {
        tracing::warn!(
            game_directory = %settings.game_directory(),
            "Game.log not found, set the game directory with --game-dir"
        );
    }

    // Re-target the monitor whenever the game directory changes.
    let mut directory_rx = settings.subscribe();
    let retarget_monitor = Arc::clone(&monitor);
    let interval_ms = args.interval_ms;
    let retarget_task = tokio::spawn(async move {
        while directory_rx.changed().await.is_ok() {
            let dir = directory_rx.borrow_and_update().clone();
            let location = retarget_monitor.retarget(Path::new(&dir)).await;
            if location.exists && !retarget_monitor.is_monitoring().await {
                retarget_monitor.start(interval_ms).await;
            }
        }
    });

    // -- Game process --
    let watcher = ProcessWatcher::new(GAME_PROCESS_NAME, Box::new(on_process_event));
    watcher.start(args.process_interval_ms).await;

    // -- Updates --
    if !args.no_update_check {
        let checker = UpdateChecker::new(env!("CARGO_PKG_VERSION"))?.with_url(&args.version_url);
        tokio::spawn(async move {
            report_update(checker.check_for_updates().await);
        });
    }

    tracing::info!("Logi ready");

    // -- Main loop: reload settings until shutdown --
    let mut reload = tokio::time::interval(SETTINGS_RELOAD_INTERVAL);
    reload.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    reload.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("SIGINT received, shutting down");
                break;
            }
            _ = reload.tick() => {
                if let Err(e) = settings.reload() {
                    tracing::warn!(error = %e, "failed to reload settings");
                }
            }
        }
    }

    // -- Graceful shutdown --
    retarget_task.abort();
    monitor.stop().await;
    watcher.stop().await;

    Ok(())
}

fn on_log_event(event: ChangeEvent) {
    match event {
        ChangeEvent::PathChanged(path) => {
            tracing::info!(path = %path.display(), "game log path changed");
        }
        ChangeEvent::ExistenceChanged(exists) => {
            tracing::info!(exists, "game log availability changed");
        }
        ChangeEvent::LastModifiedChanged(label) => {
            tracing::debug!(last_update = %label, "game log modified");
        }
        ChangeEvent::LastLineChanged(_) => {}
        ChangeEvent::NewLinesAvailable(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        ChangeEvent::MonitoringChanged(monitoring) => {
            tracing::info!(monitoring, "game log monitoring changed");
        }
    }
}

fn on_process_event(event: ProcessEvent) {
    match event {
        ProcessEvent::GameRunningChanged(true) => tracing::info!("game started"),
        ProcessEvent::GameRunningChanged(false) => tracing::info!("game not running"),
        ProcessEvent::LastCheckTimeChanged(_) | ProcessEvent::CheckCompleted(_) => {}
    }
}

fn report_update(result: Result<UpdateStatus, logi_updater::UpdateError>) {
    match result {
        Ok(UpdateStatus::Available(info)) => {
            tracing::info!(
                latest = %info.version,
                required = info.update_required,
                download = %info.download_url,
                "{}",
                if info.update_message.is_empty() {
                    "update available"
                } else {
                    info.update_message.as_str()
                }
            );
            for entry in &info.changelog {
                tracing::info!("  - {entry}");
            }
        }
        Ok(UpdateStatus::UpToDate { .. }) => {}
        Err(e) => tracing::warn!(error = %e, "update check failed"),
    }
}
