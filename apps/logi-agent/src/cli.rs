//! Command-line options.

use std::path::PathBuf;

use clap::Parser;

/// Watches the game process and its Game.log.
#[derive(Debug, Parser)]
#[command(name = "logi-agent", version, about)]
pub struct Args {
    /// Game installation root. Saved to the settings file when given.
    #[arg(long)]
    pub game_dir: Option<String>,

    /// Settings file to use instead of the platform default.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Game.log poll interval in milliseconds.
    #[arg(long, default_value_t = logi_game_log::DEFAULT_POLL_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Process check interval in milliseconds.
    #[arg(long, default_value_t = logi_process::DEFAULT_CHECK_INTERVAL_MS)]
    pub process_interval_ms: u64,

    /// Number of existing log lines to print on startup.
    #[arg(long, default_value_t = logi_game_log::DEFAULT_SNAPSHOT_LINES)]
    pub tail_lines: usize,

    /// Skip the startup update check.
    #[arg(long)]
    pub no_update_check: bool,

    /// Version manifest URL.
    #[arg(long, default_value = logi_updater::DEFAULT_VERSION_URL)]
    pub version_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["logi-agent"]);
        assert!(args.game_dir.is_none());
        assert_eq!(args.interval_ms, 1000);
        assert_eq!(args.process_interval_ms, 3000);
        assert_eq!(args.tail_lines, 10);
        assert!(!args.no_update_check);
        assert_eq!(args.version_url, logi_updater::DEFAULT_VERSION_URL);
    }

    #[test]
    fn overrides() {
        let args = Args::parse_from([
            "logi-agent",
            "--game-dir",
            "/games/sc",
            "--interval-ms",
            "250",
            "--no-update-check",
        ]);
        assert_eq!(args.game_dir.as_deref(), Some("/games/sc"));
        assert_eq!(args.interval_ms, 250);
        assert!(args.no_update_check);
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
