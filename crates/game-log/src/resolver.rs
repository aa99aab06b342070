//! Locates the active `Game.log` under a game installation root.
//!
//! The log lives either directly in the root or in one of the release
//! channel folders. Channels are checked in a fixed priority order and the
//! first regular file found wins.

use std::path::{Path, PathBuf};

/// File name of the game's log.
pub const LOG_FILE_NAME: &str = "Game.log";

/// Release channel folders checked after the root, highest priority first.
pub const CHANNEL_DIRS: [&str; 3] = ["LIVE", "PTU", "EPTU"];

/// Result of a single resolution pass.
///
/// `resolved_path` is only set when a file was confirmed to exist at
/// resolution time. It is not revalidated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLogLocation {
    pub root_directory: PathBuf,
    pub resolved_path: Option<PathBuf>,
    pub exists: bool,
}

impl ResolvedLogLocation {
    fn found(root: &Path, path: PathBuf) -> Self {
        Self {
            root_directory: root.to_path_buf(),
            resolved_path: Some(path),
            exists: true,
        }
    }

    fn missing(root: &Path) -> Self {
        Self {
            root_directory: root.to_path_buf(),
            resolved_path: None,
            exists: false,
        }
    }
}

/// Finds the game log under `root`.
///
/// An empty root short-circuits without touching the filesystem. A missing
/// or unreadable root is not an error, it simply resolves to nothing.
pub fn resolve(root: &Path) -> ResolvedLogLocation {
    if root.as_os_str().is_empty() {
        tracing::debug!("no game directory configured");
        return ResolvedLogLocation::missing(root);
    }

    let candidates = std::iter::once(root.join(LOG_FILE_NAME)).chain(
        CHANNEL_DIRS
            .iter()
            .map(|channel| root.join(channel).join(LOG_FILE_NAME)),
    );

    for candidate in candidates {
        tracing::debug!(path = %candidate.display(), "checking for game log");
        if candidate.is_file() {
            tracing::info!(path = %candidate.display(), "found game log");
            return ResolvedLogLocation::found(root, candidate);
        }
    }

    tracing::debug!(root = %root.display(), "game log not found");
    ResolvedLogLocation::missing(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn empty_root_resolves_to_nothing() {
        let loc = resolve(Path::new(""));
        assert!(!loc.exists);
        assert!(loc.resolved_path.is_none());
    }

    #[test]
    fn missing_root_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let loc = resolve(&tmp.path().join("does-not-exist"));
        assert!(!loc.exists);
        assert!(loc.resolved_path.is_none());
    }

    #[test]
    fn root_log_wins_over_channels() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("Game.log"));
        touch(&tmp.path().join("LIVE/Game.log"));

        let loc = resolve(tmp.path());
        assert!(loc.exists);
        assert_eq!(loc.resolved_path, Some(tmp.path().join("Game.log")));
        assert_eq!(loc.root_directory, tmp.path());
    }

    #[test]
    fn ptu_found_when_only_channel() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("PTU/Game.log"));

        let loc = resolve(tmp.path());
        assert_eq!(loc.resolved_path, Some(tmp.path().join("PTU").join("Game.log")));
    }

    #[test]
    fn live_wins_over_ptu_and_eptu() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("EPTU/Game.log"));
        touch(&tmp.path().join("PTU/Game.log"));
        touch(&tmp.path().join("LIVE/Game.log"));

        let loc = resolve(tmp.path());
        assert_eq!(loc.resolved_path, Some(tmp.path().join("LIVE").join("Game.log")));
    }

    #[test]
    fn eptu_is_last_resort() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("EPTU/Game.log"));

        let loc = resolve(tmp.path());
        assert_eq!(loc.resolved_path, Some(tmp.path().join("EPTU").join("Game.log")));
    }

    #[test]
    fn directory_named_game_log_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("Game.log")).unwrap();
        touch(&tmp.path().join("PTU/Game.log"));

        let loc = resolve(tmp.path());
        assert_eq!(loc.resolved_path, Some(tmp.path().join("PTU").join("Game.log")));
    }

    #[test]
    fn other_file_names_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("LIVE/game.txt"));
        assert!(!resolve(tmp.path()).exists);
    }
}
