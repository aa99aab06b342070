//! Version manifest format and version comparison.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Contents of the remote `version.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionManifest {
    pub version: String,
    #[serde(default)]
    pub update_message: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub release_notes_url: String,
    /// Installer size in bytes, as advertised.
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub update_required: bool,
    #[serde(default)]
    pub changelog: Vec<String>,
}

/// Returns `true` if `latest` is strictly newer than `current`.
///
/// Versions are dotted numeric segments. Missing segments count as zero
/// and anything after the first non-numeric character is ignored, so
/// `1.2` equals `1.2.0` and `1.3.0-beta` compares as `1.3.0`.
pub fn is_version_newer(current: &str, latest: &str) -> bool {
    compare_versions(latest, current) == Ordering::Greater
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = parse_segments(a);
    let b = parse_segments(b);
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn parse_segments(version: &str) -> Vec<u64> {
    let version = version.trim().trim_start_matches(['v', 'V']);
    let mut segments = Vec::new();

    for part in version.split('.') {
        let digits: &str = &part[..part
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(part.len())];
        let Ok(value) = digits.parse::<u64>() else {
            break;
        };
        segments.push(value);
        if digits.len() != part.len() {
            break;
        }
    }

    segments
}
