//! Update checker HTTP client.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, EXPIRES, HeaderMap, HeaderValue, PRAGMA};
use tokio::io::AsyncWriteExt;

use crate::error::UpdateError;
use crate::manifest::{VersionManifest, is_version_newer};

/// Where the release manifest is published.
pub const DEFAULT_VERSION_URL: &str = "https://raw.githubusercontent.com/OMTut/Logi/master/version.json";

/// Upper bound for a manifest request.
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a successful check.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateStatus {
    UpToDate { latest: String },
    Available(VersionManifest),
}

/// Checks a remote manifest for newer releases.
pub struct UpdateChecker {
    http: reqwest::Client,
    url: String,
    current_version: String,
    checking: AtomicBool,
    downloading: AtomicBool,
}

/// Clears an in-progress flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl UpdateChecker {
    /// Creates a checker for the running `current_version`.
    pub fn new(current_version: impl Into<String>) -> Result<Self, UpdateError> {
        let current_version = current_version.into();

        // Always fetch a fresh manifest.
        let mut headers = HeaderMap::new();
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(EXPIRES, HeaderValue::from_static("0"));

        let http = reqwest::Client::builder()
            .user_agent(format!("Logi/{current_version}"))
            .default_headers(headers)
            .connect_timeout(CHECK_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            url: DEFAULT_VERSION_URL.to_string(),
            current_version,
            checking: AtomicBool::new(false),
            downloading: AtomicBool::new(false),
        })
    }

    /// Uses a different manifest URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn is_checking(&self) -> bool {
        self.checking.load(Ordering::Acquire)
    }

    /// Fetches the manifest and compares it with the running version.
    ///
    /// Only one check runs at a time; overlapping calls fail with
    /// [`UpdateError::AlreadyChecking`].
    pub async fn check_for_updates(&self) -> Result<UpdateStatus, UpdateError> {
        let Some(_guard) = InFlight::acquire(&self.checking) else {
            tracing::debug!("update check already in progress");
            return Err(UpdateError::AlreadyChecking);
        };

        tracing::info!(
            url = %self.url,
            current = %self.current_version,
            "checking for updates"
        );

        let resp = self
            .http
            .get(&self.url)
            .timeout(CHECK_TIMEOUT)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "update check failed");
            return Err(UpdateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        let manifest: VersionManifest = serde_json::from_slice(&body)?;

        if is_version_newer(&self.current_version, &manifest.version) {
            tracing::info!(
                latest = %manifest.version,
                required = manifest.update_required,
                "update available"
            );
            Ok(UpdateStatus::Available(manifest))
        } else {
            tracing::info!(latest = %manifest.version, "already up to date");
            Ok(UpdateStatus::UpToDate {
                latest: manifest.version,
            })
        }
    }

    /// Downloads the installer advertised by `manifest` into `dest_dir`.
    ///
    /// `on_progress` receives `(received, total)` after every chunk; `total`
    /// is `None` when the server does not send a length. Returns the path of
    /// the written file.
    pub async fn download_update(
        &self,
        manifest: &VersionManifest,
        dest_dir: &Path,
        on_progress: impl Fn(u64, Option<u64>),
    ) -> Result<PathBuf, UpdateError> {
        if manifest.download_url.is_empty() {
            return Err(UpdateError::NoDownloadUrl);
        }
        let Some(_guard) = InFlight::acquire(&self.downloading) else {
            return Err(UpdateError::AlreadyDownloading);
        };

        tracing::info!(url = %manifest.download_url, "downloading update");

        let mut resp = self.http.get(&manifest.download_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpdateError::Api {
                status: status.as_u16(),
                body: "download failed".into(),
            });
        }

        tokio::fs::create_dir_all(dest_dir).await?;
        let path = dest_dir.join(installer_file_name(&manifest.version));
        let part = path.with_extension("exe.part");

        // The installer name only appears once the body is complete.
        let received = match stream_to_file(&mut resp, &part, &on_progress).await {
            Ok(received) => received,
            Err(e) => {
                tracing::warn!(error = %e, "update download failed");
                let _ = tokio::fs::remove_file(&part).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&part, &path).await?;

        tracing::info!(path = %path.display(), bytes = received, "update downloaded");
        Ok(path)
    }
}

/// Writes the response body to `path`, returning the byte count.
async fn stream_to_file(
    resp: &mut reqwest::Response,
    path: &Path,
    on_progress: &impl Fn(u64, Option<u64>),
) -> Result<u64, UpdateError> {
    let mut file = tokio::fs::File::create(path).await?;

    let total = resp.content_length();
    let mut received: u64 = 0;
    while let Some(chunk) = resp.chunk().await? {
        file.write_all(&chunk).await?;
        received += chunk.len() as u64;
        on_progress(received, total);
    }
    file.flush().await?;

    match total {
        Some(expected) if expected != received => {
            Err(UpdateError::Incomplete { received, expected })
        }
        _ => Ok(received),
    }
}

fn installer_file_name(version: &str) -> String {
    format!("LogiSetup_{version}.exe")
}
