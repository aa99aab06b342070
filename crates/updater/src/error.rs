//! Error types for update checks and downloads.

/// Errors from the update checker.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("download incomplete: received {received} of {expected} bytes")]
    Incomplete { received: u64, expected: u64 },

    #[error("update check already in progress")]
    AlreadyChecking,

    #[error("download already in progress")]
    AlreadyDownloading,

    #[error("no download URL available")]
    NoDownloadUrl,
}
