//! Application update checks.
//!
//! Fetches a JSON version manifest, compares it with the running version
//! and optionally downloads the installer. Payloads are neither verified
//! nor executed here.

mod checker;
mod error;
mod manifest;

pub use checker::{CHECK_TIMEOUT, DEFAULT_VERSION_URL, UpdateChecker, UpdateStatus};
pub use error::UpdateError;
pub use manifest::{VersionManifest, is_version_newer};
