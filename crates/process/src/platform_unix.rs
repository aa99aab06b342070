//! Process lookup via `pgrep`.

/// Returns `true` if a process named exactly `name` is running.
pub async fn is_running(name: &str) -> bool {
    let output = tokio::process::Command::new("pgrep")
        .args(["-x", name])
        .output()
        .await;

    match output {
        Ok(o) => o.status.success() && !o.stdout.is_empty(),
        Err(e) => {
            tracing::debug!(error = %e, "failed to run pgrep");
            false
        }
    }
}
