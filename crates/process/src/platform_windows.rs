//! Process lookup via `tasklist`.

/// Returns `true` if a process with image name `name` is running.
/// The comparison is case-insensitive, like Windows image names.
pub async fn is_running(name: &str) -> bool {
    let output = tokio::process::Command::new("tasklist")
        .args(["/FI", &format!("IMAGENAME eq {name}"), "/NH"])
        .output()
        .await;

    match output {
        Ok(o) => listing_contains(&String::from_utf8_lossy(&o.stdout), name),
        Err(e) => {
            tracing::debug!(error = %e, "failed to run tasklist");
            false
        }
    }
}

/// `tasklist` prints an informational line instead of rows when nothing
/// matches, so look for the image name at the start of a row.
fn listing_contains(stdout: &str, name: &str) -> bool {
    let name = name.to_lowercase();
    stdout
        .lines()
        .any(|line| line.trim_start().to_lowercase().starts_with(&name))
}
