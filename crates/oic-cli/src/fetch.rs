use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Download `url` into `dest`, creating parent directories.
///
/// The response body is read fully before `dest` is written, so a failed
/// download leaves any previous copy untouched.
pub fn download_spec(url: &str, dest: &Path) -> Result<()> {
    log::info!("downloading {url}");

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to download {url}"))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("failed to download {url}: server responded with {status}");
    }

    let body = response
        .bytes()
        .with_context(|| format!("failed to read response body from {url}"))?;

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(dest, &body).with_context(|| format!("failed to write {}", dest.display()))?;

    log::debug!("saved {} bytes to {}", body.len(), dest.display());
    Ok(())
}
