//! Post-submit follow-ups: opening a link or downloading a file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::io::AsyncWriteExt;

/// Open `url` in the system browser. Failures to launch are ignored; the
/// URL is always printed by the caller.
pub fn open_in_browser(url: &str) {
    #[cfg(target_os = "macos")]
    {
        let _ = std::process::Command::new("open").arg(url).spawn();
    }
    #[cfg(target_os = "linux")]
    {
        let _ = std::process::Command::new("xdg-open").arg(url).spawn();
    }
    #[cfg(target_os = "windows")]
    {
        let _ = std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn();
    }
}

/// Last non-empty path segment of `url`, percent-decoded.
pub fn file_name_for(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_owned))
        })
        .map(|segment| match urlencoding::decode(&segment) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => segment.clone(),
        })
        .map(|name| name.replace(['/', '\\'], "_"))
        .filter(|name| !name.trim().is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| "download".to_owned())
}

/// `dir/name`, or `dir/stem (n).ext` if that already exists.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1u32..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
            None => dir.join(format!("{stem} ({n})")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Download `url` into `dir`, never overwriting an existing file.
///
/// # Errors
///
/// Fails on a network error, a non-success status, or a write error.
pub async fn download(http: &reqwest::Client, url: &str, dir: &Path) -> Result<PathBuf> {
    let mut resp = http
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to download {url}"))?;
    if !resp.status().is_success() {
        bail!("download failed: server returned {}", resp.status());
    }

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = unique_path(dir, &file_name_for(url));
    let mut file = tokio::fs::File::create(&path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;

    while let Some(chunk) = resp.chunk().await.context("download interrupted")? {
        file.write_all(&chunk)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    file.flush().await?;
    Ok(path)
}
