//! Input resolution: turn a user-supplied path or URL into a [`SourceDocument`].
//!
//! The document kind comes from the file name, and an unsupported extension
//! is rejected before any bytes are read or downloaded. PDF magic bytes are
//! checked later by the rasterizer, so a `.pdf` that is not a PDF surfaces
//! as a decode error rather than an input error.

use crate::document::{DocumentKind, SourceDocument};
use crate::error::InsightError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to an in-memory document.
///
/// URLs are downloaded with a `timeout_secs` limit; anything else is read
/// from the local file system.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<SourceDocument, InsightError> {
    if input.trim().is_empty() {
        return Err(InsightError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(Path::new(input)).await
    }
}

async fn read_local(path: &Path) -> Result<SourceDocument, InsightError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| InsightError::InvalidInput {
            input: path.display().to_string(),
        })?
        .to_string();
    let kind = DocumentKind::from_file_name(&name)?;

    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    debug!("Read {} resume '{}' ({} bytes)", kind, path.display(), bytes.len());
    Ok(SourceDocument::new(name, kind, bytes))
}

fn io_error(path: &Path, e: std::io::Error) -> InsightError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => InsightError::PermissionDenied {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::NotFound => InsightError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ if path.is_dir() => InsightError::InvalidInput {
            input: path.display().to_string(),
        },
        _ => InsightError::Internal(format!("Failed to read '{}': {}", path.display(), e)),
    }
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<SourceDocument, InsightError> {
    let name = filename_from_url(url).ok_or_else(|| InsightError::InvalidInput {
        input: url.to_string(),
    })?;
    let kind = DocumentKind::from_file_name(&name)?;

    info!("Downloading {} resume from: {}", kind, url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| InsightError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            InsightError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            InsightError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(InsightError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| InsightError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(SourceDocument::new(name, kind, bytes.to_vec()))
}

/// Last non-empty path segment of `url`, percent-decoding left alone.
fn filename_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.filter(|s| !s.is_empty()).next_back()?;
    Some(last.to_string())
}

/// Where a rendered page for `input` is written when no output is given.
pub fn default_image_path(input: &str) -> PathBuf {
    let stem = if is_url(input) {
        filename_from_url(input)
            .as_deref()
            .and_then(|n| Path::new(n).file_stem().and_then(|s| s.to_str()).map(str::to_string))
    } else {
        Path::new(input)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
    };
    PathBuf::from(format!("{}.jpg", stem.unwrap_or_else(|| "resume".to_string())))
}
