//! Export "navigation".
//!
//! In the browser, exporting means pointing the window at `/api/export` and letting the
//! download happen on its own. The [`Navigator`] trait is that seam: the controller hands it a
//! URL and moves on, it never learns whether the download completed.

use chrono::{DateTime, Local};
use log::{error, info};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error_handling::types::ExportError;

/// Fire-and-forget navigation to a backend URL.
pub trait Navigator: Send + Sync {
    /// Starts the navigation. Returning `Ok` only means it was started.
    fn navigate(&self, url: &str) -> Result<(), ExportError>;
}

/// Downloads the export in the background and writes it into `export_dir`.
pub struct DownloadNavigator {
    client: reqwest::Client,
    export_dir: PathBuf,
}

impl DownloadNavigator {
    pub fn new(client: reqwest::Client, export_dir: PathBuf) -> Self {
        Self { client, export_dir }
    }
}

impl Navigator for DownloadNavigator {
    fn navigate(&self, url: &str) -> Result<(), ExportError> {
        reqwest::Url::parse(url).map_err(|e| ExportError::InvalidUrl(format!("{}: {}", url, e)))?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ExportError::Download(e.to_string()))?;

        let client = self.client.clone();
        let url = url.to_string();
        let export_dir = self.export_dir.clone();
        runtime.spawn(async move {
            match download_export(&client, &url, &export_dir).await {
                Ok(path) => info!("Export saved to {}", path.display()),
                Err(e) => error!("Export from {} failed: {}", url, e),
            }
        });
        Ok(())
    }
}

/// Fetches `url` and stores the body in `export_dir`, returning the written path.
pub async fn download_export(
    client: &reqwest::Client,
    url: &str,
    export_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ExportError::Download(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExportError::Download(format!("HTTP {}", status.as_u16())));
    }

    let file_name = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| fallback_export_filename(Local::now()));

    let body = response
        .bytes()
        .await
        .map_err(|e| ExportError::Download(e.to_string()))?;

    let path = export_dir.join(file_name);
    tokio::fs::write(&path, &body).await?;
    Ok(path)
}

/// Extracts the file name of an `attachment; filename="..."` header.
///
/// Only the last path component is kept so a hostile header cannot write outside the export
/// directory.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let re = Regex::new(r#"filename\*?=(?:UTF-8'')?"?([^";]+)"?"#).ok()?;
    let raw = re.captures(header)?.get(1)?.as_str().trim();
    let name = Path::new(raw).file_name()?.to_str()?;
    if name.is_empty() || name == ".." {
        return None;
    }
    Some(name.to_string())
}

pub fn fallback_export_filename(now: DateTime<Local>) -> String {
    format!("network_capture_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
