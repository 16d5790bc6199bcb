//! Streaming asset download
//!
//! Assets are written chunk by chunk to `<plugins-dir>/<asset-name>`. No
//! checksum is computed; a truncated file only surfaces when extraction of it
//! fails later.

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_LENGTH;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use workbench_core::config::NetworkConfig;
use workbench_core::types::AssetDescriptor;
use workbench_core::{Error, Result};

/// A file persisted by the downloader
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Local path of the asset
    pub path: PathBuf,

    /// Bytes written
    pub bytes: u64,
}

/// Streams release assets to local storage
pub struct AssetDownloader {
    client: reqwest::Client,
    show_progress: bool,
}

impl AssetDownloader {
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .build()?;

        Ok(Self {
            client,
            show_progress: network.show_progress,
        })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Download an asset into `dest_dir`, overwriting any file of the same name
    pub async fn download(&self, asset: &AssetDescriptor, dest_dir: &Path) -> Result<DownloadedFile> {
        let file_path = dest_dir.join(&asset.file_name);
        info!("Downloading {}", asset.download_url);

        let response = self
            .client
            .get(&asset.download_url)
            .send()
            .await
            .map_err(|e| Error::resolution(&asset.file_name, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::resolution(
                &asset.file_name,
                format!("download failed with status {}", response.status()),
            ));
        }

        let total_size = asset.byte_length.or_else(|| {
            response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|ct| ct.to_str().ok())
                .and_then(|ct| ct.parse::<u64>().ok())
        });

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&file_path)?;

        let progress = self
            .show_progress
            .then(|| progress_bar(&asset.file_name, total_size));

        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk: bytes::Bytes = chunk_result?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;

            if let Some(pb) = &progress {
                pb.set_position(downloaded);
            }
        }
        file.flush()?;

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Downloaded {}", asset.file_name));
        }

        debug!(
            "Wrote {} ({}) to {}",
            asset.file_name,
            human_readable_size(downloaded),
            file_path.display()
        );

        Ok(DownloadedFile {
            path: file_path,
            bytes: downloaded,
        })
    }
}

fn progress_bar(name: &str, total: Option<u64>) -> ProgressBar {
    let pb = match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg}\n[{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    };
    pb.set_message(format!("Downloading {}", name));
    pb
}

/// Convert bytes to human-readable size
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
