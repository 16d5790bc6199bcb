//! Plugin release acquisition
//!
//! Provides:
//! - The `ReleaseHost` interface and its GitHub REST implementation
//! - Streaming asset download with progress reporting
//! - `ReleaseFetcher`, which resolves exact or latest releases per repository

pub mod download;
pub mod fetcher;
pub mod host;

pub use download::{human_readable_size, AssetDownloader, DownloadedFile};
pub use fetcher::{DownloadedAsset, FetchReport, ReleaseFetcher};
pub use host::{GitHubReleaseHost, Release, ReleaseAsset, ReleaseHost, Repository};
