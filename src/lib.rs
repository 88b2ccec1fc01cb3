//! # media-dl
//!
//! Resilient file-acquisition backend for media download applications.
//!
//! ## Design Philosophy
//!
//! media-dl is designed to be:
//! - **Resilient** - External accelerator with a streaming HTTP fallback,
//!   retries with exponential backoff, no partial files left behind
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Idempotent** - Re-requesting a file that already exists is a no-op
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_dl::{ArtworkSettings, Config, DownloadRequest, MediaDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = MediaDownloader::new(Config::default())?;
//!
//!     let mut request = DownloadRequest::new(
//!         "https://cdn.example.com/covers/album.jpg",
//!         "music/Artist/Album/cover.jpg",
//!     );
//!     request.progress = true;
//!     request.artwork = Some(ArtworkSettings {
//!         resolution: 1400,
//!         resize: true,
//!         ..Default::default()
//!     });
//!
//!     let outcome = downloader.download(&request).await?;
//!     println!("Download finished: {outcome}");
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// External download accelerator handling
pub mod accelerator;
/// Artwork post-processing
pub mod artwork;
/// Configuration types
pub mod config;
/// Download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Console progress reporting
pub mod progress;
/// Retry logic with exponential backoff
pub mod retry;
/// Session settings persistence
pub mod settings;
/// Streaming HTTP transfer fallback
pub mod stream;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use accelerator::{Accelerator, CliAccelerator, NoOpAccelerator};
pub use config::{AcceleratorConfig, Config, RetryConfig};
pub use downloader::MediaDownloader;
pub use error::{
    AcceleratorError, ArtworkError, Error, Result, SettingsError, TransferError,
};
pub use settings::SettingsStore;
pub use stream::StreamClient;
pub use types::{
    ArtworkFormat, ArtworkSettings, CompressionLevel, DownloadRequest, TransferOutcome,
};
