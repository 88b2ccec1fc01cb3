//! External download accelerator handling
//!
//! This module provides a trait-based architecture for delegating transfers to
//! an external segmented downloader (aria2c). It supports both a CLI-based
//! implementation and a stub implementation for graceful degradation when no
//! accelerator is installed.
//!
//! ## Architecture
//!
//! The core abstraction is the [`Accelerator`] trait, which defines the
//! interface for accelerated transfers. Two implementations are provided:
//!
//! - [`CliAccelerator`]: Spawns an external `aria2c` binary, with a cached
//!   availability probe
//! - [`NoOpAccelerator`]: Stub implementation when no accelerator is available
//!
//! ## Usage
//!
//! ```no_run
//! use media_dl::accelerator::{Accelerator, CliAccelerator};
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Try to find aria2c in PATH
//!     let accelerator = CliAccelerator::from_path().expect("aria2c binary not found");
//!
//!     if accelerator.is_available().await {
//!         accelerator
//!             .fetch(
//!                 "https://cdn.example.com/track.flac",
//!                 Path::new("music/track.flac"),
//!                 &HashMap::new(),
//!             )
//!             .await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

mod cli;
mod noop;
mod traits;

pub use cli::CliAccelerator;
pub use noop::NoOpAccelerator;
pub use traits::Accelerator;
