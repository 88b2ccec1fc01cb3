//! Trait for external download accelerators

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Trait for accelerated file transfers via an external downloader
///
/// Implementations wrap an external segmented-download tool. Availability is
/// probed lazily and cached: the first [`is_available`](Accelerator::is_available)
/// call may spawn a probe process, later calls answer from the cache until
/// [`invalidate`](Accelerator::invalidate) settles it to unavailable.
///
/// Implementations must tolerate concurrent callers; a redundant probe from
/// two tasks racing on a cold cache is acceptable, re-probing a settled cache
/// is not.
#[async_trait]
pub trait Accelerator: Send + Sync {
    /// Whether the external tool is usable on this system
    ///
    /// The first call probes the binary and caches the verdict; subsequent
    /// calls return the cached value without spawning anything.
    async fn is_available(&self) -> bool;

    /// Fetch `url` into `destination` (directory and filename are derived from
    /// the path), passing `headers` through to the external tool
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be spawned or exits with a failure
    /// status. A zero-byte partial left at `destination` is removed before the
    /// error is returned; non-empty partials are kept for the tool's own
    /// resume handling.
    async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        headers: &HashMap<String, String>,
    ) -> crate::Result<()>;

    /// Settle the cached availability to unavailable
    ///
    /// Used when the binary disappears between the probe and an invocation;
    /// later downloads then skip straight to the streaming fallback.
    fn invalidate(&self);

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
