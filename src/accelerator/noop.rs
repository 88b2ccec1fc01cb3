//! No-op accelerator for graceful degradation

use super::traits::Accelerator;
use crate::error::AcceleratorError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// No-op accelerator used when no external downloader is available
///
/// This handler is used when no aria2c binary is configured or discoverable.
/// It reports itself unavailable without ever spawning a process, so the
/// orchestrator routes every transfer to the streaming fallback.
///
/// # Examples
///
/// ```
/// use media_dl::accelerator::{Accelerator, NoOpAccelerator};
/// use std::collections::HashMap;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let accelerator = NoOpAccelerator;
///
/// assert!(!accelerator.is_available().await);
///
/// let result = accelerator
///     .fetch("https://example.com/f", Path::new("f"), &HashMap::new())
///     .await;
/// assert!(result.is_err());
/// # }
/// ```
pub struct NoOpAccelerator;

#[async_trait]
impl Accelerator for NoOpAccelerator {
    async fn is_available(&self) -> bool {
        false
    }

    async fn fetch(
        &self,
        _url: &str,
        _destination: &Path,
        _headers: &HashMap<String, String>,
    ) -> crate::Result<()> {
        Err(AcceleratorError::Unavailable.into())
    }

    fn invalidate(&self) {}

    fn name(&self) -> &'static str {
        "noop"
    }
}
