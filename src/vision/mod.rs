//! Vision inference boundary
//!
//! `analyze` takes encoded image bytes and returns a spoken-ready scene
//! description. Providers are remote HTTP services with their own timeout
//! and error semantics; the pipeline treats every failure the same way, so
//! errors here only need to carry enough context to log.

mod deepseek;
mod gemini;

pub use deepseek::DeepSeekVision;
pub use gemini::GeminiVision;

use async_trait::async_trait;

use crate::Result;

/// Describes what a camera frame shows
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Describe the scene in the given encoded image
    ///
    /// # Errors
    ///
    /// Returns error if the provider rejects the request, the transport
    /// fails, or the response cannot be read. Callers map every failure to
    /// the fallback announcement.
    async fn analyze(&self, image: &[u8]) -> Result<String>;
}
