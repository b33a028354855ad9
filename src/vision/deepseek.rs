//! DeepSeek vision provider

use async_trait::async_trait;

use crate::vision::VisionAnalyzer;
use crate::{Error, Result};

/// Description returned when the service reports no objects
const EMPTY_SCENE_TEXT: &str = "No objects detected";

/// Response from the DeepSeek image analysis endpoint
#[derive(serde::Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    description: Option<String>,
}

/// Scene description via the DeepSeek image analysis API
pub struct DeepSeekVision {
    client: reqwest::Client,
    api_key: String,
}

impl DeepSeekVision {
    /// Create a new DeepSeek vision instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "DeepSeek API key required for vision".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

#[async_trait]
impl VisionAnalyzer for DeepSeekVision {
    async fn analyze(&self, image: &[u8]) -> Result<String> {
        tracing::debug!(image_bytes = image.len(), "starting DeepSeek analysis");

        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(image.to_vec())
                .file_name("image.jpg")
                .mime_str("image/jpeg")
                .map_err(|e| Error::Vision(e.to_string()))?,
        );

        let response = self
            .client
            .post("https://api.deepseek.com/v1/image/analyze")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "DeepSeek request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "DeepSeek API error");
            return Err(Error::Vision(format!(
                "DeepSeek API error {status}: {body}"
            )));
        }

        let result: AnalyzeResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse DeepSeek response");
            e
        })?;

        let text = result
            .description
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| EMPTY_SCENE_TEXT.to_string());

        tracing::info!(text = %text, "analysis complete");
        Ok(text)
    }
}
