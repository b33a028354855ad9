//! Gemini vision provider

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::vision::VisionAnalyzer;
use crate::{Error, Result};

/// Description returned when the model has nothing to say about the frame
const EMPTY_SCENE_TEXT: &str = "No objects detected";

/// Request body for `models/{model}:generateContent`
#[derive(serde::Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(serde::Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
enum Part<'a> {
    InlineData(InlineData),
    Text(&'a str),
}

#[derive(serde::Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(serde::Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(serde::Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(serde::Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Scene description via the Gemini `generateContent` API
pub struct GeminiVision {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiVision {
    /// Create a new Gemini vision instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "Gemini API key required for vision".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl VisionAnalyzer for GeminiVision {
    async fn analyze(&self, image: &[u8]) -> Result<String> {
        tracing::debug!(image_bytes = image.len(), model = %self.model, "starting Gemini analysis");

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData(InlineData {
                        mime_type: "image/jpeg",
                        data: BASE64.encode(image),
                    }),
                    Part::Text("Briefly describe what this image shows, for a blind user."),
                ],
            }],
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Gemini API error");
            return Err(Error::Vision(format!("Gemini API error {status}: {body}")));
        }

        let result: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Gemini response");
            e
        })?;

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| EMPTY_SCENE_TEXT.to_string());

        tracing::info!(text = %text, "analysis complete");
        Ok(text)
    }
}
