//! Gemini (Google) image editing provider.

use crate::error::{parse_retry_after, sanitize_error_message, RestyleError, Result};
use crate::image::editor::ImageEditor;
use crate::image::types::{ImagePayload, TransformedImage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default endpoint for the Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Gemini image model variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 2.5 Flash Image (fast, economical).
    #[default]
    FlashImage,
    /// Gemini 3 Pro Image (highest quality).
    ProImage,
    /// Any other image-capable model identifier.
    Custom(String),
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FlashImage => "gemini-2.5-flash-image",
            Self::ProImage => "gemini-3-pro-image-preview",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for GeminiModel {
    fn from(name: &str) -> Self {
        match name {
            "flash" | "gemini-2.5-flash-image" => Self::FlashImage,
            "pro" | "gemini-3-pro-image-preview" => Self::ProImage,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Builder for [`GeminiEditor`].
#[derive(Debug, Clone, Default)]
pub struct GeminiEditorBuilder {
    api_key: Option<String>,
    model: GeminiModel,
    base_url: Option<String>,
    client: Option<reqwest::Client>,
}

impl GeminiEditorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GEMINI_API_KEY`, then `API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: impl Into<GeminiModel>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the API endpoint (proxies, tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Uses a preconfigured HTTP client instead of a default one.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the editor, resolving the API key.
    pub fn build(self) -> Result<GeminiEditor> {
        let api_key = self
            .api_key
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            })
            .ok_or_else(|| {
                RestyleError::Auth("GEMINI_API_KEY not set and no API key provided".into())
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(GeminiEditor {
            client: self.client.unwrap_or_default(),
            api_key,
            model: self.model,
            base_url,
        })
    }
}

/// Gemini image editing provider.
pub struct GeminiEditor {
    client: reqwest::Client,
    api_key: String,
    model: GeminiModel,
    base_url: String,
}

impl std::fmt::Debug for GeminiEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEditor")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiEditor {
    /// Creates a new `GeminiEditorBuilder`.
    pub fn builder() -> GeminiEditorBuilder {
        GeminiEditorBuilder::new()
    }

    /// Checks that the key is accepted and the model exists.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/v1beta/models/{}", self.base_url, self.model.as_str());

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(RestyleError::Auth("Invalid API key".into())),
            404 => Err(RestyleError::InvalidRequest(
                "Model not found. Verify the model name is correct.".into(),
            )),
            s if !(200..300).contains(&s) => Err(RestyleError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }

    async fn edit_impl(
        &self,
        image: &ImagePayload,
        instruction: &str,
    ) -> Result<Option<TransformedImage>> {
        let start = Instant::now();

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            self.model.as_str(),
        );

        let body = GeminiRequest::new(image, instruction);

        tracing::debug!(
            model = self.model.as_str(),
            mime_type = image.mime_type(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_else(|e| {
                tracing::debug!("failed to read error body: {e}");
                String::new()
            });
            return Err(parse_error(status.as_u16(), &text, &headers));
        }

        let text = response.text().await?;
        let gemini_response: GeminiResponse = serde_json::from_str(&text).map_err(|e| {
            RestyleError::UnexpectedResponse(format!(
                "{e}: {}",
                sanitize_error_message(&text)
            ))
        })?;

        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "received generateContent response"
        );

        Ok(gemini_response.into_first_image())
    }
}

#[async_trait]
impl ImageEditor for GeminiEditor {
    async fn edit(
        &self,
        image: &ImagePayload,
        instruction: &str,
    ) -> Result<Option<TransformedImage>> {
        self.edit_impl(image, instruction).await
    }

    fn model(&self) -> &str {
        self.model.as_str()
    }
}

fn parse_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> RestyleError {
    let message = extract_error_message(text);
    if status == 401 || status == 403 {
        return RestyleError::Auth(message);
    }
    if status == 404 {
        return RestyleError::InvalidRequest(format!("Model not found: {message}"));
    }
    if status == 429 {
        let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
        return RestyleError::RateLimited { retry_after };
    }
    RestyleError::Api { status, message }
}

/// Pulls `error.message` out of a Google API error body, falling back to the raw text.
fn extract_error_message(text: &str) -> String {
    let message = serde_json::from_str::<GeminiErrorResponse>(text)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| text.to_string());
    sanitize_error_message(&message)
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiRequestPart<'a>>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<&'static str>,
}

impl<'a> GeminiRequest<'a> {
    /// Image part first, then the instruction.
    fn new(image: &'a ImagePayload, instruction: &'a str) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: image.mime_type(),
                    data: image.data(),
                },
            },
            GeminiRequestPart::Text { text: instruction },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GeminiResponse {
    /// Returns the first inline image among the first candidate's parts.
    fn into_first_image(self) -> Option<TransformedImage> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            tracing::warn!(%reason, "prompt blocked");
            return None;
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            tracing::warn!("no candidates in response");
            return None;
        };

        let finish_reason = candidate.finish_reason;
        let Some(content) = candidate.content else {
            tracing::warn!(?finish_reason, "candidate has no content");
            return None;
        };

        for part in content.parts {
            if let Some(inline) = part.inline_data {
                return Some(TransformedImage::new(inline.mime_type, inline.data));
            }
            if let Some(text) = part.text {
                tracing::debug!(%text, "skipping text part");
            }
        }

        tracing::warn!(?finish_reason, "candidate has no inline image");
        None
    }
}
