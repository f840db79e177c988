//! Model gateway
//!
//! Single point of contact with the hosted generative model. Callers hand
//! over a system instruction, an ordered list of parts and an output
//! contract; the gateway checks the credential, performs exactly one
//! `generateContent` call and returns the raw response text.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::CopyError;
use crate::image::ImagePayload;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of error body characters carried into error messages
const ERROR_BODY_LIMIT: usize = 200;

/// One ordered input part of a model request
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    Image(ImagePayload),
}

/// Shape the model reply must take
#[derive(Debug, Clone, PartialEq)]
pub enum OutputContract {
    FreeText,
    Json { schema: serde_json::Value },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub instructions: String,
    pub parts: Vec<Part>,
    pub output: OutputContract,
    pub params: GenerationParams,
}

impl ModelRequest {
    pub fn has_image(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, Part::Image(_)))
    }
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Invoke the model once and return its raw text reply
    async fn invoke(&self, request: ModelRequest) -> Result<String, CopyError>;
}

// -- Wire types (Gemini generateContent) --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<WireContent<'a>>,
    system_instruction: WireContent<'a>,
    generation_config: WireGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: WireInlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini REST implementation of [`ModelGateway`]
pub struct GeminiGateway {
    client: reqwest::Client,
    config: Config,
    endpoint: String,
}

impl GeminiGateway {
    /// Build a gateway from an injected config.
    ///
    /// A missing API key is not an error here; it is reported when the
    /// gateway is invoked.
    pub fn new(config: Config) -> Result<Self, CopyError> {
        let endpoint = config.validated_endpoint()?;

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                CopyError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!("GeminiGateway created for {} ({})", endpoint, config.model);

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    fn build_request_body(request: &ModelRequest) -> GenerateContentRequest<'_> {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => WirePart::Text {
                    text: text.as_str(),
                },
                Part::Image(image) => WirePart::InlineData {
                    inline_data: WireInlineData {
                        mime_type: &image.mime_type,
                        data: &image.data,
                    },
                },
            })
            .collect();

        let (response_mime_type, response_schema) = match &request.output {
            OutputContract::FreeText => (None, None),
            OutputContract::Json { schema } => (Some("application/json"), Some(schema)),
        };

        GenerateContentRequest {
            contents: vec![WireContent { parts }],
            system_instruction: WireContent {
                parts: vec![WirePart::Text {
                    text: request.instructions.as_str(),
                }],
            },
            generation_config: WireGenerationConfig {
                temperature: request.params.temperature,
                top_p: request.params.top_p,
                response_mime_type,
                response_schema,
            },
        }
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts = &response.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn invoke(&self, request: ModelRequest) -> Result<String, CopyError> {
        let api_key = self.config.api_key()?;
        let api_key_header = HeaderValue::from_str(api_key)
            .map_err(|e| CopyError::Configuration(format!("Invalid API key header: {}", e)))?;

        let url = format!("{}/{}:generateContent", self.endpoint, self.config.model);
        let body = Self::build_request_body(&request);

        info!(
            "Gemini generateContent: model={} parts={} image={} instructions={} chars",
            self.config.model,
            request.parts.len(),
            request.has_image(),
            request.instructions.len()
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header("x-goog-api-key", api_key_header)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                CopyError::Upstream(format!("Gemini API request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Truncate error body to avoid leaking sensitive data
            let truncated: String = error_body.chars().take(ERROR_BODY_LIMIT).collect();
            error!("Gemini API error {}", status);
            return Err(CopyError::Upstream(format!(
                "Gemini API error {}: {}",
                status, truncated
            )));
        }

        let gemini_response: GenerateContentResponse = response.json().await.map_err(|e| {
            CopyError::Upstream(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = Self::extract_text(&gemini_response).ok_or_else(|| {
            CopyError::Upstream("Gemini response contained no text".to_string())
        })?;

        debug!("Gemini response: {} chars", text.len());
        Ok(text)
    }
}
