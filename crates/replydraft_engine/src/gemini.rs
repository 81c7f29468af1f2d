use std::time::Duration;

use replydraft_core::{clean_reply, GenerationRequest, EMPTY_REPLY_ERROR};
use replydraft_logging::{draft_debug, draft_warn};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::prompt::{build_batch_prompt, build_reply_prompt};
use crate::{BatchReply, FailureKind, GenerationError, Generator};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            temperature: 0.9,
            top_p: 1.0,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationParams,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct WireBatchReply {
    id: serde_json::Value,
    reply: String,
}

/// `Generator` backed by the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    settings: GeminiSettings,
    client: reqwest::Client,
}

impl GeminiGenerator {
    pub fn new(settings: GeminiSettings) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GenerationError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn api_key(&self) -> Result<&str, GenerationError> {
        self.settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::new(
                    FailureKind::MissingApiKey,
                    "no API key configured (set GEMINI_API_KEY)",
                )
            })
    }

    /// Sends one prompt and returns the model's text.
    async fn complete(
        &self,
        prompt: &str,
        response_mime_type: Option<&'static str>,
    ) -> Result<String, GenerationError> {
        let api_key = self.api_key()?;
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationParams {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                response_mime_type,
            },
        };
        let body = serde_json::to_vec(&body)
            .map_err(|err| GenerationError::new(FailureKind::MalformedResponse, err.to_string()))?;

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.to_string());
            draft_warn!("Gemini returned {}: {}", status, message);
            return Err(GenerationError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|err| GenerationError::new(FailureKind::MalformedResponse, err.to_string()))?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if clean_reply(&text).is_empty() {
            return Err(GenerationError::new(
                FailureKind::EmptyResponse,
                EMPTY_REPLY_ERROR,
            ));
        }
        draft_debug!("Gemini returned {} chars", text.len());
        Ok(text)
    }
}

#[async_trait::async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let prompt = build_reply_prompt(request);
        self.complete(&prompt, None).await
    }

    async fn generate_batch(
        &self,
        requests: &[GenerationRequest],
    ) -> Result<Vec<BatchReply>, GenerationError> {
        let prompt = build_batch_prompt(requests);
        let text = self.complete(&prompt, Some("application/json")).await?;
        parse_batch_replies(&text)
    }
}

/// Parses the JSON array a combined call returns. Entries whose id cannot be
/// read are skipped, which later surfaces as a missing reply for that draft.
pub fn parse_batch_replies(text: &str) -> Result<Vec<BatchReply>, GenerationError> {
    let wire: Vec<WireBatchReply> = serde_json::from_str(text.trim())
        .map_err(|err| GenerationError::new(FailureKind::MalformedResponse, err.to_string()))?;
    Ok(wire
        .into_iter()
        .filter_map(|entry| {
            let draft_id = match &entry.id {
                serde_json::Value::Number(number) => number.as_u64(),
                serde_json::Value::String(text) => text.trim().parse().ok(),
                _ => None,
            }?;
            Some(BatchReply {
                draft_id,
                text: entry.reply,
            })
        })
        .collect())
}

fn map_reqwest_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        return GenerationError::new(FailureKind::Timeout, err.to_string());
    }
    GenerationError::new(FailureKind::Network, err.to_string())
}
