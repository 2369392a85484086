//! Google Gemini backend via the Generative Language REST API.
//!
//! Sends the whole transcript to `POST {base}/models/{model}:generateContent`
//! with the coach persona as the `system_instruction`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::error::CoachError;
use crate::message::{ChatMessage, Role};
use crate::provider::LlmProvider;

/// Default model to use.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL for the Gemini API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Prefix of OpenAI secret keys, which are commonly pasted by mistake.
const OPENAI_KEY_PREFIX: &str = "sk-";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Reject keys that cannot possibly work before any request is made.
pub fn validate_api_key(api_key: Option<&str>) -> Result<&str, CoachError> {
    let key = api_key.map(str::trim).unwrap_or_default();
    if key.is_empty() {
        return Err(CoachError::MissingApiKey);
    }
    if key.starts_with(OPENAI_KEY_PREFIX) {
        return Err(CoachError::InvalidApiKey);
    }
    Ok(key)
}

// ---------------------------------------------------------------------------
// API request/response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiErrorBody>,
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

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

impl GeminiProvider {
    /// Build a provider, validating the key up front.
    pub fn new(config: GeminiConfig) -> Result<Self, CoachError> {
        let api_key = validate_api_key(config.api_key.as_deref())?.to_string();
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request<'a>(system_prompt: &'a str, transcript: &'a [ChatMessage]) -> GeminiRequest<'a> {
        let contents = transcript
            .iter()
            .map(|m| GeminiContent {
                role: Some(match m.role {
                    Role::User => "user",
                    Role::Model => "model",
                }),
                parts: vec![TextPart { text: &m.text }],
            })
            .collect();

        let system_instruction = (!system_prompt.trim().is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![TextPart {
                text: system_prompt,
            }],
        });

        GeminiRequest {
            contents,
            system_instruction,
        }
    }

    /// Pull the reply text out of a successful response body.
    ///
    /// All text parts of the first candidate are concatenated; a candidate
    /// without text yields an empty reply.
    fn extract_reply(body: &str) -> Result<String, CoachError> {
        let response: GeminiResponse =
            serde_json::from_str(body).map_err(|e| CoachError::Parse(e.to_string()))?;

        if let Some(err) = response.error {
            return Err(CoachError::Api {
                status: 200,
                message: err.message,
            });
        }

        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or(CoachError::EmptyResponse)?;

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default())
    }

    /// Turn a non-2xx response into an error, preferring the API's message.
    fn map_api_error(status: u16, body: &str) -> CoachError {
        let message = serde_json::from_str::<GeminiResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| body.to_string(), |e| e.message);
        CoachError::Api { status, message }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip_all, fields(model = %self.model, turns = transcript.len()))]
    async fn complete(
        &self,
        system_prompt: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, CoachError> {
        let request = Self::build_request(system_prompt, transcript);

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &body));
        }

        Self::extract_reply(&body)
    }
}
