//! Task-name suggestions from the Gemini `generateContent` API.
//!
//! The client asks for a JSON object `{ "suggestions": [...] }` and hands back
//! at most [`MAX_SUGGESTIONS`] trimmed phrases. An empty answer is a normal
//! outcome; a missing key, a failed call or a response that is not JSON are
//! reported as [`SuggestionError`].
//!
//! Requests are not cancellable, so [`SuggestionTracker`] hands out a ticket
//! per request and only the newest ticket may deliver its result.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("enter a topic to get suggestions")]
    EmptyTopic,
    #[error("AI suggestions are not configured (no API key)")]
    MissingCredential,
    #[error("failed to reach the AI service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("AI service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI service returned an unreadable response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionClient {
    http: Client,
    config: SuggestionConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl SuggestionClient {
    pub fn new(config: SuggestionConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub async fn suggest(&self, topic: &str) -> Result<Vec<String>, SuggestionError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(SuggestionError::EmptyTopic);
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SuggestionError::MissingCredential)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt(topic) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                temperature: 0.7,
            },
        };

        debug!(model = %self.config.model, "requesting task suggestions");
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("suggestion request failed with {status}");
            return Err(SuggestionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|err| SuggestionError::InvalidResponse(err.to_string()))?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        parse_suggestions(&text)
    }
}

fn prompt(topic: &str) -> String {
    format!(
        "The user wants to work on \"{topic}\". Suggest 3 to 5 specific, actionable tasks \
         that would help them get started. Keep each task to a short phrase."
    )
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING", "description": "A short, actionable task." }
            }
        }
    })
}

/// Extracts the suggestion list from the model's JSON text.
pub fn parse_suggestions(text: &str) -> Result<Vec<String>, SuggestionError> {
    let text = text.trim();
    if text.is_empty() {
        warn!("AI service returned an empty response");
        return Ok(Vec::new());
    }

    let value: Value =
        serde_json::from_str(text).map_err(|err| SuggestionError::InvalidResponse(err.to_string()))?;
    let Some(items) = value.get("suggestions").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect())
}

/// Hands out request tickets; only the latest one is still current.
#[derive(Debug, Default)]
pub struct SuggestionTracker {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl SuggestionTracker {
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidates every outstanding ticket.
    pub fn dismiss(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
