//! Sentiment classification client for the hosted chat-completions API.

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::secrets::get_secret;
use crate::{Config, Error, Result, SentimentResult};

/// Keeps the model terse and the output parseable.
const SYSTEM_PROMPT: &str = "You are a sentiment classifier for product reviews. \
    Respond with a strict JSON object containing exactly two fields: \
    \"sentiment\" (one of \"positive\", \"negative\", \"neutral\") and \
    \"confidence\" (a number between 0 and 1). Do not include any other text.";

/// Low temperature favors deterministic, well-formed JSON.
const TEMPERATURE: f32 = 0.2;
/// The expected payload is tiny; cap the generation accordingly.
const MAX_TOKENS: u32 = 100;
/// Upper bound on one remote classification call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const VALID_LABELS: [&str; 3] = ["positive", "negative", "neutral"];

/// Classifies review text.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentResult>;
}

/// Chat-completions request payload.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// The outer chat envelope; the message content is itself a JSON string.
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Client for the remote classification endpoint.
#[derive(Debug, Clone)]
pub struct SentimentClient {
    http: reqwest::Client,
    secrets: SecretsClient,
    api_url: String,
    api_key_secret: String,
    model: String,
}

impl SentimentClient {
    /// Create a new classification client.
    pub fn new(secrets: SecretsClient, config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            secrets,
            api_url: config.api_url.clone(),
            api_key_secret: config.api_key_secret.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Classifier for SentimentClient {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let api_key = get_secret(&self.secrets, &self.api_key_secret).await?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Analyze the sentiment of this review: {}", text),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        debug!(model = %self.model, "Sending classification request");

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::ClassificationRequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

/// Decode a raw completion body into a validated result.
fn parse_completion(body: &str) -> Result<SentimentResult> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("invalid completion envelope: {}", e)))?;

    let content = completion
        .choices
        .first()
        .map(|choice| choice.message.content.as_str())
        .ok_or_else(|| Error::MalformedResponse("completion has no choices".to_string()))?;

    parse_content(content)
}

/// Decode the JSON the model emitted inside the chat envelope.
///
/// The model returns its result as free text, so this guards against prose,
/// truncated JSON, and missing fields despite the json_object response hint.
fn parse_content(content: &str) -> Result<SentimentResult> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| Error::MalformedResponse(format!("message content is not JSON: {}", e)))?;

    let sentiment = value
        .get("sentiment")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::MalformedResponse("missing sentiment field".to_string()))?
        .to_lowercase();

    let confidence = value
        .get("confidence")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| Error::MalformedResponse("missing confidence field".to_string()))?;

    if !VALID_LABELS.contains(&sentiment.as_str()) {
        return Err(Error::MalformedResponse(format!(
            "unknown sentiment label: {}",
            sentiment
        )));
    }

    if !(0.0..=1.0).contains(&confidence) {
        return Err(Error::MalformedResponse(format!(
            "confidence out of range: {}",
            confidence
        )));
    }

    Ok(SentimentResult {
        sentiment,
        confidence,
    })
}
