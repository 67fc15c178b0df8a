//! Configuration management for Lambda functions.

use std::env;

use crate::processor::FailurePolicy;

const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "deepseek-r1-distill-llama-70b";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// DynamoDB table receiving classification results
    pub results_table: String,
    /// Name of the secret holding the classification API key
    pub api_key_secret: String,
    /// Chat-completions endpoint URL
    pub api_url: String,
    /// Model identifier sent with each classification request
    pub model: String,
    /// How the batch processor reacts to a failed record
    pub failure_policy: FailurePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            results_table: env::var("RESULTS_TABLE_NAME")?,
            api_key_secret: env::var("API_KEY_SECRET_NAME")
                .unwrap_or_else(|_| "groq-api-key".to_string()),
            api_url: env::var("CLASSIFIER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            model: env::var("CLASSIFIER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            failure_policy: env::var("BATCH_FAILURE_POLICY")
                .map(|v| FailurePolicy::parse(&v))
                .unwrap_or_default(),
        })
    }
}
