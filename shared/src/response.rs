//! Response shaping for the Lambda entry point.

use serde::Serialize;

use crate::models::ClassificationOutcome;
use crate::{Error, Result};

/// The `{"statusCode", "body"}` envelope every invocation returns.
///
/// The body is always a JSON-encoded string: the success payload for 200,
/// a diagnostic message otherwise.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

/// Success body for a change-stream batch.
#[derive(Debug, Serialize)]
pub struct BatchResults<'a> {
    pub results: &'a [ClassificationOutcome],
}

impl HandlerResponse {
    /// 200 response carrying the JSON-encoded payload.
    pub fn ok<T: Serialize>(data: &T) -> Result<Self> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(data)?,
        })
    }

    /// Error response carrying the JSON-encoded diagnostic message.
    pub fn from_error(error: &Error) -> Self {
        let status_code = error.status_code();
        let message = if status_code == 400 {
            error.to_string()
        } else {
            format!("Error: {}", error)
        };

        Self {
            status_code,
            body: serde_json::Value::String(message).to_string(),
        }
    }
}
