//! Error types for the review sentiment Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing review classification requests.
#[derive(Error, Debug)]
pub enum Error {
    /// The classification API credential could not be retrieved
    #[error("Secret unavailable: {0}")]
    SecretUnavailable(String),

    /// The classification endpoint answered with a non-success status
    #[error("Classification request failed with status {status}: {body}")]
    ClassificationRequestFailed { status: u16, body: String },

    /// The classification response could not be decoded into a result
    #[error("Malformed classification response: {0}")]
    MalformedResponse(String),

    /// Writing a classification result to the store failed
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    /// Missing or empty required input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The batch contained no records eligible for classification
    #[error("No records eligible for classification")]
    NoEligibleRecords,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_) | Error::NoEligibleRecords => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        assert_eq!(Error::InvalidInput("no review text".into()).status_code(), 400);
        assert_eq!(Error::NoEligibleRecords.status_code(), 400);
    }

    #[test]
    fn test_remote_failures_map_to_500() {
        let err = Error::ClassificationRequestFailed {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(Error::SecretUnavailable("gone".into()).status_code(), 500);
        assert_eq!(Error::PersistenceFailed("timeout".into()).status_code(), 500);
        assert_eq!(Error::MalformedResponse("not json".into()).status_code(), 500);
    }
}
