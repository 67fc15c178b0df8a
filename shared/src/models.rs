//! Shared data models.

use serde::{Deserialize, Serialize};

/// How an upstream change-stream record mutated its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Inserted,
    Modified,
    Other,
}

impl MutationKind {
    /// Parse the stream record's event name.
    pub fn from_event_name(name: &str) -> Self {
        match name {
            "INSERT" => MutationKind::Inserted,
            "MODIFY" => MutationKind::Modified,
            _ => MutationKind::Other,
        }
    }

    /// Only inserts and modifications carry review text worth classifying.
    pub fn is_eligible(self) -> bool {
        matches!(self, MutationKind::Inserted | MutationKind::Modified)
    }
}

/// One review extracted from a change event.
#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub id: String,
    pub text: String,
    pub mutation: MutationKind,
}

/// Sentiment label and confidence returned by the classifier.
///
/// Serializes to exactly the direct-invocation success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: String,
    pub confidence: f64,
}

/// Per-record success entry in the batch response.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationOutcome {
    pub review_id: String,
    pub review_text: String,
    pub sentiment: String,
    pub confidence: f64,
}
