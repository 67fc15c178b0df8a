//! Inbound invocation payloads.
//!
//! The function is wired up two ways: directly with a bare review text, or as
//! the consumer of a DynamoDB change stream. Both shapes arrive through the
//! same entry point, so the payload is an untagged union tried stream-first;
//! anything that is not a stream batch falls through to the direct shape.

use serde::Deserialize;
use std::collections::HashMap;

use crate::models::MutationKind;

/// Stream attribute holding the review identifier.
const REVIEW_ID_ATTR: &str = "review_id";
/// Stream attribute holding the review body.
const REVIEW_TEXT_ATTR: &str = "review_comment_message";

/// The two payload shapes the function accepts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Invocation {
    Stream(StreamEvent),
    Direct(DirectRequest),
}

/// Direct-invocation payload.
#[derive(Debug, Deserialize)]
pub struct DirectRequest {
    #[serde(default)]
    pub review_text: Option<String>,
}

/// One batch of change-stream records.
#[derive(Debug, Deserialize)]
pub struct StreamEvent {
    #[serde(rename = "Records")]
    pub records: Vec<ChangeRecord>,
}

/// A single change-stream record.
#[derive(Debug, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: String,
    #[serde(default)]
    pub dynamodb: StreamData,
}

/// The stream projection of the mutated row.
#[derive(Debug, Default, Deserialize)]
pub struct StreamData {
    #[serde(rename = "NewImage", default)]
    pub new_image: HashMap<String, AttributeProjection>,
}

/// A projected attribute value; only string attributes are read here.
#[derive(Debug, Deserialize)]
pub struct AttributeProjection {
    #[serde(rename = "S")]
    pub s: Option<String>,
}

impl ChangeRecord {
    pub fn mutation(&self) -> MutationKind {
        MutationKind::from_event_name(&self.event_name)
    }

    fn string_attr(&self, name: &str) -> Option<&str> {
        self.dynamodb.new_image.get(name).and_then(|attr| attr.s.as_deref())
    }

    /// The review identifier, if present and non-empty.
    pub fn review_id(&self) -> Option<&str> {
        self.string_attr(REVIEW_ID_ATTR).filter(|id| !id.is_empty())
    }

    /// The review body; empty when the projection carries no text.
    pub fn review_text(&self) -> &str {
        self.string_attr(REVIEW_TEXT_ATTR).unwrap_or("")
    }
}
