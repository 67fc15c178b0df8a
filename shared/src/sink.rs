//! Persists classification results to DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::Utc;

use crate::{Error, Result, SentimentResult};

/// Records classification results keyed by review identifier.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn record(&self, review_id: &str, result: &SentimentResult) -> Result<()>;
}

/// DynamoDB-backed result store.
///
/// A plain `put_item` per review: re-recording the same id overwrites the
/// prior row, so writes are idempotent and concurrent writers last-write-win.
#[derive(Debug, Clone)]
pub struct DynamoResultStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoResultStore {
    pub fn new(client: DynamoClient, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl ResultStore for DynamoResultStore {
    async fn record(&self, review_id: &str, result: &SentimentResult) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("review_id", AttributeValue::S(review_id.to_string()))
            .item("sentiment", AttributeValue::S(result.sentiment.clone()))
            .item(
                "confidence",
                AttributeValue::N(format_confidence(result.confidence)),
            )
            .item(
                "processed_at",
                AttributeValue::N(Utc::now().timestamp().to_string()),
            )
            .send()
            .await
            .map_err(|e| {
                Error::PersistenceFailed(format!("Failed to store result for {}: {}", review_id, e))
            })?;

        Ok(())
    }
}

/// Decimal representation of the confidence score for the number attribute.
///
/// The shortest string that round-trips the value, so the stored decimal
/// reads back as exactly the score the classifier returned.
pub(crate) fn format_confidence(confidence: f64) -> String {
    confidence.to_string()
}
