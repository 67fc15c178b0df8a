//! Batch processing of change-stream events.

use tracing::{info, warn};

use crate::events::StreamEvent;
use crate::models::{ClassificationOutcome, ReviewRecord};
use crate::sentiment::Classifier;
use crate::sink::ResultStore;
use crate::{Error, Result};

/// How the processor reacts when a single record fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failed record aborts the remaining batch.
    #[default]
    AbortBatch,
    /// Failed records are logged and counted; the rest still process.
    SkipFailed,
}

impl FailurePolicy {
    /// Parse a configured policy name; unknown values fall back to abort.
    pub fn parse(value: &str) -> Self {
        match value {
            "continue" => FailurePolicy::SkipFailed,
            _ => FailurePolicy::AbortBatch,
        }
    }
}

/// Aggregated outcome of one batch invocation.
#[derive(Debug)]
pub struct BatchSummary {
    pub results: Vec<ClassificationOutcome>,
    pub skipped: usize,
    pub failed: usize,
}

/// Processes one batch of change records through the classifier and store.
pub struct BatchProcessor<C, S> {
    classifier: C,
    store: S,
    failure_policy: FailurePolicy,
}

impl<C: Classifier, S: ResultStore> BatchProcessor<C, S> {
    pub fn new(classifier: C, store: S, failure_policy: FailurePolicy) -> Self {
        Self {
            classifier,
            store,
            failure_policy,
        }
    }

    /// Classify and persist every eligible record, in arrival order.
    pub async fn process(&self, event: StreamEvent) -> Result<BatchSummary> {
        let mut results = Vec::new();
        let mut skipped = 0usize;
        let mut failed = 0usize;

        for record in &event.records {
            let mutation = record.mutation();
            if !mutation.is_eligible() {
                skipped += 1;
                continue;
            }

            let text = record.review_text();
            if text.is_empty() {
                warn!(event_name = %record.event_name, "Skipping record without review text");
                skipped += 1;
                continue;
            }

            // The identifier keys the stored row; a record without one is
            // malformed input rather than an ineligible record.
            let review = match record.review_id() {
                Some(id) => ReviewRecord {
                    id: id.to_string(),
                    text: text.to_string(),
                    mutation,
                },
                None => {
                    let err = Error::InvalidInput("change record has no review_id".to_string());
                    match self.failure_policy {
                        FailurePolicy::AbortBatch => return Err(err),
                        FailurePolicy::SkipFailed => {
                            warn!(error = %err, "Dropping record without identifier");
                            failed += 1;
                            continue;
                        }
                    }
                }
            };

            match self.classify_and_record(&review).await {
                Ok(outcome) => results.push(outcome),
                Err(e) => match self.failure_policy {
                    FailurePolicy::AbortBatch => return Err(e),
                    FailurePolicy::SkipFailed => {
                        warn!(review_id = %review.id, error = %e, "Record failed; continuing with batch");
                        failed += 1;
                    }
                },
            }
        }

        if results.is_empty() && failed == 0 {
            return Err(Error::NoEligibleRecords);
        }

        info!(
            classified = results.len(),
            skipped, failed, "Batch processing complete"
        );

        Ok(BatchSummary {
            results,
            skipped,
            failed,
        })
    }

    async fn classify_and_record(&self, review: &ReviewRecord) -> Result<ClassificationOutcome> {
        let result = self.classifier.classify(&review.text).await?;

        info!(
            review_id = %review.id,
            sentiment = %result.sentiment,
            confidence = result.confidence,
            "Review classified"
        );

        self.store.record(&review.id, &result).await?;

        Ok(ClassificationOutcome {
            review_id: review.id.clone(),
            review_text: review.text.clone(),
            sentiment: result.sentiment,
            confidence: result.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentResult;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct StubClassifier {
        fail: bool,
    }

    #[async_trait]
    impl Classifier for StubClassifier {
        async fn classify(&self, _text: &str) -> Result<SentimentResult> {
            if self.fail {
                return Err(Error::ClassificationRequestFailed {
                    status: 503,
                    body: "service unavailable".to_string(),
                });
            }
            Ok(SentimentResult {
                sentiment: "positive".to_string(),
                confidence: 0.95,
            })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingStore {
        rows: Arc<Mutex<Vec<(String, SentimentResult)>>>,
        fail: bool,
    }

    #[async_trait]
    impl ResultStore for RecordingStore {
        async fn record(&self, review_id: &str, result: &SentimentResult) -> Result<()> {
            if self.fail {
                return Err(Error::PersistenceFailed("table missing".to_string()));
            }
            self.rows
                .lock()
                .unwrap()
                .push((review_id.to_string(), result.clone()));
            Ok(())
        }
    }

    fn insert_record(id: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "eventName": "INSERT",
            "dynamodb": {"NewImage": {
                "review_id": {"S": id},
                "review_comment_message": {"S": text}
            }}
        })
    }

    fn event(records: Vec<serde_json::Value>) -> StreamEvent {
        serde_json::from_value(serde_json::json!({ "Records": records })).unwrap()
    }

    #[tokio::test]
    async fn test_only_eligible_records_are_processed() {
        let store = RecordingStore::default();
        let rows = store.rows.clone();
        let processor = BatchProcessor::new(
            StubClassifier { fail: false },
            store,
            FailurePolicy::AbortBatch,
        );

        let batch = event(vec![
            insert_record("r1", "ok"),
            serde_json::json!({"eventName": "REMOVE", "dynamodb": {}}),
        ]);
        let summary = processor.process(batch).await.unwrap();

        assert_eq!(summary.results.len(), 1);
        assert_eq!(summary.results[0].review_id, "r1");
        assert_eq!(summary.results[0].review_text, "ok");
        assert_eq!(summary.skipped, 1);
        assert_eq!(rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_has_no_eligible_records() {
        let processor = BatchProcessor::new(
            StubClassifier { fail: false },
            RecordingStore::default(),
            FailurePolicy::AbortBatch,
        );

        let err = processor.process(event(vec![])).await.unwrap_err();
        assert!(matches!(err, Error::NoEligibleRecords));
    }

    #[tokio::test]
    async fn test_records_without_text_are_skipped() {
        let processor = BatchProcessor::new(
            StubClassifier { fail: false },
            RecordingStore::default(),
            FailurePolicy::AbortBatch,
        );

        let batch = event(vec![insert_record("r1", ""), insert_record("r2", "")]);
        let err = processor.process(batch).await.unwrap_err();
        assert!(matches!(err, Error::NoEligibleRecords));
    }

    #[tokio::test]
    async fn test_classifier_failure_aborts_batch_without_writes() {
        let store = RecordingStore::default();
        let rows = store.rows.clone();
        let processor = BatchProcessor::new(
            StubClassifier { fail: true },
            store,
            FailurePolicy::AbortBatch,
        );

        let batch = event(vec![insert_record("r1", "ok"), insert_record("r2", "fine")]);
        let err = processor.process(batch).await.unwrap_err();

        assert!(matches!(
            err,
            Error::ClassificationRequestFailed { status: 503, .. }
        ));
        assert!(rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_skip_failed_policy_continues_past_errors() {
        let store = RecordingStore::default();
        let processor = BatchProcessor::new(
            StubClassifier { fail: true },
            store,
            FailurePolicy::SkipFailed,
        );

        let batch = event(vec![insert_record("r1", "ok"), insert_record("r2", "fine")]);
        let summary = processor.process(batch).await.unwrap();

        assert!(summary.results.is_empty());
        assert_eq!(summary.failed, 2);
    }

    #[tokio::test]
    async fn test_persistence_failure_aborts_batch() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let processor = BatchProcessor::new(
            StubClassifier { fail: false },
            store,
            FailurePolicy::AbortBatch,
        );

        let err = processor
            .process(event(vec![insert_record("r1", "ok")]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PersistenceFailed(_)));
    }

    #[tokio::test]
    async fn test_record_without_id_is_invalid_input() {
        let processor = BatchProcessor::new(
            StubClassifier { fail: false },
            RecordingStore::default(),
            FailurePolicy::AbortBatch,
        );

        let batch = event(vec![serde_json::json!({
            "eventName": "INSERT",
            "dynamodb": {"NewImage": {
                "review_comment_message": {"S": "no id on this one"}
            }}
        })]);
        let err = processor.process(batch).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(FailurePolicy::parse("continue"), FailurePolicy::SkipFailed);
        assert_eq!(FailurePolicy::parse("abort"), FailurePolicy::AbortBatch);
        assert_eq!(FailurePolicy::parse("bogus"), FailurePolicy::AbortBatch);
    }
}
