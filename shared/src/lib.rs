//! Shared library for the review sentiment Lambda functions.
//!
//! This crate provides the classification client, result sink, event model,
//! and batch processing used by the Lambda entry point.

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod processor;
pub mod response;
pub mod secrets;
pub mod sentiment;
pub mod sink;

pub use config::Config;
pub use error::{Error, Result};
pub use events::{ChangeRecord, DirectRequest, Invocation, StreamEvent};
pub use models::{ClassificationOutcome, MutationKind, ReviewRecord, SentimentResult};
pub use processor::{BatchProcessor, BatchSummary, FailurePolicy};
pub use response::{BatchResults, HandlerResponse};
pub use secrets::get_secret;
pub use sentiment::{Classifier, SentimentClient};
pub use sink::{DynamoResultStore, ResultStore};
