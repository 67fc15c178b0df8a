//! Review Sentiment Lambda - classifies review text and stores the results.
//!
//! Accepts two invocation shapes:
//! - direct: `{"review_text": "..."}`, classification returned inline
//! - change stream: a DynamoDB stream batch; every inserted or modified
//!   review is classified and persisted to the results table

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use shared::{
    BatchProcessor, BatchResults, Classifier, Config, DirectRequest, DynamoResultStore,
    FailurePolicy, HandlerResponse, Invocation, SentimentClient,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Clients and configuration built once per cold start.
struct AppState {
    classifier: SentimentClient,
    store: DynamoResultStore,
    failure_policy: FailurePolicy,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config =
            Config::from_env().map_err(|e| format!("Incomplete configuration: {}", e))?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);
        let dynamo_client = aws_sdk_dynamodb::Client::new(&aws_config);

        let classifier = SentimentClient::new(secrets_client, &config)
            .map_err(|e| format!("Failed to build classification client: {}", e))?;
        let store = DynamoResultStore::new(dynamo_client, config.results_table.clone());

        Ok(Self {
            classifier,
            store,
            failure_policy: config.failure_policy,
        })
    }
}

async fn classify_direct(
    state: &AppState,
    request: DirectRequest,
) -> shared::Result<HandlerResponse> {
    let text = request
        .review_text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| shared::Error::InvalidInput("No review text found in event".to_string()))?;

    let result = state.classifier.classify(&text).await?;
    HandlerResponse::ok(&result)
}

async fn process_invocation(
    state: &AppState,
    invocation: Invocation,
) -> shared::Result<HandlerResponse> {
    match invocation {
        Invocation::Stream(event) => {
            info!(record_count = event.records.len(), "Received change-stream batch");

            let processor = BatchProcessor::new(
                state.classifier.clone(),
                state.store.clone(),
                state.failure_policy,
            );
            let summary = processor.process(event).await?;

            HandlerResponse::ok(&BatchResults {
                results: &summary.results,
            })
        }
        Invocation::Direct(request) => {
            info!("Received direct classification request");
            classify_direct(state, request).await
        }
    }
}

/// Single recovery point: every inner error becomes a structured response,
/// never a failed invocation.
async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<Invocation>,
) -> Result<HandlerResponse, Error> {
    match process_invocation(&state, event.payload).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(error = %e, "Invocation failed");
            Ok(HandlerResponse::from_error(&e))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);
    let state_clone = state.clone();

    run(service_fn(move |event| {
        let state = state_clone.clone();
        async move { handler(state, event).await }
    }))
    .await
}
