//! AI Lambda - Handles the AI slot-suggestion endpoint.
//!
//! Forwards the user's prompt and slot list to the completion service and
//! returns the slots it picked.

use api_gateway::ai::{handler, AppState};
use lambda_http::{run, service_fn, Error};
use shared::{resolve_completion_api_key, CompletionClient, CompletionConfig, SlotAnalyzer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = CompletionConfig::from_env();
    let api_key = resolve_completion_api_key(&config).await?;
    let client = CompletionClient::new(&config.base_url, api_key);

    let state = Arc::new(AppState::new(SlotAnalyzer::new(client)));

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
