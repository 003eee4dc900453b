//! Availability Lambda - Handles the availability endpoint.
//!
//! Looks up open court slots across venues and dates via the booking API.

use api_gateway::availability::{handler, AppState};
use lambda_http::{run, service_fn, Error};
use shared::{Aggregator, BookingConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = BookingConfig::from_env()?;
    info!(venues = config.venues.len(), "Loaded booking configuration");

    let state = Arc::new(AppState::new(Aggregator::from_config(&config)?));

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
