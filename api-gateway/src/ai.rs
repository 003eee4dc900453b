//! AI endpoint - `POST /ai`.
//!
//! Takes `{prompt, slots}` and returns the slots the completion service
//! picked. Analysis failures come back as a 200 with `{error, result: []}`.

use lambda_http::{Body, Error, Request, Response};
use serde_json::{Map, Value};
use shared::http::{error_response, json_response};
use shared::{AnalysisRequest, SlotAnalyzer};
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

/// Application state shared across requests.
pub struct AppState {
    pub analyzer: SlotAnalyzer,
}

impl AppState {
    pub fn new(analyzer: SlotAnalyzer) -> Self {
        Self { analyzer }
    }
}

/// Lambda entry point; unexpected failures become a 500.
pub async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    match handle(&state, &event).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(error = %e, "AI handler error");
            let status = e
                .downcast_ref::<shared::Error>()
                .map(shared::Error::status_code)
                .unwrap_or(500);
            error_response(status, e.to_string())
        }
    }
}

async fn handle(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    let request = analysis_request(parse_body(event.body()));

    if request.validate().is_err() {
        return error_response(400, "missing prompt");
    }

    info!(slots = request.slots.len(), "Analyzing slots");

    let outcome = state.analyzer.analyze(&request).await;
    json_response(200, &outcome)
}

/// Decode the request body into a JSON object.
///
/// The body may be the object itself or a JSON string holding it; anything
/// unreadable is treated as an empty object.
pub fn parse_body(body: &Body) -> Map<String, Value> {
    let value = match serde_json::from_slice::<Value>(body.as_ref()) {
        Ok(Value::String(inner)) => serde_json::from_str(&inner).unwrap_or(Value::Null),
        Ok(value) => value,
        Err(_) => Value::Null,
    };

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// A non-string `prompt` counts as missing; a string one is kept verbatim.
fn analysis_request(mut body: Map<String, Value>) -> AnalysisRequest {
    let prompt = match body.remove("prompt") {
        Some(Value::String(prompt)) => prompt,
        _ => String::new(),
    };

    let slots = match body.remove("slots") {
        Some(Value::Array(slots)) => slots,
        _ => Vec::new(),
    };

    AnalysisRequest { prompt, slots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_body() {
        let body = Body::from(r#"{"prompt": "cheapest", "slots": [{"court": "Court 1"}]}"#);
        let map = parse_body(&body);
        assert_eq!(map["prompt"], "cheapest");
        assert_eq!(map["slots"], json!([{"court": "Court 1"}]));
    }

    #[test]
    fn test_parse_string_encoded_body() {
        let inner = r#"{"prompt": "earliest"}"#;
        let body = Body::from(serde_json::to_string(inner).unwrap());
        assert_eq!(parse_body(&body)["prompt"], "earliest");
    }

    #[test]
    fn test_parse_bad_bodies() {
        assert!(parse_body(&Body::Empty).is_empty());
        assert!(parse_body(&Body::from("{not json")).is_empty());
        assert!(parse_body(&Body::from(r#""{not json""#)).is_empty());
        assert!(parse_body(&Body::from("[1, 2]")).is_empty());
    }

    #[test]
    fn test_analysis_request_defaults() {
        let request = analysis_request(parse_body(&Body::from(r#"{"prompt": "  2 hours tonight "}"#)));
        assert_eq!(request.prompt, "  2 hours tonight ");
        assert!(request.slots.is_empty());
        assert!(request.validate().is_ok());

        let request = analysis_request(parse_body(&Body::from(r#"{"prompt": 42, "slots": "none"}"#)));
        assert!(request.prompt.is_empty());
        assert!(request.slots.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_only_empty_prompt_is_missing() {
        let request = analysis_request(parse_body(&Body::from(r#"{"prompt": "   "}"#)));
        assert_eq!(request.prompt, "   ");
        assert!(request.validate().is_ok());

        let request = analysis_request(parse_body(&Body::from(r#"{"prompt": ""}"#)));
        assert!(request.validate().is_err());

        let request = analysis_request(parse_body(&Body::from(r#"{"slots": []}"#)));
        assert!(request.validate().is_err());
    }
}
