//! Slot analysis: asks the completion service to pick slots matching a
//! free-text request.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::completion::{ChatMessage, ChatRequest, CompletionClient, CompletionError};
use crate::models::{AnalysisOutcome, AnalysisRequest};

/// Model used for slot analysis.
pub const ANALYSIS_MODEL: &str = "gpt-4o-mini";
pub const ANALYSIS_TEMPERATURE: f64 = 0.2;
pub const ANALYSIS_MAX_TOKENS: u32 = 800;

const SYSTEM_PROMPT: &str = r#"You are a scheduling assistant for padel courts. Based only on the provided availability data and user request, give clear and logical suggestions. Each slot is 1 hour long.
Only use data provided. If the user asks to book, or asks general questions such as "how to play padel?" or "where is the best court?", return only [].

You can evaluate things like:
- the earliest available slot that fits the user's constraints
- the cheapest slots in the requested period
- back-to-back durations (e.g. 2 or 3 hours): start times n:00 where n:00 and (n+1):00 are both available on the same court

NEVER INVENT DATA. If no valid option is found, return [].

Return **only** a valid JSON list of slot objects like:
[{"court": "Court 1", "venue": "Casablanca", "date": "2025-07-20", "start": "18:00", "price": 250000}]

If nothing matches, return []"#;

/// Failure modes of slot analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("No JSON list found in completion response.")]
    NoJsonFound,

    #[error("Invalid JSON list in completion response: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to encode slot data: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Extract the JSON array spanning the first `[` to the last `]` of a reply.
///
/// Stray brackets in surrounding prose will break this.
pub fn extract_json_list(reply: &str) -> Result<Vec<Value>, AnalysisError> {
    let reply = reply.trim();
    let (Some(start), Some(end)) = (reply.find('['), reply.rfind(']')) else {
        return Err(AnalysisError::NoJsonFound);
    };
    if end < start {
        return Err(AnalysisError::NoJsonFound);
    }

    serde_json::from_str(&reply[start..=end]).map_err(AnalysisError::Parse)
}

/// Build the two-message exchange sent to the completion service.
pub fn build_chat_request(prompt: &str, slots: &[Value]) -> Result<ChatRequest, AnalysisError> {
    let data = serde_json::to_string(slots).map_err(AnalysisError::Encode)?;

    Ok(ChatRequest {
        model: ANALYSIS_MODEL.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("User Prompt: {}\n\nAvailable Data: {}", prompt, data)),
        ],
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens: ANALYSIS_MAX_TOKENS,
    })
}

/// Runs slot analysis against the completion service.
pub struct SlotAnalyzer {
    client: CompletionClient,
}

impl SlotAnalyzer {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Analyze slots for a prompt; failures degrade to an empty result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        match self.try_analyze(request).await {
            Ok(result) => {
                info!(matches = result.len(), "Slot analysis complete");
                AnalysisOutcome::success(result)
            }
            Err(e) => {
                error!(error = %e, "Slot analysis failed");
                AnalysisOutcome::failure(e.to_string())
            }
        }
    }

    async fn try_analyze(&self, request: &AnalysisRequest) -> Result<Vec<Value>, AnalysisError> {
        let chat = build_chat_request(&request.prompt, &request.slots)?;
        let reply = self.client.complete(&chat).await?;
        extract_json_list(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_plain_array() {
        let result = extract_json_list(r#"[{"court": "Court 1", "start": "18:00"}]"#).unwrap();
        assert_eq!(result, vec![json!({"court": "Court 1", "start": "18:00"})]);
    }

    #[test]
    fn test_extract_from_prose() {
        let reply = "Here you go:\n```json\n[{\"court\": \"Court 2\", \"price\": 100}]\n```\nEnjoy!";
        let result = extract_json_list(reply).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["price"], 100);
    }

    #[test]
    fn test_extract_empty_array() {
        let result = extract_json_list("I cannot book, here is nothing: []").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_extract_without_brackets() {
        let err = extract_json_list("Sorry, no courts are free.").unwrap_err();
        assert!(matches!(err, AnalysisError::NoJsonFound));
        assert!(err.to_string().starts_with("No JSON list found"));
    }

    #[test]
    fn test_extract_reversed_brackets() {
        assert!(matches!(
            extract_json_list("] nothing ["),
            Err(AnalysisError::NoJsonFound)
        ));
    }

    #[test]
    fn test_extract_malformed() {
        assert!(matches!(
            extract_json_list("[{\"court\": }]"),
            Err(AnalysisError::Parse(_))
        ));
    }

    #[test]
    fn test_extract_spans_stray_brackets() {
        // First `[` to last `]` swallows the note, so parsing fails.
        let reply = "[note] then [{\"court\": \"Court 1\"}]";
        assert!(matches!(extract_json_list(reply), Err(AnalysisError::Parse(_))));
    }

    #[test]
    fn test_build_chat_request() {
        let slots = vec![json!({"court": "Court 1", "start": "18:00:00"})];
        let request = build_chat_request("cheapest tonight", &slots).unwrap();

        assert_eq!(request.model, ANALYSIS_MODEL);
        assert_eq!(request.max_tokens, 800);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[0].content.contains("NEVER INVENT DATA"));
        assert_eq!(
            request.messages[1].content,
            "User Prompt: cheapest tonight\n\nAvailable Data: [{\"court\":\"Court 1\",\"start\":\"18:00:00\"}]"
        );
    }
}
