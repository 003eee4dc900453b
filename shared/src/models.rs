//! Shared data models.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A physical facility with one or more bookable courts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    /// Display name, also the `locations` key clients send
    pub name: String,
    /// Identifier used by the booking API
    pub venue_id: String,
    /// Courts we surface, in display order
    pub courts: Vec<String>,
}

impl Venue {
    pub fn new(name: impl Into<String>, venue_id: impl Into<String>, courts: &[&str]) -> Self {
        Self {
            name: name.into(),
            venue_id: venue_id.into(),
            courts: courts.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Whether the named court is one we track at this venue.
    pub fn has_court(&self, court: &str) -> bool {
        self.courts.iter().any(|c| c == court)
    }
}

/// A single bookable one-hour court reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub venue: String,
    pub court: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub price: i64,
}

/// Inclusive time-of-day bounds applied to slot start times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub earliest: NaiveTime,
    pub latest: NaiveTime,
}

impl TimeWindow {
    /// Build a window, falling back to the full day for missing bounds.
    pub fn new(earliest: Option<NaiveTime>, latest: Option<NaiveTime>) -> Self {
        let full = Self::default();
        Self {
            earliest: earliest.unwrap_or(full.earliest),
            latest: latest.unwrap_or(full.latest),
        }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.earliest <= time && time <= self.latest
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            earliest: NaiveTime::default(),
            latest: NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default(),
        }
    }
}

/// Availability request payload after query-string parsing.
#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    pub locations: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub window: TimeWindow,
}

/// Availability response payload.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub slots: Vec<Slot>,
}

/// AI analysis request payload.
///
/// Slots are kept as raw JSON records so whatever the client sends is
/// forwarded to the completion service untouched.
#[derive(Debug, Clone, Validate)]
pub struct AnalysisRequest {
    #[validate(length(min = 1, message = "missing prompt"))]
    pub prompt: String,
    pub slots: Vec<serde_json::Value>,
}

/// Result of slot analysis; `error` is present only on degraded outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub result: Vec<serde_json::Value>,
}

impl AnalysisOutcome {
    pub fn success(result: Vec<serde_json::Value>) -> Self {
        Self {
            error: None,
            result,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            result: Vec::new(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
