//! Booking API client.
//!
//! One `GET` per venue and date; the response lists every field (court) at
//! the venue with its bookable slots for that day.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Per-request timeout for booking API calls.
pub const BOOKING_TIMEOUT: Duration = Duration::from_secs(10);

/// Availability for one venue on one date.
#[derive(Debug, Default, Deserialize)]
pub struct DayAvailability {
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A court at the venue as the booking API reports it.
///
/// Every key may be missing or `null`; a malformed field or slot is skipped
/// on its own instead of failing the whole day.
#[derive(Debug, Default, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub field_name: Option<String>,
    /// How many more slots may be booked on this court today
    #[serde(default)]
    pub total_available_slots: Option<Value>,
    #[serde(default)]
    pub slots: Option<Vec<FieldSlot>>,
}

impl Field {
    /// Booking cap for the day; absent or unreadable counts as zero.
    pub fn available_cap(&self) -> i64 {
        self.total_available_slots
            .as_ref()
            .and_then(integer_value)
            .unwrap_or(0)
    }

    pub fn slots(&self) -> &[FieldSlot] {
        self.slots.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FieldSlot {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub price: Option<Value>,
}

impl FieldSlot {
    pub fn is_available(&self) -> bool {
        self.is_available.unwrap_or(false)
    }

    /// Price in whole currency units.
    ///
    /// Missing or `null` is 0. Floats are rounded and numeric strings are
    /// parsed; anything else yields `None`.
    pub fn price(&self) -> Option<i64> {
        match &self.price {
            None | Some(Value::Null) => Some(0),
            Some(value) => integer_value(value),
        }
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

/// Parse a booking API date value (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse a booking API clock value (`HH:MM:SS`, or `HH:MM`).
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Client for the booking availability endpoint.
#[derive(Debug, Clone)]
pub struct BookingClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl BookingClient {
    /// Create a new booking client.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(BOOKING_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build booking HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: api_url.into(),
        })
    }

    /// Fetch availability for a venue on a date.
    pub async fn day_availability(&self, venue_id: &str, date: NaiveDate) -> Result<DayAvailability> {
        let date_param = date.format("%Y-%m-%d").to_string();

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("venue_id", venue_id), ("date", date_param.as_str())])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Booking API request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Booking API returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse booking response: {}", e)))
    }
}
