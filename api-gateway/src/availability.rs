//! Availability endpoint - `GET /availability`.
//!
//! Query parameters: `locations` (comma separated venue names), `start`,
//! `end` (ISO dates), and optional `earliest`/`latest` (`HH:MM`).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use lambda_http::{Body, Error, Request, RequestExt, Response};
use shared::http::{error_response, json_response};
use shared::{Aggregation, Aggregator, AvailabilityQuery, AvailabilityResponse, TimeWindow, MAX_RANGE_DAYS};
use std::sync::Arc;
use tracing::{error, info};

/// Application state shared across requests.
pub struct AppState {
    pub aggregator: Aggregator,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }
}

/// Lambda entry point; unexpected failures become a 500.
pub async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    match handle(&state, &event).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(error = %e, "Availability error");
            let status = e
                .downcast_ref::<shared::Error>()
                .map(shared::Error::status_code)
                .unwrap_or(500);
            error_response(status, e.to_string())
        }
    }
}

async fn handle(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    let query = match parse_query(event) {
        Ok(query) => query,
        Err(shared::Error::Validation(message)) => return error_response(400, message),
        Err(e) => return Err(e.into()),
    };

    info!(
        locations = ?query.locations,
        start = %query.start_date,
        end = %query.end_date,
        "Fetching availability"
    );

    let Aggregation { slots, unknown } = state
        .aggregator
        .fetch_all(&query.locations, query.start_date, query.end_date, query.window)
        .await?;

    if !unknown.is_empty() && unknown.len() == query.locations.len() {
        return error_response(400, format!("unknown location(s): {}", unknown.join(", ")));
    }

    json_response(200, &AvailabilityResponse { slots })
}

/// Parse and validate the availability query string.
pub fn parse_query(event: &Request) -> shared::Result<AvailabilityQuery> {
    let params = event.query_string_parameters();
    let param = |name: &str| params.first(name).map(str::trim).filter(|v| !v.is_empty());

    let (Some(locations), Some(start), Some(end)) = (
        param("locations").or_else(|| param("location")),
        param("start"),
        param("end"),
    ) else {
        return Err(shared::Error::Validation("missing parameters".to_string()));
    };

    let locations = split_locations(locations);
    if locations.is_empty() {
        return Err(shared::Error::Validation("missing parameters".to_string()));
    }

    let start_date = parse_date("start", start)?;
    let end_date = parse_date("end", end)?;

    if (end_date - start_date).num_days() > MAX_RANGE_DAYS {
        return Err(shared::Error::Validation(format!(
            "max range is {} days",
            MAX_RANGE_DAYS
        )));
    }

    let earliest = param("earliest").map(|v| parse_time("earliest", v)).transpose()?;
    let latest = param("latest").map(|v| parse_time("latest", v)).transpose()?;

    Ok(AvailabilityQuery {
        locations,
        start_date,
        end_date,
        window: TimeWindow::new(earliest, latest),
    })
}

/// Split a comma separated location list, dropping blanks and repeats.
fn split_locations(raw: &str) -> Vec<String> {
    let mut locations: Vec<String> = Vec::new();
    for location in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        if !locations.iter().any(|l| l == location) {
            locations.push(location.to_string());
        }
    }
    locations
}

fn parse_date(name: &str, value: &str) -> shared::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| value.parse::<NaiveDateTime>().map(|dt| dt.date()))
        .map_err(|e| shared::Error::Validation(format!("invalid {} date '{}': {}", name, value, e)))
}

fn parse_time(name: &str, value: &str) -> shared::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| shared::Error::Validation(format!("invalid {} time '{}': {}", name, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request(params: &[(&str, &str)]) -> Request {
        let params: HashMap<String, Vec<String>> = params
            .iter()
            .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
            .collect();
        Request::default().with_query_string_parameters(params)
    }

    fn validation_message(result: shared::Result<AvailabilityQuery>) -> String {
        match result {
            Err(shared::Error::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_full_query() {
        let query = parse_query(&request(&[
            ("locations", " Casablanca, Padel Up ,,Casablanca"),
            ("start", "2025-07-20"),
            ("end", "2025-07-22"),
            ("earliest", "17:00"),
            ("latest", "20:00"),
        ]))
        .unwrap();

        assert_eq!(query.locations, vec!["Casablanca", "Padel Up"]);
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2025, 7, 20).unwrap());
        assert_eq!(query.end_date, NaiveDate::from_ymd_opt(2025, 7, 22).unwrap());
        assert_eq!(query.window.earliest, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(query.window.latest, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
    }

    #[test]
    fn test_location_alias_and_default_window() {
        let query = parse_query(&request(&[
            ("location", "Court 45"),
            ("start", "2025-07-20"),
            ("end", "2025-07-20T09:00:00"),
        ]))
        .unwrap();

        assert_eq!(query.locations, vec!["Court 45"]);
        assert_eq!(query.end_date, query.start_date);
        assert_eq!(query.window, TimeWindow::default());
    }

    #[test]
    fn test_missing_parameters() {
        for params in [
            vec![("start", "2025-07-20"), ("end", "2025-07-21")],
            vec![("locations", "Casablanca"), ("end", "2025-07-21")],
            vec![("locations", "Casablanca"), ("start", "2025-07-20")],
            vec![("locations", " , "), ("start", "2025-07-20"), ("end", "2025-07-21")],
        ] {
            assert_eq!(validation_message(parse_query(&request(&params))), "missing parameters");
        }
    }

    #[test]
    fn test_invalid_values() {
        let message = validation_message(parse_query(&request(&[
            ("locations", "Casablanca"),
            ("start", "20/07/2025"),
            ("end", "2025-07-21"),
        ])));
        assert!(message.starts_with("invalid start date"));

        let message = validation_message(parse_query(&request(&[
            ("locations", "Casablanca"),
            ("start", "2025-07-20"),
            ("end", "2025-07-21"),
            ("latest", "8pm"),
        ])));
        assert!(message.starts_with("invalid latest time"));
    }

    #[test]
    fn test_range_limit() {
        assert!(parse_query(&request(&[
            ("locations", "Casablanca"),
            ("start", "2025-07-01"),
            ("end", "2025-07-29"),
        ]))
        .is_ok());

        let message = validation_message(parse_query(&request(&[
            ("locations", "Casablanca"),
            ("start", "2025-07-01"),
            ("end", "2025-07-30"),
        ])));
        assert_eq!(message, "max range is 28 days");
    }
}
