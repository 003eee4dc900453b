//! Configuration management for Lambda functions.
//!
//! Everything here is read once at cold start and handed to the components
//! that need it; nothing is looked up from the environment per request.

use std::env;

use tracing::warn;

use crate::models::Venue;
use crate::{Error, Result};

/// Default completion service endpoint.
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";

/// Deployed venues: display name, env var holding the booking-API id, courts.
const VENUE_DEFINITIONS: &[(&str, &str, &[&str])] = &[
    (
        "Casablanca",
        "CASABLANCA_ID",
        &["Court 1", "Court 2", "Premier Court 3", "Premier Court 4"],
    ),
    (
        "The Six Point Club",
        "TSPC_ID",
        &["Mazda Court", "Sierra Court", "Fhundred Court"],
    ),
    (
        "Padel Co.",
        "PADELCO_ID",
        &["Pink Court 1", "Blue Court 2", "Blue Court 3", "Blue Court 4"],
    ),
    ("BDG Padel Club", "BPC_ID", &["Bela Court", "Diaz Court"]),
    ("Papadelulu", "PAPADELULU_ID", &["Court 1", "Court 2"]),
    (
        "Padel Up",
        "PADELUP_ID",
        &["Lapang A", "Lapang B", "Lapang C", "Lapang D"],
    ),
    ("Court 45", "COURT45_ID", &["The Court 45"]),
];

/// Venues keyed by display name, in definition order.
#[derive(Debug, Clone, Default)]
pub struct VenueTable {
    venues: Vec<Venue>,
}

impl VenueTable {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues }
    }

    /// Build the deployed table, resolving ids through `lookup`.
    ///
    /// Venues whose id cannot be resolved are left out.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let venues = VENUE_DEFINITIONS
            .iter()
            .filter_map(|&(name, id_var, courts)| match lookup(id_var) {
                Some(id) if !id.trim().is_empty() => Some(Venue::new(name, id.trim(), courts)),
                _ => {
                    warn!(venue = %name, env_var = %id_var, "Venue id not configured, skipping");
                    None
                }
            })
            .collect();

        Self { venues }
    }

    pub fn get(&self, name: &str) -> Option<&Venue> {
        self.venues.iter().find(|v| v.name == name)
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

/// Configuration for the availability endpoint.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Booking API availability URL
    pub api_url: String,
    /// Venues that can be queried
    pub venues: VenueTable,
}

impl BookingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("AYO_URL").map_err(|_| Error::Config("AYO_URL not set".to_string()))?;
        let venues = VenueTable::from_lookup(|var| env::var(var).ok());

        if venues.is_empty() {
            warn!("No venues configured; every location will be unknown");
        }

        Ok(Self { api_url, venues })
    }
}

/// Configuration for the completion service.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// API key, if given directly
    pub api_key: Option<String>,
    /// Secrets Manager ARN holding the key, used when `api_key` is absent
    pub api_key_secret_arn: Option<String>,
}

impl CompletionConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_BASE_URL.to_string()),
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            api_key_secret_arn: env::var("OPENAI_API_KEY_SECRET_ARN").ok(),
        }
    }
}
