//! Shared library for Court Finder Lambda functions.
//!
//! This crate provides configuration, the booking and completion clients, and the
//! availability and analysis logic used by the API Lambdas.

pub mod analysis;
pub mod availability;
pub mod booking;
pub mod completion;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod secrets;

pub use analysis::{AnalysisError, SlotAnalyzer};
pub use availability::{Aggregation, Aggregator, MAX_RANGE_DAYS};
pub use booking::BookingClient;
pub use completion::CompletionClient;
pub use config::{BookingConfig, CompletionConfig, VenueTable};
pub use error::{Error, Result};
pub use models::{AnalysisOutcome, AnalysisRequest, AvailabilityQuery, AvailabilityResponse, Slot, TimeWindow, Venue};
pub use secrets::resolve_completion_api_key;
