//! Availability aggregation across venues and dates.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::booking::{parse_clock, parse_date, BookingClient, DayAvailability};
use crate::config::{BookingConfig, VenueTable};
use crate::models::{Slot, TimeWindow, Venue};
use crate::{Error, Result};

/// Longest date span (end minus start, in days) a single request may cover.
pub const MAX_RANGE_DAYS: i64 = 28;

/// Slots gathered for several locations, plus the names that matched no venue.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub slots: Vec<Slot>,
    pub unknown: Vec<String>,
}

/// Collects filtered slots from the booking API.
pub struct Aggregator {
    booking: BookingClient,
    venues: VenueTable,
}

impl Aggregator {
    pub fn new(booking: BookingClient, venues: VenueTable) -> Self {
        Self { booking, venues }
    }

    /// Build an aggregator from loaded configuration.
    pub fn from_config(config: &BookingConfig) -> Result<Self> {
        Ok(Self::new(
            BookingClient::new(config.api_url.clone())?,
            config.venues.clone(),
        ))
    }

    /// Fetch available slots for one location over `[start, end]`.
    ///
    /// A failed booking API call only drops that date's slots.
    pub async fn fetch(
        &self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
        window: TimeWindow,
    ) -> Result<Vec<Slot>> {
        let venue = self
            .venues
            .get(location)
            .ok_or_else(|| Error::UnknownLocation(location.to_string()))?;

        let mut slots = Vec::new();

        for date in start.iter_days().take_while(|d| *d <= end) {
            match self.booking.day_availability(&venue.venue_id, date).await {
                Ok(day) => slots.extend(filter_day(venue, date, &day, window)),
                Err(e) => {
                    warn!(location = %location, date = %date, error = %e, "Failed to fetch availability");
                }
            }
        }

        info!(location = %location, count = slots.len(), "Collected slots");
        Ok(slots)
    }

    /// Fetch each location in turn and concatenate the results in request order.
    ///
    /// Unknown locations are skipped and reported in [`Aggregation::unknown`].
    pub async fn fetch_all(
        &self,
        locations: &[String],
        start: NaiveDate,
        end: NaiveDate,
        window: TimeWindow,
    ) -> Result<Aggregation> {
        let mut aggregation = Aggregation::default();

        for location in locations {
            match self.fetch(location, start, end, window).await {
                Ok(slots) => aggregation.slots.extend(slots),
                Err(Error::UnknownLocation(name)) => {
                    warn!(location = %name, "Unknown location requested");
                    aggregation.unknown.push(name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(aggregation)
    }
}

/// Select the slots of one venue-day that pass the court, window and cap rules.
///
/// A slot with an unreadable date, time or price is skipped on its own.
pub fn filter_day(venue: &Venue, date: NaiveDate, day: &DayAvailability, window: TimeWindow) -> Vec<Slot> {
    let mut slots = Vec::new();

    for field in &day.fields {
        let Some(court) = field.field_name.as_deref() else {
            continue;
        };
        let mut remaining = field.available_cap();
        if !venue.has_court(court) || remaining <= 0 {
            continue;
        }

        for slot in field.slots() {
            if remaining <= 0 {
                break;
            }
            if !slot.is_available() {
                continue;
            }

            let slot_date = match slot.date.as_deref() {
                None => date,
                Some(raw) => match parse_date(raw) {
                    Some(parsed) => parsed,
                    None => {
                        warn!(venue = %venue.name, court = %court, slot_date = %raw, "Skipping slot with unreadable date");
                        continue;
                    }
                },
            };
            if slot_date != date {
                debug!(venue = %venue.name, date = %date, slot_date = %slot_date, "Skipping slot for another date");
                continue;
            }

            let start_time = slot.start_time.as_deref().unwrap_or_default();
            let end_time = slot.end_time.as_deref().unwrap_or_default();
            let (Some(start), Some(end)) = (parse_clock(start_time), parse_clock(end_time)) else {
                warn!(
                    venue = %venue.name,
                    court = %court,
                    start_time = %start_time,
                    end_time = %end_time,
                    "Skipping slot with unreadable times"
                );
                continue;
            };

            if !window.contains(start) {
                continue;
            }

            let Some(price) = slot.price() else {
                warn!(venue = %venue.name, court = %court, price = ?slot.price, "Skipping slot with unreadable price");
                continue;
            };

            slots.push(Slot {
                date: slot_date,
                venue: venue.name.clone(),
                court: court.to_string(),
                start,
                end,
                price,
            });
            remaining -= 1;
        }
    }

    slots
}
