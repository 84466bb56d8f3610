//! The assembled multi-day result.

use std::time::Duration;

use crate::{DayPlan, Route};

/// One day of the final itinerary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayItinerary {
    /// Time-block schedule.
    pub plan: DayPlan,
    /// Visiting order with statistics.
    pub route: Route,
    /// The day contains at least one pinned event.
    pub has_fixed_schedule: bool,
    /// Non-fatal issues encountered while building the day.
    pub warnings: Vec<String>,
}

/// Complete itinerary handed back to the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItineraryOutput {
    /// Destination the itinerary was planned for.
    pub destination: String,
    /// Days in calendar order.
    pub days: Vec<DayItinerary>,
    /// Distance across all days.
    pub total_distance_km: f64,
    /// Travel plus dwell time across all days.
    #[cfg_attr(feature = "serde", serde(with = "crate::day::duration_secs"))]
    pub total_duration: Duration,
    /// Number of place visits across all days.
    pub total_places: usize,
    /// Trip-level issues that do not belong to a single day.
    pub warnings: Vec<String>,
}

impl ItineraryOutput {
    /// Every warning, trip-level first, then day by day.
    pub fn all_warnings(&self) -> impl Iterator<Item = &str> + '_ {
        self.warnings
            .iter()
            .chain(self.days.iter().flat_map(|day| day.warnings.iter()))
            .map(String::as_str)
    }
}
