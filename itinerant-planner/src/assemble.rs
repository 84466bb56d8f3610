//! Combining routed days into the final itinerary.

use std::time::Duration;

use itinerant_core::{DayItinerary, DayPlan, ItineraryOutput, Route};

/// Everything produced for one day before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct DayParts {
    /// Time-block schedule.
    pub plan: DayPlan,
    /// Ordered route for the day.
    pub route: Route,
    /// Notes raised while planning the day.
    pub warnings: Vec<String>,
}

/// Final aggregation step.
///
/// Copies each route's total time onto its plan as the estimated duration,
/// flags days with pinned events and sums the trip totals. Warnings are
/// carried through unchanged so the caller sees every degradation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItineraryAssembler;

impl ItineraryAssembler {
    /// Assemble `days`, in calendar order, plus trip-level `warnings`.
    #[must_use]
    pub fn assemble(
        destination: impl Into<String>,
        days: Vec<DayParts>,
        warnings: Vec<String>,
    ) -> ItineraryOutput {
        let finished: Vec<DayItinerary> = days
            .into_iter()
            .map(|parts| {
                let mut plan = parts.plan;
                plan.estimated_duration = parts.route.total_duration;
                DayItinerary {
                    has_fixed_schedule: plan.has_fixed(),
                    plan,
                    route: parts.route,
                    warnings: parts.warnings,
                }
            })
            .collect();
        let total_distance_km = finished.iter().map(|d| d.route.total_distance_km).sum();
        let total_duration = finished
            .iter()
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(d.route.total_duration));
        let total_places = finished.iter().map(|d| d.route.visits().count()).sum();
        ItineraryOutput {
            destination: destination.into(),
            days: finished,
            total_distance_km,
            total_duration,
            total_places,
            warnings,
        }
    }
}
