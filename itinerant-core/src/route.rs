//! Ordered visiting sequence for one day.

use std::time::Duration;

use geo::Coord;

use crate::Place;

/// A stop on a route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum RouteStop {
    /// Synthetic starting point, e.g. the traveller's arrival city.
    Departure {
        /// Text the location was resolved from.
        label: String,
        /// Resolved position.
        location: Coord<f64>,
    },
    /// A real place.
    Visit(Place),
}

impl RouteStop {
    /// Usable position of the stop, if any.
    #[must_use]
    pub fn location(&self) -> Option<Coord<f64>> {
        match self {
            Self::Departure { location, .. } => Some(*location),
            Self::Visit(place) => place.valid_location(),
        }
    }

    /// Display label.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Departure { label, .. } => label,
            Self::Visit(place) => &place.name,
        }
    }

    /// The visited place, or `None` for the departure point.
    #[must_use]
    pub const fn place(&self) -> Option<&Place> {
        match self {
            Self::Departure { .. } => None,
            Self::Visit(place) => Some(place),
        }
    }
}

/// Hop between two consecutive stops.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Index of the origin stop in [`Route::stops`].
    pub from: usize,
    /// Index of the destination stop in [`Route::stops`].
    pub to: usize,
    /// Great-circle distance; zero when either end lacks coordinates.
    pub distance_km: f64,
    /// Estimated travel time.
    #[cfg_attr(feature = "serde", serde(with = "crate::day::duration_secs"))]
    pub travel: Duration,
}

/// Ordered stops for one day with segment and aggregate statistics.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Stops in visiting order.
    pub stops: Vec<RouteStop>,
    /// One segment per consecutive pair of stops.
    pub segments: Vec<Segment>,
    /// Sum of segment distances.
    pub total_distance_km: f64,
    /// Sum of segment travel times.
    #[cfg_attr(feature = "serde", serde(with = "crate::day::duration_secs"))]
    pub travel_duration: Duration,
    /// Time spent at places.
    #[cfg_attr(feature = "serde", serde(with = "crate::day::duration_secs"))]
    pub dwell_duration: Duration,
    /// Travel plus dwell.
    #[cfg_attr(feature = "serde", serde(with = "crate::day::duration_secs"))]
    pub total_duration: Duration,
}

impl Route {
    /// Visited places in order, skipping the departure point.
    pub fn visits(&self) -> impl Iterator<Item = &Place> + '_ {
        self.stops.iter().filter_map(RouteStop::place)
    }

    /// Number of stops including any departure point.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Report whether the route has no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Report whether the route starts from a synthetic departure point.
    #[must_use]
    pub fn has_departure(&self) -> bool {
        matches!(self.stops.first(), Some(RouteStop::Departure { .. }))
    }
}
