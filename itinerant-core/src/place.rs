//! Places that can appear on an itinerary.

use chrono::{NaiveDateTime, TimeDelta};
use geo::Coord;

use crate::distance::is_valid_coord;

/// Enrichment signals attached to a place by the candidate data provider.
///
/// Every flag defaults to `false`; the scorer reads them as presence signals
/// and never fails when they are missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Enrichment {
    /// The provider ran its enrichment pass over this place.
    pub enriched: bool,
    /// Structured opening hours are available.
    pub has_opening_hours: bool,
    /// At least one photo is available.
    pub has_photo: bool,
    /// Parking is available on site or nearby.
    pub has_parking: bool,
    /// The entrance is step-free or otherwise accessible.
    pub accessible: bool,
    /// A public transit stop is within walking distance.
    pub near_transit: bool,
    /// Free-text highlight or review excerpt.
    pub highlight: Option<String>,
}

/// A location that may be visited on the trip.
///
/// Places come either from the candidate pool or from the traveller's own
/// anchor selections. Coordinates are WGS84 with `x = longitude` and
/// `y = latitude`; they may be missing or malformed, in which case distance
/// calculations treat the place as a zero-length hop.
///
/// # Examples
/// ```
/// use itinerant_core::Place;
///
/// let place = Place::new("p-1", "Gyeongbokgung Palace", "palace")
///     .at(37.5796, 126.9770)
///     .with_rating(4.7)
///     .with_quality(0.9);
///
/// assert_eq!(place.id.as_deref(), Some("p-1"));
/// assert!(place.valid_location().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Place {
    /// Stable provider identifier, when known.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Free-form category label, e.g. `"museum"` or `"korean restaurant"`.
    pub category: String,
    /// Geospatial position.
    pub location: Option<Coord<f64>>,
    /// Postal address as supplied by the provider.
    pub address: Option<String>,
    /// Average user rating on a five-point scale.
    pub rating: Option<f32>,
    /// Provider-computed quality in `0.0..=1.0`.
    pub quality_score: f32,
    /// Relevance score assigned by a [`Scorer`](crate::Scorer).
    pub score: f32,
    /// Price tier, `1` being cheapest.
    pub price_tier: Option<u8>,
    /// The traveller picked this place explicitly.
    pub is_user_selected: bool,
    /// The place is pinned to [`Place::fixed_time`] and must not be reordered.
    pub is_fixed: bool,
    /// Pinned start time for fixed places.
    pub fixed_time: Option<NaiveDateTime>,
    /// End of the pinned window, when known.
    pub fixed_until: Option<NaiveDateTime>,
    /// Provider enrichment signals.
    pub enrichment: Enrichment,
}

impl Place {
    /// Construct a place with a provider identifier.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::unidentified(name, category)
        }
    }

    /// Construct a place that has no provider identifier.
    #[must_use]
    pub fn unidentified(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    /// Set the position from latitude and longitude in degrees.
    #[must_use]
    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(Coord {
            x: longitude,
            y: latitude,
        });
        self
    }

    /// Set the user rating.
    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the provider quality score.
    #[must_use]
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality_score = quality;
        self
    }

    /// Set the postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Replace the enrichment signals.
    #[must_use]
    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        self.enrichment = enrichment;
        self
    }

    /// Mark the place as chosen by the traveller.
    #[must_use]
    pub fn user_selected(mut self) -> Self {
        self.is_user_selected = true;
        self
    }

    /// Return a copy carrying the given relevance score.
    #[must_use]
    pub fn scored(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Pinned start for places that are fixed in time.
    #[must_use]
    pub fn pinned_at(&self) -> Option<NaiveDateTime> {
        self.fixed_time.filter(|_| self.is_fixed)
    }

    /// End of the pinned window, defaulting to `fallback` after the start.
    ///
    /// Returns `None` for places that are not pinned. An end at or before
    /// the start is ignored.
    #[must_use]
    pub fn pinned_until(&self, fallback: TimeDelta) -> Option<NaiveDateTime> {
        let start = self.pinned_at()?;
        Some(
            self.fixed_until
                .filter(|end| *end > start)
                .or_else(|| start.checked_add_signed(fallback))
                .unwrap_or(start),
        )
    }

    /// Return the position when it is present and usable.
    #[must_use]
    pub fn valid_location(&self) -> Option<Coord<f64>> {
        self.location.filter(|coord| is_valid_coord(*coord))
    }

    /// Report whether the lowercase category contains `keyword`.
    #[must_use]
    pub fn category_contains(&self, keyword: &str) -> bool {
        self.category.to_lowercase().contains(keyword)
    }
}
