//! Entry point for itinerary construction.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{ConfigError, ConfirmedEvent, ItineraryOutput, Place, TripParameters};

/// Inputs for one planning call.
///
/// # Examples
/// ```rust
/// use itinerant_core::{PlanRequest, TripParameters};
///
/// let request = PlanRequest {
///     trip: TripParameters {
///         destination: "Seoul".into(),
///         start_date: Some("2025-05-01".into()),
///         ..TripParameters::default()
///     },
///     ..PlanRequest::default()
/// };
/// assert!(request.anchors.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PlanRequest {
    /// Trip-level parameters.
    pub trip: TripParameters,
    /// Places the traveller chose explicitly.
    pub anchors: Vec<Place>,
    /// Time-pinned commitments.
    pub events: Vec<ConfirmedEvent>,
    /// Seed for reproducible clustering.
    pub seed: u64,
    /// Date used when the trip dates are missing or unparseable; the
    /// system's local date when unset.
    pub today: Option<NaiveDate>,
}

/// Errors returned by [`Planner::plan`].
///
/// Data-quality and insufficiency problems are never errors; they are
/// defaulted and reported as warnings on the output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The destination has no candidates and the traveller chose no anchors,
    /// so there is nothing to build an itinerary from.
    #[error("no places available for {destination:?}")]
    NoPlacesAvailable {
        /// Destination that was queried.
        destination: String,
    },
    /// The planner configuration failed validation.
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Turn a [`PlanRequest`] into an [`ItineraryOutput`].
///
/// Implementations must be `Send + Sync`; each call is independent and
/// holds no state between requests.
pub trait Planner: Send + Sync {
    /// Build an itinerary.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoPlacesAvailable`] when there is nothing to
    /// plan with, or [`PlanError::InvalidConfig`] when the planner was
    /// configured with unusable values.
    fn plan(&self, request: &PlanRequest) -> Result<ItineraryOutput, PlanError>;
}
