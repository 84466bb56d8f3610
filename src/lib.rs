//! Facade crate for the Itinerant trip planner.
//!
//! This crate re-exports the core domain types and, behind the default
//! `planner` feature, the itinerary planner and place scorer.
//!
//! # Examples
//! ```
//! # #[cfg(feature = "planner")]
//! # {
//! use itinerant_engine::{
//!     InMemoryPlaceSource, ItineraryPlanner, Place, PlaceScoreCalculator, PlanRequest, Planner,
//!     TripParameters,
//! };
//!
//! let pool = vec![
//!     Place::new("p1", "Gyeongbokgung", "palace")
//!         .at(37.5796, 126.9770)
//!         .with_rating(4.7)
//!         .with_quality(0.9),
//! ];
//! let planner = ItineraryPlanner::new(
//!     InMemoryPlaceSource::with_places(pool),
//!     PlaceScoreCalculator::default(),
//! );
//! let request = PlanRequest {
//!     trip: TripParameters {
//!         destination: "Seoul".to_owned(),
//!         ..TripParameters::default()
//!     },
//!     ..PlanRequest::default()
//! };
//! let itinerary = planner.plan(&request)?;
//! assert_eq!(itinerary.days.len(), 1);
//! assert_eq!(itinerary.total_places, 1);
//! # }
//! # Ok::<(), itinerant_engine::PlanError>(())
//! ```

#![forbid(unsafe_code)]

pub use itinerant_core::{
    ConfirmedEvent, DayItinerary, DayPlan, EventKind, InMemoryPlaceSource, ItineraryOutput, Place,
    PlaceSource, PlanError, PlanRequest, Planner, PlannerConfig, Route, RouteStop, Scorer,
    ScoringContext, TripParameters,
};

#[cfg(feature = "planner")]
pub use itinerant_planner::ItineraryPlanner;

#[cfg(feature = "planner")]
pub use itinerant_scorer::{PlaceScoreCalculator, ScoreWeights};
