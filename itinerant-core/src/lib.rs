//! Core domain types for the Itinerant engine.
//!
//! The crate defines the data model shared by the planner and scorer:
//! places, confirmed events, clusters, day plans, routes and the assembled
//! itinerary. It also owns the configuration surface ([`PlannerConfig`]),
//! the declarative lookup tables it carries, the canonical place key used for
//! every de-duplication decision, and the [`UniquenessLedger`] that enforces
//! trip-wide uniqueness during a single planning call.
//!
//! Behaviour lives behind traits so implementations can be swapped:
//! [`Scorer`] ranks candidates, [`PlaceSource`] supplies them and
//! [`Planner`] turns a [`PlanRequest`] into an [`ItineraryOutput`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod block;
pub mod cluster;
pub mod config;
pub mod day;
pub mod distance;
pub mod event;
pub mod itinerary;
pub mod key;
pub mod ledger;
pub mod place;
pub mod planner;
pub mod route;
pub mod scorer;
pub mod source;
pub mod spatial;
pub mod tables;
pub mod trip;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use block::{TimeBlock, TimeBlockSet};
pub use cluster::Cluster;
pub use config::{ConfigError, PlannerConfig, TransportSpeeds};
pub use day::{BlockSlot, DayPlan};
pub use distance::{haversine_km, is_valid_coord, mean_coord, segment_km};
pub use event::{ConfirmedEvent, EventKind};
pub use itinerary::{DayItinerary, ItineraryOutput};
pub use key::{CanonicalKey, DEFAULT_GENERIC_TOKENS, KeyNormaliser};
pub use ledger::UniquenessLedger;
pub use place::{Enrichment, Place};
pub use planner::{PlanError, PlanRequest, Planner};
pub use route::{Route, RouteStop, Segment};
pub use scorer::{DEFAULT_PROXIMITY_BONUS, Scorer, ScoringContext};
pub use source::{CandidateQuery, InMemoryPlaceSource, PlaceSource};
pub use spatial::CandidateIndex;
pub use tables::{AffinityRule, BlockAffinity, CityEntry, CityLookup, StyleKeywords};
pub use trip::{
    Companion, TransportMode, TravelStyle, TripDates, TripParameters, parse_date,
};
