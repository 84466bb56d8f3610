//! Multi-day itinerary construction for Itinerant.
//!
//! This crate provides [`ItineraryPlanner`], the default implementation of
//! the [`Planner`](itinerant_core::Planner) trait, together with the stages
//! it is built from:
//!
//! 1. [`GeoClusterer`] groups the traveller's anchor places with seeded
//!    k-means++;
//! 2. [`DayAllocator`] balances those clusters across the trip's days;
//! 3. [`CandidateAugmenter`] tops each day up from the scored candidate pool
//!    while a [`UniquenessLedger`](itinerant_core::UniquenessLedger) keeps
//!    every place to a single day;
//! 4. [`TimeBlockScheduler`] buckets each day into its time blocks;
//! 5. [`RouteOptimizer`] orders the day with nearest neighbour and 2-opt
//!    around any time-pinned events;
//! 6. [`ItineraryAssembler`] sums the days into the final output.
//!
//! Each stage is usable on its own. The planner performs no I/O: candidates
//! arrive through a [`PlaceSource`](itinerant_core::PlaceSource) and every
//! degraded result is reported as a warning rather than an error.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod allocate;
mod assemble;
mod augment;
mod cluster;
mod planner;
mod route;
mod schedule;
pub mod tour;

pub use allocate::{DayAllocation, DayAllocator};
pub use assemble::{DayParts, ItineraryAssembler};
pub use augment::{Augmentation, CandidateAugmenter};
pub use cluster::{Clustering, GeoClusterer};
pub use planner::ItineraryPlanner;
pub use route::{DayRoute, RouteOptimizer};
pub use schedule::{DaySchedule, TimeBlockScheduler};
