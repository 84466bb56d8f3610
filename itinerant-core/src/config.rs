//! Planner tunables.
//!
//! Every threshold the planner uses lives on [`PlannerConfig`]. Callers
//! override individual values by deserialising a partial document; missing
//! fields keep their defaults.

use std::time::Duration;

use thiserror::Error;

use crate::{BlockAffinity, CityLookup, KeyNormaliser, StyleKeywords, TimeBlockSet, TransportMode};

/// Average door-to-door speeds by transport mode, in km/h.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TransportSpeeds {
    /// Walking speed.
    pub walking_kmh: f64,
    /// Public transport speed including waits and transfers.
    pub transit_kmh: f64,
    /// Driving speed in city traffic.
    pub driving_kmh: f64,
}

impl Default for TransportSpeeds {
    fn default() -> Self {
        Self {
            walking_kmh: 4.5,
            transit_kmh: 20.0,
            driving_kmh: 30.0,
        }
    }
}

impl TransportSpeeds {
    /// Speed for `mode`.
    #[must_use]
    pub const fn kmh(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Walking => self.walking_kmh,
            TransportMode::Transit => self.transit_kmh,
            TransportMode::Driving => self.driving_kmh,
        }
    }

    /// Time needed to cover `km` with `mode`.
    ///
    /// Returns zero for non-positive distances or unusable speeds.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "distance over speed")]
    pub fn travel_time(&self, km: f64, mode: TransportMode) -> Duration {
        let speed = self.kmh(mode);
        if !(km > 0.0 && speed > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(km / speed * 3600.0).unwrap_or(Duration::ZERO)
    }
}

/// Reasons a [`PlannerConfig`] is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric field is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Offending field.
        field: &'static str,
    },
    /// A numeric field that must be strictly positive is not.
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Offending field.
        field: &'static str,
    },
    /// The time-block set is empty.
    #[error("at least one time block is required")]
    NoTimeBlocks,
    /// A block ends before it starts.
    #[error("time block {name} ends before it starts")]
    InvertedBlock {
        /// Name of the offending block.
        name: String,
    },
    /// The per-day target exceeds the per-day maximum.
    #[error("target places per day ({target}) exceeds the maximum ({max})")]
    TargetAboveMaximum {
        /// Configured target.
        target: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Tunable thresholds and lookup tables for itinerary construction.
///
/// # Examples
/// ```
/// use itinerant_core::PlannerConfig;
///
/// let config = PlannerConfig::default();
/// assert_eq!(config.target_places_per_day, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PlannerConfig {
    /// Minimum provider quality in the strict augmentation pass.
    pub quality_floor: f32,
    /// Minimum rating in the strict augmentation pass.
    pub rating_floor: f32,
    /// Minimum provider quality in the relaxed augmentation pass.
    pub relaxed_quality_floor: f32,
    /// Minimum rating in the relaxed augmentation pass.
    pub relaxed_rating_floor: f32,
    /// Search radius around a day centre in the strict pass.
    pub radius_km: f64,
    /// Candidates taken per centre in the strict pass. When unset the
    /// shortfall is split evenly across centres.
    pub per_center_take: Option<usize>,
    /// Places each day should reach.
    pub target_places_per_day: usize,
    /// Upper bound on places per day.
    pub max_places_per_day: usize,
    /// Maximum places per time block.
    pub block_capacity: usize,
    /// Upper bound on k for anchor clustering.
    pub max_clusters: usize,
    /// Iteration cap for k-means.
    pub kmeans_max_iterations: usize,
    /// Centroid movement, in kilometres, below which k-means has converged.
    pub kmeans_tolerance_km: f64,
    /// Maximum improving passes of 2-opt per segment.
    pub two_opt_max_passes: usize,
    /// Optional wall-clock budget for 2-opt, in milliseconds.
    pub two_opt_budget_ms: Option<u64>,
    /// Time spent at each stop.
    pub dwell_minutes: u32,
    /// Hours of gap between fixed events that justify one flexible stop.
    pub gap_hours_per_stop: f64,
    /// Maximum flexible stops interleaved into a single gap.
    pub max_stops_per_gap: usize,
    /// Score multiplier for places sharing an address with an event.
    pub proximity_bonus: f32,
    /// Longest trip that will be planned.
    pub max_trip_days: usize,
    /// Average speeds by transport mode.
    pub speeds: TransportSpeeds,
    /// Time blocks of the travelling day.
    pub blocks: TimeBlockSet,
    /// Style to category-keyword table.
    pub style_keywords: StyleKeywords,
    /// Category to block preference table.
    pub block_affinity: BlockAffinity,
    /// Departure lookup table.
    pub cities: CityLookup,
    /// Generic descriptor tokens stripped from names.
    pub generic_tokens: KeyNormaliser,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            quality_floor: 0.6,
            rating_floor: 3.5,
            relaxed_quality_floor: 0.3,
            relaxed_rating_floor: 3.0,
            radius_km: 10.0,
            per_center_take: None,
            target_places_per_day: 4,
            max_places_per_day: 6,
            block_capacity: 2,
            max_clusters: 3,
            kmeans_max_iterations: 100,
            kmeans_tolerance_km: 0.001,
            two_opt_max_passes: 100,
            two_opt_budget_ms: None,
            dwell_minutes: 60,
            gap_hours_per_stop: 2.0,
            max_stops_per_gap: 3,
            proximity_bonus: 1.2,
            max_trip_days: 30,
            speeds: TransportSpeeds::default(),
            blocks: TimeBlockSet::default(),
            style_keywords: StyleKeywords::default(),
            block_affinity: BlockAffinity::default(),
            cities: CityLookup::default(),
            generic_tokens: KeyNormaliser::default(),
        }
    }
}

fn finite_f32(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive_f64(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field })
    }
}

fn positive_usize(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::NotPositive { field })
    } else {
        Ok(())
    }
}

impl PlannerConfig {
    /// Check the configuration for values the planner cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite_f32("quality_floor", self.quality_floor)?;
        finite_f32("rating_floor", self.rating_floor)?;
        finite_f32("relaxed_quality_floor", self.relaxed_quality_floor)?;
        finite_f32("relaxed_rating_floor", self.relaxed_rating_floor)?;
        finite_f32("proximity_bonus", self.proximity_bonus)?;
        positive_f64("radius_km", self.radius_km)?;
        positive_f64("kmeans_tolerance_km", self.kmeans_tolerance_km)?;
        positive_f64("gap_hours_per_stop", self.gap_hours_per_stop)?;
        positive_f64("speeds.walking_kmh", self.speeds.walking_kmh)?;
        positive_f64("speeds.transit_kmh", self.speeds.transit_kmh)?;
        positive_f64("speeds.driving_kmh", self.speeds.driving_kmh)?;
        positive_usize("target_places_per_day", self.target_places_per_day)?;
        positive_usize("max_places_per_day", self.max_places_per_day)?;
        positive_usize("block_capacity", self.block_capacity)?;
        positive_usize("max_clusters", self.max_clusters)?;
        positive_usize("kmeans_max_iterations", self.kmeans_max_iterations)?;
        positive_usize("max_trip_days", self.max_trip_days)?;
        if self.target_places_per_day > self.max_places_per_day {
            return Err(ConfigError::TargetAboveMaximum {
                target: self.target_places_per_day,
                max: self.max_places_per_day,
            });
        }
        if self.blocks.is_empty() {
            return Err(ConfigError::NoTimeBlocks);
        }
        if let Some(block) = self.blocks.blocks().iter().find(|b| b.end <= b.start) {
            return Err(ConfigError::InvertedBlock {
                name: block.name.clone(),
            });
        }
        Ok(())
    }

    /// Dwell time per stop.
    #[must_use]
    pub fn dwell(&self) -> Duration {
        Duration::from_secs(u64::from(self.dwell_minutes) * 60)
    }

    /// Wall-clock budget for 2-opt, if any.
    #[must_use]
    pub fn two_opt_budget(&self) -> Option<Duration> {
        self.two_opt_budget_ms.map(Duration::from_millis)
    }
}
