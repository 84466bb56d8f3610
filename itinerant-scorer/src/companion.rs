//! Companion heuristics as a lookup table.
//!
//! Each companion type has a list of favoured category keywords and a list
//! of favoured enrichment signals. Families favour accessibility and
//! parking, couples favour ambiance categories and photogenic places, groups
//! favour activity and food categories, and solo travellers favour places
//! that are well connected.

use std::collections::HashMap;

use itinerant_core::{Companion, Enrichment, Place};

/// Enrichment signal a companion type can favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Step-free access.
    Accessible,
    /// Parking nearby.
    Parking,
    /// Photos available.
    Photo,
    /// Transit stop within walking distance.
    NearTransit,
    /// Structured opening hours.
    OpeningHours,
}

impl Signal {
    const fn present(self, enrichment: &Enrichment) -> bool {
        match self {
            Self::Accessible => enrichment.accessible,
            Self::Parking => enrichment.has_parking,
            Self::Photo => enrichment.has_photo,
            Self::NearTransit => enrichment.near_transit,
            Self::OpeningHours => enrichment.has_opening_hours,
        }
    }
}

/// Favoured categories and signals for one companion type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanionProfile {
    /// Category keywords, lowercase.
    pub keywords: Vec<String>,
    /// Enrichment signals.
    pub signals: Vec<Signal>,
}

impl CompanionProfile {
    /// Build a profile from keyword and signal slices.
    #[must_use]
    pub fn new(keywords: &[&str], signals: &[Signal]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            signals: signals.to_vec(),
        }
    }

    /// Match strength in `0.0..=1.0`.
    ///
    /// With no signals the category hit alone decides; otherwise the
    /// category hit and the fraction of signals present count equally.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "averaging boolean signals"
    )]
    pub fn strength(&self, place: &Place) -> f32 {
        let category = place.category.to_lowercase();
        let hit = if self
            .keywords
            .iter()
            .any(|k| category.contains(k.as_str()))
        {
            1.0_f32
        } else {
            0.0_f32
        };
        if self.signals.is_empty() {
            return hit;
        }
        let present = self
            .signals
            .iter()
            .filter(|s| s.present(&place.enrichment))
            .count();
        let fraction = present as f32 / self.signals.len() as f32;
        0.5_f32 * hit + 0.5_f32 * fraction
    }
}

/// Companion type to profile table. Companions without an entry score zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionTable {
    profiles: HashMap<Companion, CompanionProfile>,
}

impl Default for CompanionTable {
    fn default() -> Self {
        let profiles = HashMap::from([
            (
                Companion::Family,
                CompanionProfile::new(
                    &[
                        "park", "zoo", "aquarium", "museum", "theme park", "amusement", "beach",
                        "garden", "family", "science",
                    ],
                    &[Signal::Accessible, Signal::Parking],
                ),
            ),
            (
                Companion::Couple,
                CompanionProfile::new(
                    &[
                        "cafe", "restaurant", "view", "observatory", "tower", "garden", "bar",
                        "rooftop", "gallery", "palace", "wine",
                    ],
                    &[Signal::Photo],
                ),
            ),
            (
                Companion::Group,
                CompanionProfile::new(
                    &[
                        "restaurant", "bbq", "bar", "pub", "market", "amusement", "theme park",
                        "sports", "karaoke", "food", "experience",
                    ],
                    &[],
                ),
            ),
            (
                Companion::Solo,
                CompanionProfile::new(
                    &["museum", "gallery", "cafe", "library", "market", "street", "bookstore"],
                    &[Signal::NearTransit],
                ),
            ),
        ]);
        Self { profiles }
    }
}

impl CompanionTable {
    /// Replace the profile for `companion`.
    #[must_use]
    pub fn with_profile(mut self, companion: Companion, profile: CompanionProfile) -> Self {
        self.profiles.insert(companion, profile);
        self
    }

    /// Match strength of `place` for `companion`.
    #[must_use]
    pub fn strength(&self, companion: Companion, place: &Place) -> f32 {
        self.profiles
            .get(&companion)
            .map_or(0.0_f32, |profile| profile.strength(place))
    }
}
