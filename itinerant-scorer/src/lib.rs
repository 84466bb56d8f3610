//! Place scoring for the Itinerant engine.
//!
//! [`PlaceScoreCalculator`] implements [`Scorer`] as a weighted sum of four
//! components, each in `0.0..=1.0`:
//!
//! - **quality** (0.4): the provider's precomputed quality score;
//! - **style** (0.3): category keyword match for the travel style, from the
//!   context's [`StyleKeywords`](itinerant_core::StyleKeywords) table;
//! - **companion** (0.2): the [`CompanionTable`] heuristics;
//! - **richness** (0.1): the share of enrichment signals present (enriched
//!   flag, opening hours, photo, highlight text).
//!
//! The blended score is normalised and then multiplied by the context's
//! proximity bonus when the place's address shares at least two tokens with
//! a confirmed event's address.
//!
//! # Examples
//!
//! ```
//! use itinerant_core::{Companion, Place, Scorer, ScoringContext, StyleKeywords, TravelStyle};
//! use itinerant_scorer::PlaceScoreCalculator;
//!
//! let keywords = StyleKeywords::default();
//! let ctx = ScoringContext::new(TravelStyle::Culture, Companion::Solo, &keywords);
//! let museum = Place::new("m", "National Museum", "museum").with_quality(0.9);
//! let mall = Place::new("s", "COEX Mall", "shopping mall").with_quality(0.9);
//!
//! let scorer = PlaceScoreCalculator::default();
//! assert!(scorer.score(&museum, &ctx) > scorer.score(&mall, &ctx));
//! ```

#![forbid(unsafe_code)]

mod companion;
mod error;
mod weights;

pub use companion::{CompanionProfile, CompanionTable, Signal};
pub use error::ScoreWeightsError;
pub use weights::ScoreWeights;

use itinerant_core::{ConfirmedEvent, Place, Scorer, ScoringContext};

/// Address tokens shorter than this are ignored when comparing addresses.
const MIN_ADDRESS_TOKEN_LEN: usize = 3;

/// Shared address tokens needed for the proximity bonus.
const MIN_SHARED_TOKENS: usize = 2;

/// Per-component values behind a score, exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Quality component.
    pub quality: f32,
    /// Style component.
    pub style: f32,
    /// Companion component.
    pub companion: f32,
    /// Richness component.
    pub richness: f32,
    /// The proximity bonus applied.
    pub near_event: bool,
    /// Final score.
    pub total: f32,
}

/// Weighted-sum scorer over quality, style, companion and richness signals.
#[derive(Debug, Clone, Default)]
pub struct PlaceScoreCalculator {
    weights: ScoreWeights,
    companions: CompanionTable,
}

impl PlaceScoreCalculator {
    /// Build a calculator with custom weights.
    ///
    /// # Errors
    /// Returns [`ScoreWeightsError`] when the weights fail validation.
    pub fn with_weights(weights: ScoreWeights) -> Result<Self, ScoreWeightsError> {
        Ok(Self {
            weights: weights.validate()?,
            companions: CompanionTable::default(),
        })
    }

    /// Replace the companion heuristics.
    #[must_use]
    pub fn with_companions(mut self, companions: CompanionTable) -> Self {
        self.companions = companions;
        self
    }

    /// Weights in use.
    #[must_use]
    pub const fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Score `place` and report every component.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "proximity multiplier")]
    pub fn breakdown(&self, place: &Place, ctx: &ScoringContext<'_>) -> ScoreBreakdown {
        let quality = Self::sanitise(place.quality_score);
        let style = ctx.style_keywords.affinity(ctx.style, place);
        let companion = self.companions.strength(ctx.companion, place);
        let richness = richness(place);
        let base = Self::sanitise(self.weights.blend(quality, style, companion, richness));
        let near_event = ctx.proximity_bonus.is_finite()
            && ctx.proximity_bonus > 0.0_f32
            && near_any_event(place, ctx.events);
        let total = if near_event {
            base * ctx.proximity_bonus
        } else {
            base
        };
        ScoreBreakdown {
            quality,
            style,
            companion,
            richness,
            near_event,
            total,
        }
    }
}

impl Scorer for PlaceScoreCalculator {
    fn score(&self, place: &Place, ctx: &ScoringContext<'_>) -> f32 {
        self.breakdown(place, ctx).total
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "averaging boolean signals"
)]
fn richness(place: &Place) -> f32 {
    let e = &place.enrichment;
    let highlight = e.highlight.as_deref().is_some_and(|h| !h.trim().is_empty());
    let flags = [e.enriched, e.has_opening_hours, e.has_photo, highlight];
    let present = flags.iter().filter(|f| **f).count();
    present as f32 / flags.len() as f32
}

fn address_tokens(address: &str) -> Vec<String> {
    address
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_ADDRESS_TOKEN_LEN)
        .map(str::to_owned)
        .collect()
}

fn near_any_event(place: &Place, events: &[ConfirmedEvent]) -> bool {
    let Some(address) = place.address.as_deref() else {
        return false;
    };
    let tokens = address_tokens(address);
    if tokens.is_empty() {
        return false;
    }
    events
        .iter()
        .filter_map(|event| event.address.as_deref())
        .any(|event_address| {
            let mut shared = address_tokens(event_address);
            shared.sort_unstable();
            shared.dedup();
            shared.iter().filter(|t| tokens.contains(t)).count() >= MIN_SHARED_TOKENS
        })
}
