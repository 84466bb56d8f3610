//! Rank candidate places against the traveller's preferences.

use crate::{Companion, ConfirmedEvent, Place, StyleKeywords, TravelStyle};

/// Score multiplier applied near a confirmed event when no other value is
/// configured.
pub const DEFAULT_PROXIMITY_BONUS: f32 = 1.2;

/// Trip-level inputs to [`Scorer::score`].
///
/// The context borrows the style table and event list so one context can
/// score a whole candidate pool without cloning.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Main travel style.
    pub style: TravelStyle,
    /// Travel companions.
    pub companion: Companion,
    /// Style to category-keyword table.
    pub style_keywords: &'a StyleKeywords,
    /// Confirmed events of the trip.
    pub events: &'a [ConfirmedEvent],
    /// Multiplier for places sharing an address with an event.
    pub proximity_bonus: f32,
}

impl<'a> ScoringContext<'a> {
    /// Context with no events and the default proximity bonus.
    #[must_use]
    pub const fn new(
        style: TravelStyle,
        companion: Companion,
        style_keywords: &'a StyleKeywords,
    ) -> Self {
        Self {
            style,
            companion,
            style_keywords,
            events: &[],
            proximity_bonus: DEFAULT_PROXIMITY_BONUS,
        }
    }

    /// Attach confirmed events.
    #[must_use]
    pub const fn with_events(mut self, events: &'a [ConfirmedEvent]) -> Self {
        self.events = events;
        self
    }

    /// Override the proximity multiplier.
    #[must_use]
    pub const fn with_proximity_bonus(mut self, bonus: f32) -> Self {
        self.proximity_bonus = bonus;
        self
    }
}

/// Calculate a relevance score for a place.
///
/// Higher scores indicate a better match. Implementations must be `Send` and
/// `Sync` so a pool can be scored across threads, and must never fail: a
/// place with no usable signals scores `0.0`.
///
/// The weighted base score is normalised to `0.0..=1.0` via
/// [`Scorer::sanitise`]; implementations may then apply the context's
/// proximity multiplier, so final scores lie in
/// `0.0..=ScoringContext::proximity_bonus`.
///
/// # Examples
///
/// ```rust
/// use itinerant_core::{Companion, Place, Scorer, ScoringContext, StyleKeywords, TravelStyle};
///
/// struct Flat;
///
/// impl Scorer for Flat {
///     fn score(&self, _place: &Place, _ctx: &ScoringContext<'_>) -> f32 {
///         0.5
///     }
/// }
///
/// let keywords = StyleKeywords::default();
/// let ctx = ScoringContext::new(TravelStyle::Food, Companion::Solo, &keywords);
/// assert_eq!(Flat.score(&Place::unidentified("x", "cafe"), &ctx), 0.5);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `place` under `ctx`.
    fn score(&self, place: &Place, ctx: &ScoringContext<'_>) -> f32;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f32) -> f32
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}
