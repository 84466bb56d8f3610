//! Fixtures shared by unit, behaviour and property tests.

use crate::{Place, Scorer, ScoringContext};

/// Test `Scorer` returning the provider quality score unchanged.
#[derive(Debug, Copy, Clone, Default)]
pub struct QualityScorer;

impl Scorer for QualityScorer {
    fn score(&self, place: &Place, _ctx: &ScoringContext<'_>) -> f32 {
        Self::sanitise(place.quality_score)
    }
}

/// Well-rated place at the given position that passes the strict
/// augmentation floors.
#[must_use]
pub fn place(id: &str, latitude: f64, longitude: f64, category: &str) -> Place {
    Place::new(id, format!("Place {id}"), category)
        .at(latitude, longitude)
        .with_rating(4.5)
        .with_quality(0.8)
}
