//! Relative weighting of the score components.

use crate::ScoreWeightsError;

/// Weights of the four score components.
///
/// Weights need not sum to one; the weighted sum is divided by their total.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoreWeights {
    /// Provider quality score.
    pub quality: f32,
    /// Category match against the travel style.
    pub style: f32,
    /// Category and signal match against the companion type.
    pub companion: f32,
    /// Presence of enrichment metadata.
    pub richness: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            quality: 0.4_f32,
            style: 0.3_f32,
            companion: 0.2_f32,
            richness: 0.1_f32,
        }
    }
}

impl ScoreWeights {
    fn components(self) -> [(&'static str, f32); 4] {
        [
            ("quality", self.quality),
            ("style", self.style),
            ("companion", self.companion),
            ("richness", self.richness),
        ]
    }

    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoreWeightsError`] when a weight is non-finite or negative,
    /// or when all weights are zero.
    pub fn validate(self) -> Result<Self, ScoreWeightsError> {
        for (component, value) in self.components() {
            if !value.is_finite() {
                return Err(ScoreWeightsError::NonFinite { component });
            }
            if value < 0.0_f32 {
                return Err(ScoreWeightsError::Negative { component });
            }
        }
        if self.total() == 0.0_f32 {
            return Err(ScoreWeightsError::ZeroTotal);
        }
        Ok(self)
    }

    /// Sum of all weights.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "weights are summed")]
    pub fn total(self) -> f32 {
        self.quality + self.style + self.companion + self.richness
    }

    /// Weighted mean of the component values, in the same order as the
    /// fields.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "weighted average")]
    pub fn blend(self, quality: f32, style: f32, companion: f32, richness: f32) -> f32 {
        let total = self.total();
        if total <= 0.0_f32 {
            return 0.0_f32;
        }
        (quality * self.quality
            + style * self.style
            + companion * self.companion
            + richness * self.richness)
            / total
    }
}
