//! Error types raised while configuring the place scorer.

use thiserror::Error;

/// Reasons a [`ScoreWeights`](crate::ScoreWeights) value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreWeightsError {
    /// A weight is NaN or infinite.
    #[error("score weight {component} is not finite")]
    NonFinite {
        /// Name of the offending component.
        component: &'static str,
    },
    /// A weight is below zero.
    #[error("score weight {component} is negative")]
    Negative {
        /// Name of the offending component.
        component: &'static str,
    },
    /// Every weight is zero, so no score can be formed.
    #[error("score weights sum to zero")]
    ZeroTotal,
}
