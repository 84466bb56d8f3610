//! Geographic groups of anchor places.

use geo::Coord;

use crate::Place;

/// A group of nearby anchor places with its centroid.
///
/// Clusters are produced once per planning call and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    /// Index of the cluster within its clustering run.
    pub id: usize,
    /// Mean position of the members.
    pub centroid: Coord<f64>,
    /// Member places.
    pub members: Vec<Place>,
}

impl Cluster {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Report whether the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
