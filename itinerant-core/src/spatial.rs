//! R\*-tree index over the scored candidate pool.
//!
//! Radius queries first intersect a degree-space envelope around the centre
//! and then keep only candidates whose haversine distance is within the
//! radius. Places without a usable location are not indexed.

use geo::Coord;
use rstar::{AABB, RTree, RTreeObject};

use crate::{Place, haversine_km};

/// Kilometres per degree of latitude.
const KM_PER_DEGREE: f64 = 111.32;

/// Smallest cosine used when widening the longitude span near the poles.
const MIN_COS_LATITUDE: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
struct IndexedPlace {
    index: usize,
    location: Coord<f64>,
}

impl RTreeObject for IndexedPlace {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.x, self.location.y])
    }
}

/// Spatial index mapping positions back to indices in the source slice.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use itinerant_core::{CandidateIndex, Place};
///
/// let pool = vec![
///     Place::new("near", "Near", "park").at(37.501, 127.021),
///     Place::new("far", "Far", "park").at(35.18, 129.07),
/// ];
/// let index = CandidateIndex::new(&pool);
/// let hits = index.within_radius(Coord { x: 127.02, y: 37.50 }, 5.0);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].0, 0);
/// ```
#[derive(Debug)]
pub struct CandidateIndex {
    tree: RTree<IndexedPlace>,
}

impl CandidateIndex {
    /// Index every place with a usable location.
    #[must_use]
    pub fn new(places: &[Place]) -> Self {
        let entries = places
            .iter()
            .enumerate()
            .filter_map(|(index, place)| {
                place
                    .valid_location()
                    .map(|location| IndexedPlace { index, location })
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed places.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Report whether nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices and distances of places within `radius_km` of `centre`,
    /// nearest first with ties broken by index.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "envelope half-widths are derived from the radius"
    )]
    pub fn within_radius(&self, centre: Coord<f64>, radius_km: f64) -> Vec<(usize, f64)> {
        if !(radius_km.is_finite() && radius_km >= 0.0) {
            return Vec::new();
        }
        let half_lat = radius_km / KM_PER_DEGREE;
        let cos_lat = centre.y.to_radians().cos().abs().max(MIN_COS_LATITUDE);
        let half_lon = radius_km / (KM_PER_DEGREE * cos_lat);
        let envelope = AABB::from_corners(
            [centre.x - half_lon, centre.y - half_lat],
            [centre.x + half_lon, centre.y + half_lat],
        );
        let mut hits: Vec<(usize, f64)> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| (entry.index, haversine_km(centre, entry.location)))
            .filter(|(_, km)| *km <= radius_km)
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits
    }
}
