//! Geographic grouping of anchor places.

use geo::Coord;
use itinerant_core::{Cluster, Place, PlannerConfig, haversine_km, mean_coord};
use log::{debug, warn};
use rand::Rng;

/// Result of one clustering run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clustering {
    /// Clusters in seeding order. Every located anchor belongs to exactly
    /// one of them; a cluster may be empty if it lost all its members.
    pub clusters: Vec<Cluster>,
    /// Assignment/update rounds performed.
    pub iterations: usize,
    /// Whether the centroids settled within tolerance before the cap.
    pub converged: bool,
    /// Anchors with no usable coordinate, in input order.
    pub unlocated: Vec<Place>,
}

impl Clustering {
    /// Number of anchors placed in clusters.
    #[must_use]
    pub fn located(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }
}

/// k-means over great-circle distance with k-means++ seeding.
///
/// `k` is `ceil(n / 2)` capped by `max_clusters` and by the number of
/// distinct anchor positions. Seeding draws from the supplied random number
/// generator, so a seeded generator gives a reproducible grouping.
///
/// # Examples
/// ```
/// use itinerant_core::Place;
/// use itinerant_planner::GeoClusterer;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let anchors = vec![
///     Place::new("a", "A", "museum").at(37.57, 126.97),
///     Place::new("b", "B", "museum").at(37.58, 126.98),
///     Place::new("c", "C", "park").at(35.10, 129.04),
///     Place::new("d", "D", "park").at(35.11, 129.05),
/// ];
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let clustering = GeoClusterer::default().cluster(&anchors, &mut rng);
/// assert_eq!(clustering.clusters.len(), 2);
/// assert!(clustering.clusters.iter().all(|c| c.len() == 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoClusterer {
    max_clusters: usize,
    max_iterations: usize,
    tolerance_km: f64,
}

impl Default for GeoClusterer {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl GeoClusterer {
    /// Construct a clusterer with explicit limits.
    #[must_use]
    pub const fn new(max_clusters: usize, max_iterations: usize, tolerance_km: f64) -> Self {
        Self {
            max_clusters,
            max_iterations,
            tolerance_km,
        }
    }

    /// Construct a clusterer from planner configuration.
    #[must_use]
    pub const fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            config.max_clusters,
            config.kmeans_max_iterations,
            config.kmeans_tolerance_km,
        )
    }

    /// Number of clusters used for `located` anchors with `distinct`
    /// distinct positions.
    #[must_use]
    pub fn cluster_count(&self, located: usize, distinct: usize) -> usize {
        located
            .div_ceil(2)
            .min(self.max_clusters.max(1))
            .min(distinct)
    }

    /// Group `anchors` by proximity.
    ///
    /// Always terminates: after `max_iterations` rounds the current grouping
    /// is returned even if it has not converged.
    pub fn cluster<R>(&self, anchors: &[Place], rng: &mut R) -> Clustering
    where
        R: Rng + ?Sized,
    {
        let mut located = Vec::with_capacity(anchors.len());
        let mut unlocated = Vec::new();
        for place in anchors {
            match place.valid_location() {
                Some(coord) => located.push((place, coord)),
                None => unlocated.push(place.clone()),
            }
        }
        if !unlocated.is_empty() {
            debug!("{} anchor(s) have no usable coordinate", unlocated.len());
        }
        let points: Vec<Coord<f64>> = located.iter().map(|(_, c)| *c).collect();
        let k = self.cluster_count(points.len(), distinct_count(&points));
        if k == 0 {
            return Clustering {
                clusters: Vec::new(),
                iterations: 0,
                converged: true,
                unlocated,
            };
        }

        let mut centroids = seed_centroids(&points, k, rng);
        let mut assignment = assign(&points, &centroids);
        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iterations.max(1) {
            iterations += 1;
            let updated = update(&points, &assignment, &centroids);
            let shift = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| haversine_km(*old, *new))
                .fold(0.0_f64, f64::max);
            centroids = updated;
            assignment = assign(&points, &centroids);
            if shift < self.tolerance_km {
                converged = true;
                break;
            }
        }
        if !converged {
            warn!("k-means stopped after {iterations} iterations without converging");
        }

        let mut clusters: Vec<Cluster> = centroids
            .iter()
            .enumerate()
            .map(|(id, centroid)| Cluster {
                id,
                centroid: *centroid,
                members: Vec::new(),
            })
            .collect();
        for ((place, _), cluster_id) in located.iter().zip(&assignment) {
            if let Some(cluster) = clusters.get_mut(*cluster_id) {
                cluster.members.push((*place).clone());
            }
        }
        Clustering {
            clusters,
            iterations,
            converged,
            unlocated,
        }
    }
}

fn distinct_count(points: &[Coord<f64>]) -> usize {
    let mut seen: Vec<Coord<f64>> = Vec::with_capacity(points.len());
    for point in points {
        if !seen.contains(point) {
            seen.push(*point);
        }
    }
    seen.len()
}

#[expect(
    clippy::float_arithmetic,
    reason = "k-means++ weights by squared distance"
)]
fn seed_centroids<R>(points: &[Coord<f64>], k: usize, rng: &mut R) -> Vec<Coord<f64>>
where
    R: Rng + ?Sized,
{
    let mut centroids = Vec::with_capacity(k);
    let Some(first) = points.get(rng.gen_range(0..points.len())) else {
        return centroids;
    };
    centroids.push(*first);
    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                let nearest = centroids
                    .iter()
                    .map(|c| haversine_km(*p, *c))
                    .fold(f64::INFINITY, f64::min);
                nearest * nearest
            })
            .collect();
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            break;
        }
        let target = rng.gen_range(0.0..total);
        let mut running = 0.0;
        let mut chosen = None;
        for (point, weight) in points.iter().zip(&weights) {
            if *weight <= 0.0 {
                continue;
            }
            running += weight;
            chosen = Some(*point);
            if running > target {
                break;
            }
        }
        match chosen {
            Some(point) => centroids.push(point),
            None => break,
        }
    }
    centroids
}

fn assign(points: &[Coord<f64>], centroids: &[Coord<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|p| {
            centroids
                .iter()
                .enumerate()
                .map(|(i, c)| (i, haversine_km(*p, *c)))
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
                .map_or(0, |(i, _)| i)
        })
        .collect()
}

fn update(points: &[Coord<f64>], assignment: &[usize], centroids: &[Coord<f64>]) -> Vec<Coord<f64>> {
    centroids
        .iter()
        .enumerate()
        .map(|(id, previous)| {
            let members = points
                .iter()
                .zip(assignment)
                .filter(|(_, owner)| **owner == id)
                .map(|(p, _)| *p);
            mean_coord(members).unwrap_or_else(|| {
                debug!("cluster {id} is empty; keeping its centroid");
                *previous
            })
        })
        .collect()
}
