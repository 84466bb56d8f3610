//! Tour construction and improvement over great-circle distance.
//!
//! Points are `Option<Coord<f64>>`: a missing coordinate contributes zero
//! distance to any hop it takes part in. Orders are vectors of indices into
//! the point slice.

use std::time::Instant;

use geo::Coord;
use itinerant_core::segment_km;

const IMPROVEMENT_EPSILON_KM: f64 = 1e-9;

/// Stopping rules for [`two_opt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoOptLimits {
    /// Maximum number of full passes over the tour.
    pub max_passes: usize,
    /// Wall-clock cut-off; the current order is kept once it passes.
    pub deadline: Option<Instant>,
}

impl TwoOptLimits {
    /// Limits with a pass cap and no deadline.
    #[must_use]
    pub const fn passes(max_passes: usize) -> Self {
        Self {
            max_passes,
            deadline: None,
        }
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

fn point(points: &[Option<Coord<f64>>], order: &[usize], position: usize) -> Option<Coord<f64>> {
    order
        .get(position)
        .and_then(|index| points.get(*index))
        .copied()
        .flatten()
}

/// Length of `head`, the ordered points and `tail`, in kilometres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use itinerant_planner::tour::tour_length_km;
///
/// let points = [Some(Coord { x: 0.0, y: 1.0 }), None];
/// assert_eq!(tour_length_km(None, &points, &[0, 1], None), 0.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "summing hop lengths")]
pub fn tour_length_km(
    head: Option<Coord<f64>>,
    points: &[Option<Coord<f64>>],
    order: &[usize],
    tail: Option<Coord<f64>>,
) -> f64 {
    let mut previous = head;
    let mut total = 0.0;
    for position in 0..order.len() {
        let current = point(points, order, position);
        total += segment_km(previous, current);
        previous = current;
    }
    total + segment_km(previous, tail)
}

/// Greedy nearest-neighbour order starting from `start`.
///
/// With no start the first located point opens the tour. Points without a
/// coordinate are appended at the end in input order. Ties go to the lower
/// index.
#[must_use]
pub fn nearest_neighbour(start: Option<Coord<f64>>, points: &[Option<Coord<f64>>]) -> Vec<usize> {
    let mut remaining: Vec<(usize, Coord<f64>)> = points
        .iter()
        .enumerate()
        .filter_map(|(index, p)| p.map(|coord| (index, coord)))
        .collect();
    let mut order = Vec::with_capacity(points.len());
    let mut cursor = start;
    while !remaining.is_empty() {
        let next = cursor.map_or(0, |from| {
            remaining
                .iter()
                .enumerate()
                .map(|(slot, (_, coord))| (slot, segment_km(Some(from), Some(*coord))))
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
                .map_or(0, |(slot, _)| slot)
        });
        let (index, coord) = remaining.remove(next);
        order.push(index);
        cursor = Some(coord);
    }
    order.extend(
        points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(index, _)| index),
    );
    order
}

/// Improve `order` in place by segment reversal.
///
/// `head` and `tail` are fixed endpoints outside the reorderable run; pass
/// `None` for an open end. A reversal is applied whenever it strictly
/// shortens the tour, so the result is never longer than the input.
/// Returns the number of reversals applied.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use itinerant_planner::tour::{TwoOptLimits, tour_length_km, two_opt};
///
/// let points: Vec<_> = [0.0, 0.03, 0.01, 0.02]
///     .iter()
///     .map(|x| Some(Coord { x: *x, y: 1.0 }))
///     .collect();
/// let mut order = vec![0, 1, 2, 3];
/// let before = tour_length_km(None, &points, &order, None);
/// two_opt(&mut order, &points, None, None, TwoOptLimits::passes(10));
/// assert!(tour_length_km(None, &points, &order, None) < before);
/// ```
#[expect(clippy::float_arithmetic, reason = "comparing tour length deltas")]
pub fn two_opt(
    order: &mut [usize],
    points: &[Option<Coord<f64>>],
    head: Option<Coord<f64>>,
    tail: Option<Coord<f64>>,
    limits: TwoOptLimits,
) -> usize {
    let n = order.len();
    if n < 2 {
        return 0;
    }
    let mut applied = 0;
    for _ in 0..limits.max_passes {
        let mut improved = false;
        for a in 0..n - 1 {
            if limits.expired() {
                return applied;
            }
            for b in a + 1..n {
                let before = if a == 0 { head } else { point(points, order, a - 1) };
                let after = if b + 1 == n { tail } else { point(points, order, b + 1) };
                let first = point(points, order, a);
                let last = point(points, order, b);
                let delta = segment_km(before, last) + segment_km(first, after)
                    - segment_km(before, first)
                    - segment_km(last, after);
                if delta < -IMPROVEMENT_EPSILON_KM
                    && let Some(run) = order.get_mut(a..=b)
                {
                    run.reverse();
                    applied += 1;
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
    applied
}
