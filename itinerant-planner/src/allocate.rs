//! Balancing clusters across trip days.

use itinerant_core::{Cluster, Place};

/// Which clusters each day received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayAllocation {
    /// Cluster indices per day, in assignment order.
    pub days: Vec<Vec<usize>>,
    /// Anchor count per day.
    pub loads: Vec<usize>,
}

impl DayAllocation {
    /// Number of days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Report whether the allocation covers no days.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Clusters assigned to `day`.
    #[must_use]
    pub fn clusters_for(&self, day: usize) -> &[usize] {
        self.days.get(day).map_or(&[], Vec::as_slice)
    }

    /// Day owning cluster `cluster`.
    #[must_use]
    pub fn day_of(&self, cluster: usize) -> Option<usize> {
        self.days.iter().position(|d| d.contains(&cluster))
    }

    /// Index of the day with the fewest anchors, earliest on ties.
    #[must_use]
    pub fn lightest_day(&self) -> Option<usize> {
        self.loads
            .iter()
            .enumerate()
            .min_by_key(|(day, load)| (**load, *day))
            .map(|(day, _)| day)
    }

    /// Distribute anchors without a coordinate, one at a time, to the
    /// lightest day. Returns the chosen day for each place in input order.
    pub fn spread_unlocated(&mut self, places: &[Place]) -> Vec<usize> {
        places
            .iter()
            .filter_map(|_| {
                let day = self.lightest_day()?;
                if let Some(load) = self.loads.get_mut(day) {
                    *load += 1;
                }
                Some(day)
            })
            .collect()
    }
}

/// Greedy longest-first assignment of clusters to days.
///
/// Clusters are taken largest first and each goes to the day currently
/// holding the fewest anchors. The resulting spread between the busiest and
/// quietest day never exceeds the size of the largest cluster.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use itinerant_core::{Cluster, Place};
/// use itinerant_planner::DayAllocator;
///
/// let cluster = |id, n: usize| Cluster {
///     id,
///     centroid: Coord { x: 127.0, y: 37.5 },
///     members: vec![Place::unidentified("x", "park"); n],
/// };
/// let allocation = DayAllocator::allocate(&[cluster(0, 1), cluster(1, 3), cluster(2, 2)], 2);
/// assert_eq!(allocation.days, vec![vec![1], vec![2, 0]]);
/// assert_eq!(allocation.loads, vec![3, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DayAllocator;

impl DayAllocator {
    /// Assign `clusters` across `days` days.
    #[must_use]
    pub fn allocate(clusters: &[Cluster], days: usize) -> DayAllocation {
        let mut allocation = DayAllocation {
            days: vec![Vec::new(); days],
            loads: vec![0; days],
        };
        if days == 0 {
            return allocation;
        }
        let mut order: Vec<usize> = (0..clusters.len()).collect();
        order.sort_by_key(|i| std::cmp::Reverse(clusters.get(*i).map_or(0, Cluster::len)));
        for index in order {
            let size = clusters.get(index).map_or(0, Cluster::len);
            let Some(day) = allocation.lightest_day() else {
                break;
            };
            if let Some(list) = allocation.days.get_mut(day) {
                list.push(index);
            }
            if let Some(load) = allocation.loads.get_mut(day) {
                *load += size;
            }
        }
        allocation
    }
}
