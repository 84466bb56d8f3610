//! Filling days up to the target place count from the candidate pool.

use geo::Coord;
use itinerant_core::{
    CandidateIndex, Place, PlannerConfig, TravelStyle, UniquenessLedger, haversine_km,
};
use log::{debug, warn};

/// Places chosen for one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Augmentation {
    /// Chosen candidates, already claimed in the ledger for the day.
    pub places: Vec<Place>,
    /// How many of `places` came from the relaxed pass.
    pub relaxed: usize,
    /// Whether the relaxed pass had to run.
    pub used_fallback: bool,
    /// How many places were still missing after both passes.
    pub shortfall: usize,
}

/// Selects unused, well-rated candidates near a day's centres.
///
/// The strict pass looks within `radius_km` of each centre and applies the
/// quality and rating floors, nearest first with higher provider quality
/// breaking ties. When that does not yield enough places, a
/// relaxed pass drops the radius and uses the lower floors, ordered by
/// distance to the first centre. Both passes require a style match and
/// skip anything the ledger already holds, so a place is never chosen twice
/// across the trip.
#[derive(Debug, Clone, Copy)]
pub struct CandidateAugmenter<'a> {
    config: &'a PlannerConfig,
    pool: &'a [Place],
    index: &'a CandidateIndex,
}

impl<'a> CandidateAugmenter<'a> {
    /// Construct an augmenter over a scored `pool` and its spatial `index`.
    #[must_use]
    pub const fn new(config: &'a PlannerConfig, pool: &'a [Place], index: &'a CandidateIndex) -> Self {
        Self {
            config,
            pool,
            index,
        }
    }

    /// Choose up to `wanted` places for `day` around `centres`.
    ///
    /// Chosen places are claimed in `ledger` for `day` before they are
    /// returned.
    pub fn augment(
        &self,
        day: usize,
        centres: &[Coord<f64>],
        style: TravelStyle,
        wanted: usize,
        ledger: &mut UniquenessLedger,
    ) -> Augmentation {
        let mut outcome = Augmentation::default();
        if wanted == 0 {
            return outcome;
        }
        self.strict_pass(day, centres, style, wanted, ledger, &mut outcome.places);
        if outcome.places.len() < wanted {
            outcome.used_fallback = true;
            let before = outcome.places.len();
            self.relaxed_pass(day, centres.first().copied(), style, wanted, ledger, &mut outcome.places);
            outcome.relaxed = outcome.places.len() - before;
            if outcome.relaxed > 0 {
                warn!(
                    "day {}: {} place(s) chosen with relaxed criteria",
                    day + 1,
                    outcome.relaxed
                );
            }
        }
        outcome.shortfall = wanted.saturating_sub(outcome.places.len());
        if outcome.shortfall > 0 {
            warn!(
                "day {}: {} of {wanted} place(s) could not be filled",
                day + 1,
                outcome.shortfall
            );
        }
        outcome
    }

    fn per_centre(&self, wanted: usize, centres: usize) -> usize {
        self.config
            .per_center_take
            .unwrap_or_else(|| wanted.div_ceil(centres.max(1)))
            .max(1)
    }

    fn strict_pass(
        &self,
        day: usize,
        centres: &[Coord<f64>],
        style: TravelStyle,
        wanted: usize,
        ledger: &mut UniquenessLedger,
        chosen: &mut Vec<Place>,
    ) {
        let take = self.per_centre(wanted, centres.len());
        for centre in centres {
            let mut hits: Vec<(usize, f64)> = self
                .index
                .within_radius(*centre, self.config.radius_km)
                .into_iter()
                .filter(|(i, _)| self.pool.get(*i).is_some_and(|p| self.passes_strict(p, style)))
                .collect();
            hits.sort_by(|a, b| {
                a.1.total_cmp(&b.1)
                    .then_with(|| self.quality_of(b.0).total_cmp(&self.quality_of(a.0)))
                    .then(a.0.cmp(&b.0))
            });
            let mut taken = 0;
            for (index, _) in hits {
                if taken >= take || chosen.len() >= wanted {
                    break;
                }
                let Some(place) = self.pool.get(index) else {
                    continue;
                };
                if claim(ledger, place, day, chosen) {
                    taken += 1;
                }
            }
            debug!("day {}: strict pass took {taken} near centre", day + 1);
            if chosen.len() >= wanted {
                break;
            }
        }
    }

    fn relaxed_pass(
        &self,
        day: usize,
        anchor: Option<Coord<f64>>,
        style: TravelStyle,
        wanted: usize,
        ledger: &mut UniquenessLedger,
        chosen: &mut Vec<Place>,
    ) {
        let distance = |place: &Place| match (anchor, place.valid_location()) {
            (Some(a), Some(b)) => haversine_km(a, b),
            _ => f64::INFINITY,
        };
        let mut candidates: Vec<(usize, f64)> = self
            .pool
            .iter()
            .enumerate()
            .filter(|(_, p)| self.passes_relaxed(p, style))
            .map(|(i, p)| (i, distance(p)))
            .collect();
        candidates.sort_by(|a, b| {
            a.1.total_cmp(&b.1)
                .then_with(|| self.quality_of(b.0).total_cmp(&self.quality_of(a.0)))
                .then(a.0.cmp(&b.0))
        });
        for (index, _) in candidates {
            if chosen.len() >= wanted {
                break;
            }
            if let Some(place) = self.pool.get(index) {
                claim(ledger, place, day, chosen);
            }
        }
    }

    fn passes_strict(&self, place: &Place, style: TravelStyle) -> bool {
        place.quality_score >= self.config.quality_floor
            && place.rating.is_none_or(|r| r >= self.config.rating_floor)
            && self.config.style_keywords.matches(style, place)
    }

    fn passes_relaxed(&self, place: &Place, style: TravelStyle) -> bool {
        place.quality_score >= self.config.relaxed_quality_floor
            && place.rating.is_none_or(|r| r >= self.config.relaxed_rating_floor)
            && self.config.style_keywords.matches(style, place)
    }

    fn quality_of(&self, index: usize) -> f32 {
        self.pool.get(index).map_or(0.0, |p| p.quality_score)
    }
}

fn claim(ledger: &mut UniquenessLedger, place: &Place, day: usize, chosen: &mut Vec<Place>) -> bool {
    if ledger.contains(place) || !ledger.claim(place, day) {
        return false;
    }
    chosen.push(place.clone());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinerant_core::{KeyNormaliser, StyleKeywords, test_support::place};
    use rstest::{fixture, rstest};

    const CENTRE: Coord<f64> = Coord { x: 127.0, y: 37.5 };

    #[fixture]
    fn config() -> PlannerConfig {
        PlannerConfig {
            style_keywords: StyleKeywords::permissive(),
            ..PlannerConfig::default()
        }
    }

    fn ledger() -> UniquenessLedger {
        UniquenessLedger::new(KeyNormaliser::default())
    }

    fn ring(n: u32) -> Vec<Place> {
        (0..n)
            .map(|i| place(&format!("c{i}"), 37.5 + f64::from(i + 1) * 0.001, 127.0, "museum"))
            .collect()
    }

    #[rstest]
    fn nearest_candidates_win(config: PlannerConfig) {
        let pool = ring(6);
        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&config, &pool, &index);
        let mut ledger = ledger();
        let outcome = augmenter.augment(0, &[CENTRE], TravelStyle::Sightseeing, 3, &mut ledger);
        let ids: Vec<_> = outcome.places.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, ["c0", "c1", "c2"]);
        assert!(!outcome.used_fallback);
        let first = pool.first().expect("pool has places");
        assert_eq!(ledger.owner(first), Some(0));
    }

    #[rstest]
    fn ledger_entries_are_skipped(config: PlannerConfig) {
        let pool = ring(4);
        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&config, &pool, &index);
        let mut ledger = ledger();
        let first = pool.first().expect("pool has places");
        assert!(ledger.claim(first, 1));
        let outcome = augmenter.augment(0, &[CENTRE], TravelStyle::Sightseeing, 2, &mut ledger);
        let ids: Vec<_> = outcome.places.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, ["c1", "c2"]);
    }

    #[rstest]
    fn far_candidates_need_the_relaxed_pass(config: PlannerConfig) {
        let mut pool = ring(1);
        pool.push(place("far", 38.5, 127.0, "museum"));
        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&config, &pool, &index);
        let outcome = augmenter.augment(0, &[CENTRE], TravelStyle::Sightseeing, 2, &mut ledger());
        assert_eq!(outcome.places.len(), 2);
        assert!(outcome.used_fallback);
        assert_eq!(outcome.relaxed, 1);
        assert_eq!(outcome.shortfall, 0);
    }

    #[rstest]
    fn relaxed_floors_still_apply(config: PlannerConfig) {
        let pool = vec![
            place("weak", 37.501, 127.0, "museum").with_quality(0.4),
            place("poor", 37.502, 127.0, "museum").with_quality(0.1),
            place("low", 37.503, 127.0, "museum").with_rating(2.0),
        ];
        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&config, &pool, &index);
        let outcome = augmenter.augment(0, &[CENTRE], TravelStyle::Sightseeing, 3, &mut ledger());
        let ids: Vec<_> = outcome.places.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, ["weak"]);
        assert_eq!(outcome.shortfall, 2);
    }

    #[rstest]
    fn style_mismatch_is_never_chosen() {
        let config = PlannerConfig::default();
        let pool = vec![
            place("m", 37.501, 127.0, "museum"),
            place("r", 37.502, 127.0, "korean restaurant"),
        ];
        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&config, &pool, &index);
        let outcome = augmenter.augment(0, &[CENTRE], TravelStyle::Food, 2, &mut ledger());
        let ids: Vec<_> = outcome.places.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, ["r"]);
    }

    #[rstest]
    fn missing_rating_passes_the_floor(config: PlannerConfig) {
        let mut unrated = place("u", 37.501, 127.0, "museum");
        unrated.rating = None;
        let pool = vec![unrated];
        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&config, &pool, &index);
        let outcome = augmenter.augment(0, &[CENTRE], TravelStyle::Sightseeing, 1, &mut ledger());
        assert_eq!(outcome.places.len(), 1);
        assert!(!outcome.used_fallback);
    }

    #[rstest]
    fn takes_are_spread_over_centres(config: PlannerConfig) {
        let other = Coord { x: 127.1, y: 37.5 };
        let mut pool = ring(4);
        pool.extend((0..4).map(|i| {
            place(&format!("o{i}"), 37.5 + f64::from(i + 1) * 0.001, 127.1, "museum")
        }));
        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&config, &pool, &index);
        let outcome =
            augmenter.augment(0, &[CENTRE, other], TravelStyle::Sightseeing, 4, &mut ledger());
        let ids: Vec<_> = outcome.places.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, ["c0", "c1", "o0", "o1"]);
    }

    #[rstest]
    fn equal_distances_prefer_provider_quality(config: PlannerConfig) {
        let pool = vec![
            place("popular", 37.501, 127.0, "museum").with_quality(0.7).scored(0.95),
            place("curated", 37.501, 127.0, "museum").with_quality(0.9).scored(0.1),
        ];
        let index = CandidateIndex::new(&pool);
        let augmenter = CandidateAugmenter::new(&config, &pool, &index);
        let outcome = augmenter.augment(0, &[CENTRE], TravelStyle::Sightseeing, 1, &mut ledger());
        let ids: Vec<_> = outcome.places.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, ["curated"]);
    }
}
