//! Distributing a day's places across its time blocks.

use std::collections::HashSet;

use chrono::{NaiveDate, TimeDelta};
use itinerant_core::{
    BlockAffinity, CanonicalKey, ConfirmedEvent, DayPlan, Place, PlannerConfig, TimeBlockSet,
    UniquenessLedger,
};
use log::{debug, warn};

/// Outcome of scheduling one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    /// The bucketed day.
    pub plan: DayPlan,
    /// Notes about places that could not be placed or blocks left empty.
    pub warnings: Vec<String>,
    /// Places left out, in the order they were rejected.
    pub dropped: Vec<Place>,
}

/// Buckets a day's places into its time blocks.
///
/// Confirmed events and other time-pinned places go to the block holding
/// their start time. Blocks lying entirely inside a pinned window take no
/// movable places, and every other block the window overlaps loses one
/// slot. User-selected places are placed before augmented ones, each into
/// the first block of its category's preference list with room, falling
/// back to the least-loaded block with room. No block takes more than
/// `block_capacity` movable places. Once everything is placed, movable
/// places are shifted out of crowded blocks into empty ones.
#[derive(Debug, Clone, Copy)]
pub struct TimeBlockScheduler<'a> {
    blocks: &'a TimeBlockSet,
    affinity: &'a BlockAffinity,
    capacity: usize,
}

/// Blocks touched by one pinned window.
struct Footprint {
    home: usize,
    spans: Vec<usize>,
    covered: Vec<usize>,
}

struct Occupancy {
    reserved: Vec<usize>,
    covered: Vec<bool>,
}

impl Occupancy {
    fn new(blocks: usize) -> Self {
        Self {
            reserved: vec![0; blocks],
            covered: vec![false; blocks],
        }
    }

    fn mark(&mut self, footprint: &Footprint) {
        for index in &footprint.spans {
            if let Some(reserved) = self.reserved.get_mut(*index) {
                *reserved += 1;
            }
        }
        for index in &footprint.covered {
            if let Some(covered) = self.covered.get_mut(*index) {
                *covered = true;
            }
        }
    }

    fn is_covered(&self, index: usize) -> bool {
        self.covered.get(index).copied().unwrap_or(false)
    }
}

struct Board {
    plan: DayPlan,
    occupancy: Occupancy,
    seen: HashSet<CanonicalKey>,
    warnings: Vec<String>,
    dropped: Vec<Place>,
}

impl Board {
    fn load(&self, index: usize) -> usize {
        let placed = self.plan.blocks.get(index).map_or(0, |slot| slot.places.len());
        placed + self.occupancy.reserved.get(index).copied().unwrap_or(0)
    }

    fn has_room(&self, index: usize, capacity: usize) -> bool {
        !self.occupancy.is_covered(index) && self.load(index) < capacity
    }

    fn put(&mut self, index: usize, place: Place) {
        if let Some(slot) = self.plan.blocks.get_mut(index) {
            slot.places.push(place);
        }
    }

    fn drop_place(&mut self, place: Place, reason: &str) {
        let note = format!("day {}: {:?} {reason}", self.plan.day_index + 1, place.name);
        warn!("{note}");
        self.warnings.push(note);
        self.dropped.push(place);
    }

    /// Give `place` back to the trip when the day could not keep it.
    fn release(&self, place: &Place, ledger: &mut UniquenessLedger) {
        let held: Vec<CanonicalKey> = self
            .plan
            .places()
            .flat_map(|kept| ledger.keys().identity_keys(kept))
            .collect();
        if ledger.release(place, self.plan.day_index, &held) > 0 {
            debug!("{:?} is free for other days", place.name);
        }
    }
}

impl<'a> TimeBlockScheduler<'a> {
    /// Construct a scheduler over explicit tables.
    #[must_use]
    pub const fn new(blocks: &'a TimeBlockSet, affinity: &'a BlockAffinity, capacity: usize) -> Self {
        Self {
            blocks,
            affinity,
            capacity,
        }
    }

    /// Construct a scheduler from planner configuration.
    #[must_use]
    pub const fn from_config(config: &'a PlannerConfig) -> Self {
        Self::new(&config.blocks, &config.block_affinity, config.block_capacity)
    }

    /// Number of movable places a day with `selected` and `events` can
    /// still take.
    ///
    /// Pinned windows are counted as [`schedule`](Self::schedule) counts
    /// them and movable selections use up slots first.
    #[must_use]
    pub fn room(&self, selected: &[Place], events: &[ConfirmedEvent]) -> usize {
        let mut occupancy = Occupancy::new(self.blocks.len());
        let mut homes = vec![0_usize; self.blocks.len()];
        let pinned = events
            .iter()
            .map(ConfirmedEvent::to_place)
            .chain(selected.iter().filter(|p| p.pinned_at().is_some()).cloned());
        for place in pinned {
            if let Some(footprint) = self.footprint(&place) {
                occupancy.mark(&footprint);
                if let Some(home) = homes.get_mut(footprint.home) {
                    *home += 1;
                }
            }
        }
        let free: usize = (0..self.blocks.len())
            .filter(|index| !occupancy.is_covered(*index))
            .map(|index| {
                let used = homes.get(index).copied().unwrap_or(0)
                    + occupancy.reserved.get(index).copied().unwrap_or(0);
                self.capacity.saturating_sub(used)
            })
            .sum();
        let movable = selected.iter().filter(|p| p.pinned_at().is_none()).count();
        free.saturating_sub(movable)
    }

    /// Schedule one day.
    ///
    /// Every place is checked against a day-local set of canonical keys so
    /// the same place is never listed twice in one day, and claimed in
    /// `ledger` for `day_index` so it never appears on another day. Movable
    /// places that find no room are released from `ledger` again.
    pub fn schedule(
        &self,
        date: NaiveDate,
        day_index: usize,
        selected: &[Place],
        augmented: &[Place],
        events: &[ConfirmedEvent],
        ledger: &mut UniquenessLedger,
    ) -> DaySchedule {
        let mut board = Board {
            plan: DayPlan::new(date, day_index, self.blocks.blocks()),
            occupancy: Occupancy::new(self.blocks.len()),
            seen: HashSet::new(),
            warnings: Vec::new(),
            dropped: Vec::new(),
        };

        let mut pinned: Vec<Place> = events.iter().map(ConfirmedEvent::to_place).collect();
        pinned.extend(
            selected
                .iter()
                .chain(augmented)
                .filter(|p| p.pinned_at().is_some())
                .cloned(),
        );
        pinned.sort_by_key(|p| p.fixed_time);
        for place in pinned {
            self.pin(&mut board, place, ledger);
        }
        for place in selected.iter().chain(augmented) {
            if place.pinned_at().is_none() {
                self.place_movable(&mut board, place, ledger);
            }
        }

        self.redistribute(&mut board);
        let empty = board
            .plan
            .blocks
            .iter()
            .enumerate()
            .filter(|(index, slot)| slot.places.is_empty() && !board.occupancy.is_covered(*index))
            .count();
        if empty > 0 {
            let note = format!(
                "day {}: {empty} time block(s) left empty with {} place(s) for {} blocks",
                day_index + 1,
                board.plan.place_count(),
                self.blocks.len()
            );
            debug!("{note}");
            board.warnings.push(note);
        }
        DaySchedule {
            plan: board.plan,
            warnings: board.warnings,
            dropped: board.dropped,
        }
    }

    fn footprint(&self, place: &Place) -> Option<Footprint> {
        let start = place.pinned_at()?;
        let until = place.pinned_until(TimeDelta::zero())?;
        let from = start.time();
        let to = if until.date() == start.date() {
            until.time()
        } else {
            self.blocks.blocks().last().map_or(from, |b| b.end.max(from))
        };
        let home = self.blocks.index_for(from);
        let covered = self.blocks.covered(from, to);
        let spans = self
            .blocks
            .overlapping(from, to)
            .into_iter()
            .filter(|index| *index != home && !covered.contains(index))
            .collect();
        Some(Footprint {
            home,
            spans,
            covered,
        })
    }

    fn pin(&self, board: &mut Board, place: Place, ledger: &mut UniquenessLedger) {
        let Some(footprint) = self.footprint(&place) else {
            return;
        };
        if !admit(board, &place, ledger) {
            return;
        }
        board.occupancy.mark(&footprint);
        board.put(footprint.home, place);
    }

    fn place_movable(&self, board: &mut Board, place: &Place, ledger: &mut UniquenessLedger) {
        let preferred = self
            .affinity
            .preferences(place)
            .iter()
            .filter_map(|name| self.blocks.position(name))
            .find(|index| board.has_room(*index, self.capacity));
        let target = preferred.or_else(|| {
            (0..self.blocks.len())
                .filter(|index| board.has_room(*index, self.capacity))
                .min_by_key(|index| (board.load(*index), *index))
        });
        let Some(index) = target else {
            if !board.seen.contains(&ledger.keys().canonical_key(place)) {
                board.release(place, ledger);
                board.drop_place(place.clone(), "dropped: every time block is full");
            }
            return;
        };
        if admit(board, place, ledger) {
            board.put(index, place.clone());
        }
    }

    fn redistribute(&self, board: &mut Board) {
        loop {
            let Some(empty) = (0..board.plan.blocks.len()).find(|index| {
                board
                    .plan
                    .blocks
                    .get(*index)
                    .is_some_and(|slot| slot.places.is_empty())
                    && board.has_room(*index, self.capacity)
            }) else {
                return;
            };
            let donor = board
                .plan
                .blocks
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.places.len() > 1 && slot.places.iter().any(|p| !p.is_fixed))
                .max_by_key(|(index, slot)| (slot.places.len(), std::cmp::Reverse(*index)))
                .map(|(index, _)| index);
            let Some(donor) = donor else {
                return;
            };
            let moved = board.plan.blocks.get_mut(donor).and_then(|slot| {
                let position = slot.places.iter().rposition(|p| !p.is_fixed)?;
                Some(slot.places.remove(position))
            });
            let Some(place) = moved else {
                return;
            };
            debug!(
                "moving {:?} from {} to {}",
                place.name,
                self.blocks.blocks().get(donor).map_or("?", |b| b.name.as_str()),
                self.blocks.blocks().get(empty).map_or("?", |b| b.name.as_str())
            );
            board.put(empty, place);
        }
    }
}

/// Record `place` for the board's day, refusing duplicates within the day
/// and places another day already owns.
fn admit(board: &mut Board, place: &Place, ledger: &mut UniquenessLedger) -> bool {
    let key = ledger.keys().canonical_key(place);
    if board.seen.contains(&key) {
        debug!("skipping duplicate {:?} on day {}", place.name, board.plan.day_index + 1);
        return false;
    }
    let day = board.plan.day_index;
    let claimed = if place.pinned_at().is_some() {
        ledger.claim_pinned(place, day)
    } else {
        ledger.claim(place, day)
    };
    if !claimed {
        let owner = ledger.owner(place).map_or(0, |d| d + 1);
        board.drop_place(place.clone(), &format!("dropped: already planned for day {owner}"));
        return false;
    }
    board.seen.insert(key);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};
    use itinerant_core::{EventKind, KeyNormaliser, test_support::place};
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> PlannerConfig {
        PlannerConfig::default()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date")
    }

    fn at(h: u32) -> NaiveDateTime {
        date().and_time(NaiveTime::from_hms_opt(h, 0, 0).expect("valid time"))
    }

    fn ledger() -> UniquenessLedger {
        UniquenessLedger::new(KeyNormaliser::default())
    }

    fn ids(plan: &DayPlan, block: &str) -> Vec<String> {
        plan.block(block)
            .unwrap_or_default()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    #[rstest]
    fn categories_follow_their_affinity(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let places = vec![
            place("m", 37.5, 127.0, "museum"),
            place("r", 37.5, 127.0, "restaurant"),
            place("b", 37.5, 127.0, "rooftop bar"),
            place("c", 37.5, 127.0, "cafe"),
        ];
        let day = scheduler.schedule(date(), 0, &places, &[], &[], &mut ledger());
        assert_eq!(ids(&day.plan, "morning"), ["Place m"]);
        assert_eq!(ids(&day.plan, "lunch"), ["Place r"]);
        assert_eq!(ids(&day.plan, "afternoon"), ["Place c"]);
        assert_eq!(ids(&day.plan, "evening"), ["Place b"]);
        assert!(day.warnings.is_empty());
    }

    #[rstest]
    fn crowded_preferences_spill_to_empty_blocks(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let places: Vec<Place> = (0..4)
            .map(|i| place(&format!("m{i}"), 37.5, 127.0, "museum"))
            .collect();
        let day = scheduler.schedule(date(), 0, &places, &[], &[], &mut ledger());
        assert!(day.plan.blocks.iter().all(|s| !s.places.is_empty()));
        assert!(day.plan.blocks.iter().all(|s| s.places.len() <= config.block_capacity));
        assert_eq!(day.plan.place_count(), 4);
    }

    #[rstest]
    fn events_are_pinned_by_start_time(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let event = ConfirmedEvent::new(EventKind::Ticket, "Nanta show", at(14));
        let day = scheduler.schedule(date(), 0, &[], &[], &[event], &mut ledger());
        let lunch = day.plan.block("lunch").unwrap_or_default();
        assert_eq!(lunch.len(), 1);
        assert!(lunch.iter().all(|p| p.is_fixed));
    }

    #[rstest]
    fn fixed_places_are_never_moved(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let events = vec![
            ConfirmedEvent::new(EventKind::Ticket, "Show", at(19)),
            ConfirmedEvent::new(EventKind::Restaurant, "Dinner", at(20)),
        ];
        let day = scheduler.schedule(date(), 0, &[], &[], &events, &mut ledger());
        assert_eq!(day.plan.block("evening").map(<[Place]>::len), Some(2));
        assert_eq!(day.plan.block("morning").map(<[Place]>::len), Some(0));
    }

    #[rstest]
    fn duplicates_within_a_day_are_listed_once(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let a = Place::unidentified("N Seoul Tower", "landmark").at(37.55, 126.99);
        let b = Place::unidentified("N Seoul Tower Night View", "landmark").at(37.55, 126.99);
        let day = scheduler.schedule(date(), 0, &[a], &[b], &[], &mut ledger());
        assert_eq!(day.plan.place_count(), 1);
    }

    #[rstest]
    fn places_owned_by_other_days_are_dropped(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let palace = place("p", 37.5, 127.0, "palace");
        let mut ledger = ledger();
        assert!(ledger.claim(&palace, 0));
        let day = scheduler.schedule(date(), 1, &[palace], &[], &[], &mut ledger);
        assert_eq!(day.plan.place_count(), 0);
        assert_eq!(day.dropped.len(), 1);
        assert!(day.warnings.iter().any(|w| w.contains("day 1")));
    }

    #[rstest]
    fn overflow_is_reported() {
        let config = PlannerConfig {
            block_capacity: 1,
            ..PlannerConfig::default()
        };
        let scheduler = TimeBlockScheduler::from_config(&config);
        let places: Vec<Place> = (0..5)
            .map(|i| place(&format!("p{i}"), 37.5, 127.0, "park"))
            .collect();
        let day = scheduler.schedule(date(), 0, &places, &[], &[], &mut ledger());
        assert_eq!(day.plan.place_count(), 4);
        assert_eq!(day.dropped.len(), 1);
    }

    #[rstest]
    fn sparse_days_note_their_empty_blocks(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let places = vec![place("m", 37.5, 127.0, "museum")];
        let day = scheduler.schedule(date(), 0, &places, &[], &[], &mut ledger());
        assert_eq!(day.plan.place_count(), 1);
        assert!(day.warnings.iter().any(|w| w.contains("3 time block(s) left empty")));
    }

    #[rstest]
    fn long_events_keep_visits_out_of_covered_blocks(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let mut tour = ConfirmedEvent::new(EventKind::Ticket, "DMZ tour", at(10));
        tour.end = Some(at(16));
        let places: Vec<Place> = (0..3)
            .map(|i| place(&format!("c{i}"), 37.5, 127.0, "cafe"))
            .collect();
        let day = scheduler.schedule(date(), 0, &places, &[], &[tour], &mut ledger());
        assert_eq!(ids(&day.plan, "morning"), ["DMZ tour", "Place c2"]);
        assert!(ids(&day.plan, "lunch").is_empty());
        // afternoon keeps one slot for the end of the tour
        assert_eq!(ids(&day.plan, "afternoon"), ["Place c0"]);
        assert_eq!(ids(&day.plan, "evening"), ["Place c1"]);
        assert!(day.warnings.is_empty());
    }

    #[rstest]
    fn room_accounts_for_pinned_windows(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        assert_eq!(scheduler.room(&[], &[]), 8);
        let mut tour = ConfirmedEvent::new(EventKind::Ticket, "DMZ tour", at(10));
        tour.end = Some(at(16));
        let selected = vec![place("a", 37.5, 127.0, "museum")];
        // morning and afternoon lose a slot each, lunch is covered
        assert_eq!(scheduler.room(&selected, &[tour]), 3);
    }

    #[rstest]
    fn repeated_booking_titles_stay_on_their_days(config: PlannerConfig) {
        let scheduler = TimeBlockScheduler::from_config(&config);
        let mut check_in = ConfirmedEvent::new(EventKind::Hotel, "Lotte Hotel Seoul", at(15));
        check_in.reference = Some("BK1".to_owned());
        let mut check_out = check_in.clone();
        check_out.start = date()
            .succ_opt()
            .expect("valid date")
            .and_time(NaiveTime::from_hms_opt(11, 0, 0).expect("valid time"));
        let mut ledger = ledger();
        let first = scheduler.schedule(date(), 0, &[], &[], &[check_in], &mut ledger);
        let second = scheduler.schedule(
            check_out.date(),
            1,
            &[],
            &[],
            &[check_out],
            &mut ledger,
        );
        assert!(first.plan.has_fixed());
        assert!(second.plan.has_fixed());
        assert!(second.dropped.is_empty());
        assert_eq!(ids(&second.plan, "morning"), ["Lotte Hotel Seoul"]);
    }

    #[rstest]
    fn places_without_room_are_released() {
        let config = PlannerConfig {
            block_capacity: 1,
            ..PlannerConfig::default()
        };
        let scheduler = TimeBlockScheduler::from_config(&config);
        let places: Vec<Place> = (0..5)
            .map(|i| place(&format!("p{i}"), 37.5, 127.0, "park"))
            .collect();
        let mut ledger = ledger();
        for candidate in &places {
            assert!(ledger.claim(candidate, 0));
        }
        let day = scheduler.schedule(date(), 0, &[], &places, &[], &mut ledger);
        let left_out = day.dropped.first().expect("one place has no room");
        assert_eq!(ledger.owner(left_out), None);
        assert!(ledger.claim(left_out, 1));
        let kept = day.plan.places().next().expect("placed");
        assert_eq!(ledger.owner(kept), Some(0));
    }
}
