//! Trip-wide record of places already placed on the itinerary.

use std::collections::HashMap;

use crate::{CanonicalKey, KeyNormaliser, Place};

/// Record of every place already placed in the itinerary under construction.
///
/// A ledger is created empty at the start of one planning call, threaded by
/// mutable reference through augmentation and scheduling, and dropped once
/// the itinerary is assembled. Each place is recorded under all of its
/// [identity keys](KeyNormaliser::identity_keys) together with the index of
/// the day that owns it. A claim by a different day is refused, which is
/// what makes a place appear at most once across the trip.
///
/// # Examples
/// ```
/// use itinerant_core::{KeyNormaliser, Place, UniquenessLedger};
///
/// let mut ledger = UniquenessLedger::new(KeyNormaliser::default());
/// let palace = Place::new("p1", "Gyeongbokgung", "palace");
///
/// assert!(ledger.claim(&palace, 0));
/// assert!(ledger.claim(&palace, 0));
/// assert!(!ledger.claim(&palace, 1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct UniquenessLedger {
    keys: KeyNormaliser,
    owners: HashMap<CanonicalKey, usize>,
}

impl UniquenessLedger {
    /// Create an empty ledger using `keys` for identity.
    #[must_use]
    pub fn new(keys: KeyNormaliser) -> Self {
        Self {
            keys,
            owners: HashMap::new(),
        }
    }

    /// Normaliser backing this ledger.
    #[must_use]
    pub const fn keys(&self) -> &KeyNormaliser {
        &self.keys
    }

    /// Report whether any identity key of `place` is already recorded.
    #[must_use]
    pub fn contains(&self, place: &Place) -> bool {
        self.keys
            .identity_keys(place)
            .iter()
            .any(|key| self.owners.contains_key(key))
    }

    /// Day owning `place`, if it has been claimed.
    #[must_use]
    pub fn owner(&self, place: &Place) -> Option<usize> {
        self.keys
            .identity_keys(place)
            .iter()
            .find_map(|key| self.owners.get(key).copied())
    }

    /// Record `place` as belonging to `day`.
    ///
    /// Returns `true` when the place was unrecorded, or already recorded for
    /// the same day. Returns `false`, leaving the ledger untouched, when
    /// another day owns any of its keys.
    pub fn claim(&mut self, place: &Place, day: usize) -> bool {
        let keys = self.keys.identity_keys(place);
        let foreign = keys
            .iter()
            .filter_map(|key| self.owners.get(key))
            .any(|owner| *owner != day);
        if foreign {
            return false;
        }
        for key in keys {
            self.owners.entry(key).or_insert(day);
        }
        true
    }

    /// Record a time-pinned place as belonging to `day`.
    ///
    /// Bookings routinely repeat a title across days, such as a hotel
    /// check-in and check-out, so only the canonical key can refuse the
    /// claim. The name keys are still recorded for `day` when free, which
    /// keeps candidates listed under the same name out of the itinerary.
    pub fn claim_pinned(&mut self, place: &Place, day: usize) -> bool {
        let canonical = self.keys.canonical_key(place);
        if self.owners.get(&canonical).is_some_and(|owner| *owner != day) {
            return false;
        }
        for key in self.keys.identity_keys(place) {
            self.owners.entry(key).or_insert(day);
        }
        true
    }

    /// Forget the keys of `place` that `day` owns, except those in `held`.
    ///
    /// Used when a claimed place is finally left out of its day, so another
    /// day may still pick it. Keys shared with places the day keeps belong
    /// in `held`. Returns the number of keys removed.
    pub fn release(&mut self, place: &Place, day: usize, held: &[CanonicalKey]) -> usize {
        let mut removed = 0;
        for key in self.keys.identity_keys(place) {
            if held.contains(&key) || self.owners.get(&key) != Some(&day) {
                continue;
            }
            self.owners.remove(&key);
            removed += 1;
        }
        removed
    }

    /// Number of distinct keys recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Report whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ledger() -> UniquenessLedger {
        UniquenessLedger::new(KeyNormaliser::default())
    }

    #[rstest]
    fn fresh_ledger_is_empty(ledger: UniquenessLedger) {
        assert!(ledger.is_empty());
        assert!(!ledger.contains(&Place::new("a", "A", "park")));
    }

    #[rstest]
    fn claim_records_all_identity_keys(mut ledger: UniquenessLedger) {
        let place = Place::new("a", "Namsan Tower", "landmark");
        assert!(ledger.claim(&place, 2));
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.owner(&place), Some(2));
    }

    #[rstest]
    fn relabelled_place_is_recognised(mut ledger: UniquenessLedger) {
        let first = Place::new("a", "Namsan Tower", "landmark");
        let relabelled = Place::new("b", "Namsan Observatory", "landmark");
        assert!(ledger.claim(&first, 0));
        assert!(ledger.contains(&relabelled));
        assert!(!ledger.claim(&relabelled, 1));
    }

    #[rstest]
    fn refused_claim_leaves_ledger_unchanged(mut ledger: UniquenessLedger) {
        let place = Place::new("a", "Bukchon", "village");
        assert!(ledger.claim(&place, 0));
        let before = ledger.len();
        assert!(!ledger.claim(&place, 1));
        assert_eq!(ledger.len(), before);
        assert_eq!(ledger.owner(&place), Some(0));
    }

    #[rstest]
    fn pinned_bookings_may_share_a_title(mut ledger: UniquenessLedger) {
        let check_in = Place::new("BK1:20250501T1500", "Lotte Hotel Seoul", "accommodation");
        let check_out = Place::new("BK1:20250503T1100", "Lotte Hotel Seoul", "accommodation");
        assert!(ledger.claim_pinned(&check_in, 0));
        assert!(ledger.claim_pinned(&check_out, 2));
        let listing = Place::new("poi-9", "Lotte Hotel Seoul", "hotel");
        assert!(!ledger.claim(&listing, 1));
    }

    #[rstest]
    fn pinned_claim_refuses_its_own_key_on_another_day(mut ledger: UniquenessLedger) {
        let booking = Place::new("BK1:20250501T1500", "Lotte Hotel Seoul", "accommodation");
        assert!(ledger.claim_pinned(&booking, 0));
        assert!(!ledger.claim_pinned(&booking, 1));
    }

    #[rstest]
    fn released_places_can_move_to_another_day(mut ledger: UniquenessLedger) {
        let place = Place::new("a", "Bukchon", "village");
        assert!(ledger.claim(&place, 0));
        assert_eq!(ledger.release(&place, 0, &[]), 3);
        assert!(ledger.is_empty());
        assert!(ledger.claim(&place, 1));
    }

    #[rstest]
    fn release_keeps_held_and_foreign_keys(mut ledger: UniquenessLedger) {
        let kept = Place::new("a", "Namsan Tower", "landmark");
        let variant = Place::new("b", "Namsan Tower", "landmark");
        assert!(ledger.claim(&kept, 0));
        let held = ledger.keys().identity_keys(&kept);
        assert_eq!(ledger.release(&variant, 0, &held), 0);
        assert_eq!(ledger.release(&kept, 1, &[]), 0);
        assert_eq!(ledger.owner(&kept), Some(0));
    }
}
