//! One day of the itinerary, bucketed into time blocks.

use std::time::Duration;

use chrono::NaiveDate;

use crate::{Place, TimeBlock};

/// Places assigned to one time block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockSlot {
    /// The block.
    pub block: TimeBlock,
    /// Places in visiting order.
    pub places: Vec<Place>,
}

/// Schedule for a single calendar day.
///
/// Blocks are kept in chronological order, so iterating
/// [`DayPlan::blocks`] visits the day from morning to evening.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayPlan {
    /// Calendar date.
    pub date: NaiveDate,
    /// Zero-based position of the day in the trip.
    pub day_index: usize,
    /// Time blocks with their places.
    pub blocks: Vec<BlockSlot>,
    /// Dwell time plus routed travel time.
    #[cfg_attr(feature = "serde", serde(with = "duration_secs"))]
    pub estimated_duration: Duration,
}

impl DayPlan {
    /// Create a plan with the given blocks, all empty.
    #[must_use]
    pub fn new(date: NaiveDate, day_index: usize, blocks: &[TimeBlock]) -> Self {
        Self {
            date,
            day_index,
            blocks: blocks
                .iter()
                .map(|block| BlockSlot {
                    block: block.clone(),
                    places: Vec::new(),
                })
                .collect(),
            estimated_duration: Duration::ZERO,
        }
    }

    /// Places in the block named `name`.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<&[Place]> {
        self.blocks
            .iter()
            .find(|slot| slot.block.name == name)
            .map(|slot| slot.places.as_slice())
    }

    /// Every place of the day in block order.
    pub fn places(&self) -> impl Iterator<Item = &Place> + '_ {
        self.blocks.iter().flat_map(|slot| slot.places.iter())
    }

    /// Total number of places.
    #[must_use]
    pub fn place_count(&self) -> usize {
        self.blocks.iter().map(|slot| slot.places.len()).sum()
    }

    /// Report whether any place on the day is pinned.
    #[must_use]
    pub fn has_fixed(&self) -> bool {
        self.places().any(|p| p.is_fixed)
    }
}

/// Serialise [`Duration`] as whole seconds.
#[cfg(feature = "serde")]
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimeBlockSet;
    use rstest::rstest;

    #[rstest]
    fn new_plan_has_empty_blocks() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).expect("date");
        let plan = DayPlan::new(date, 0, TimeBlockSet::default().blocks());
        assert_eq!(plan.blocks.len(), 4);
        assert_eq!(plan.place_count(), 0);
        assert_eq!(plan.block("lunch"), Some(&[][..]));
        assert!(plan.block("brunch").is_none());
    }

    #[rstest]
    fn counts_places_across_blocks() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).expect("date");
        let mut plan = DayPlan::new(date, 0, TimeBlockSet::default().blocks());
        for (i, slot) in plan.blocks.iter_mut().enumerate() {
            slot.places.push(Place::new(format!("p{i}"), "P", "park"));
        }
        assert_eq!(plan.place_count(), 4);
        assert!(!plan.has_fixed());
    }
}
