//! Named windows of the travelling day.

use chrono::NaiveTime;

/// A named time-of-day window, e.g. `morning` from 09:00 to 12:00.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBlock {
    /// Block label used as the key in day plans.
    pub name: String,
    /// Inclusive start.
    pub start: NaiveTime,
    /// Exclusive end.
    pub end: NaiveTime,
}

impl TimeBlock {
    /// Construct a block.
    #[must_use]
    pub fn new(name: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Report whether `time` falls inside this block.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    /// Report whether the half-open interval `[from, to)` overlaps this block.
    #[must_use]
    pub fn overlaps(&self, from: NaiveTime, to: NaiveTime) -> bool {
        from < self.end && self.start < to
    }

    /// Report whether `[from, to)` spans the whole block.
    #[must_use]
    pub fn covered_by(&self, from: NaiveTime, to: NaiveTime) -> bool {
        from <= self.start && self.end <= to
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Chronologically ordered time blocks spanning the travelling hours.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use itinerant_core::TimeBlockSet;
///
/// let blocks = TimeBlockSet::default();
/// let two_pm = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
/// assert_eq!(blocks.index_for(two_pm), 1);
/// assert_eq!(blocks.names(), ["morning", "lunch", "afternoon", "evening"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<TimeBlock>", into = "Vec<TimeBlock>")
)]
pub struct TimeBlockSet {
    blocks: Vec<TimeBlock>,
}

impl Default for TimeBlockSet {
    fn default() -> Self {
        Self {
            blocks: vec![
                TimeBlock::new("morning", hour(9), hour(12)),
                TimeBlock::new("lunch", hour(12), hour(15)),
                TimeBlock::new("afternoon", hour(15), hour(18)),
                TimeBlock::new("evening", hour(18), hour(21)),
            ],
        }
    }
}

impl From<Vec<TimeBlock>> for TimeBlockSet {
    fn from(blocks: Vec<TimeBlock>) -> Self {
        Self::new(blocks)
    }
}

impl From<TimeBlockSet> for Vec<TimeBlock> {
    fn from(value: TimeBlockSet) -> Self {
        value.blocks
    }
}

impl TimeBlockSet {
    /// Build a set, sorting blocks by start time.
    #[must_use]
    pub fn new(mut blocks: Vec<TimeBlock>) -> Self {
        blocks.sort_by_key(|b| b.start);
        Self { blocks }
    }

    /// Blocks in chronological order.
    #[must_use]
    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    /// Number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Report whether the set has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block labels in chronological order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.name.as_str()).collect()
    }

    /// Position of the block named `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.name == name)
    }

    /// Start of the first block, or midnight for an empty set.
    #[must_use]
    pub fn day_start(&self) -> NaiveTime {
        self.blocks.first().map_or(NaiveTime::MIN, |b| b.start)
    }

    /// Index of the block a pinned `time` belongs to.
    ///
    /// Times before the first block map to the first block and times after
    /// the last map to the last, so an early flight or late check-in still
    /// has a home. Times falling in a gap between blocks map to the next
    /// block.
    #[must_use]
    pub fn index_for(&self, time: NaiveTime) -> usize {
        if let Some(index) = self.blocks.iter().position(|b| b.contains(time)) {
            return index;
        }
        self.blocks
            .iter()
            .position(|b| time < b.start)
            .unwrap_or_else(|| self.blocks.len().saturating_sub(1))
    }

    /// Indices of every block overlapping `[from, to)`, always including the
    /// block `from` belongs to.
    #[must_use]
    pub fn overlapping(&self, from: NaiveTime, to: NaiveTime) -> Vec<usize> {
        let home = self.index_for(from);
        let mut indices: Vec<usize> = self
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.overlaps(from, to))
            .map(|(i, _)| i)
            .collect();
        if !indices.contains(&home) {
            indices.push(home);
            indices.sort_unstable();
        }
        indices
    }

    /// Indices of every block lying entirely inside `[from, to)`.
    #[must_use]
    pub fn covered(&self, from: NaiveTime, to: NaiveTime) -> Vec<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.covered_by(from, to))
            .map(|(i, _)| i)
            .collect()
    }
}
