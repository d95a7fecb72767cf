//! Contiguous slot ranges and the codec between slot sets and ranges.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LegendsError, LegendsResult};
use crate::slot::{SLOT_MINUTES, SlotKey};

/// Display metadata of the user a range belongs to, when denormalized for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOwner {
    pub name: String,
    pub emoji: String,
    pub avatar: String,
}

/// A run of contiguous slots on one day, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange", into = "RawRange")]
pub struct TimeRange {
    day_index: u8,
    start_slot: u8,
    end_slot: u8,
    owner: Option<RangeOwner>,
}

/// Unvalidated wire shape; every deserialized range goes through [`TimeRange::new`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRange {
    day_index: u8,
    start_slot: u8,
    end_slot: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<RangeOwner>,
}

impl TimeRange {
    pub fn new(day_index: u8, start_slot: u8, end_slot: u8) -> LegendsResult<Self> {
        // Validates day and both slot bounds
        SlotKey::new(day_index, start_slot)?;
        SlotKey::new(day_index, end_slot)?;

        if start_slot > end_slot {
            return Err(LegendsError::Validation(format!(
                "range start {} is after end {}",
                start_slot, end_slot
            )));
        }

        Ok(TimeRange {
            day_index,
            start_slot,
            end_slot,
            owner: None,
        })
    }

    /// Single-slot range.
    pub fn single(key: SlotKey) -> Self {
        TimeRange {
            day_index: key.day(),
            start_slot: key.slot(),
            end_slot: key.slot(),
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: RangeOwner) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn day_index(&self) -> u8 {
        self.day_index
    }

    pub fn start_slot(&self) -> u8 {
        self.start_slot
    }

    pub fn end_slot(&self) -> u8 {
        self.end_slot
    }

    pub fn owner(&self) -> Option<&RangeOwner> {
        self.owner.as_ref()
    }

    /// Number of slots covered.
    pub fn len(&self) -> usize {
        usize::from(self.end_slot - self.start_slot) + 1
    }

    pub fn contains(&self, key: SlotKey) -> bool {
        key.day() == self.day_index && (self.start_slot..=self.end_slot).contains(&key.slot())
    }

    /// Slot keys covered by this range, ascending.
    pub fn slots(&self) -> impl Iterator<Item = SlotKey> + '_ {
        (self.start_slot..=self.end_slot).filter_map(|slot| SlotKey::new(self.day_index, slot).ok())
    }

    /// Same coordinates as `other`, ignoring owner metadata.
    pub fn same_span(&self, other: &TimeRange) -> bool {
        self.day_index == other.day_index
            && self.start_slot == other.start_slot
            && self.end_slot == other.end_slot
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = SlotKey::new(self.day_index, self.start_slot).map_err(|_| fmt::Error)?;
        // The last slot of a day ends at 24:00
        let end_minutes = (u32::from(self.end_slot) + 1) * SLOT_MINUTES;
        write!(f, "{}-{:02}:{:02}", start.label(), end_minutes / 60, end_minutes % 60)
    }
}

impl TryFrom<RawRange> for TimeRange {
    type Error = LegendsError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        let range = TimeRange::new(raw.day_index, raw.start_slot, raw.end_slot)?;
        Ok(match raw.owner {
            Some(owner) => range.with_owner(owner),
            None => range,
        })
    }
}

impl From<TimeRange> for RawRange {
    fn from(range: TimeRange) -> Self {
        RawRange {
            day_index: range.day_index,
            start_slot: range.start_slot,
            end_slot: range.end_slot,
            owner: range.owner,
        }
    }
}

/// Compress a set of slot keys into maximal contiguous ranges.
///
/// Output is ascending by day, then start slot. Ranges never cross a day
/// boundary, and carry no owner metadata.
pub fn compress<'a, I>(slots: I) -> Vec<TimeRange>
where
    I: IntoIterator<Item = &'a SlotKey>,
{
    let mut sorted: Vec<SlotKey> = slots.into_iter().copied().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<TimeRange> = Vec::new();

    for key in sorted {
        match ranges.last_mut() {
            Some(current)
                if current.day_index == key.day() && current.end_slot + 1 == key.slot() =>
            {
                current.end_slot = key.slot();
            }
            _ => ranges.push(TimeRange::single(key)),
        }
    }

    ranges
}

/// Expand ranges back into the set of slot keys they cover.
pub fn expand<'a, I>(ranges: I) -> BTreeSet<SlotKey>
where
    I: IntoIterator<Item = &'a TimeRange>,
{
    ranges.into_iter().flat_map(|r| r.slots()).collect()
}
