//! The fixed weekly slot grid.
//!
//! The grid has 7 days with 48 half-hour slots each. A cell is addressed by a
//! [`SlotKey`], whose canonical string form is `"{day}-{slot}"` (e.g. `"2-28"`
//! for the third day at 14:00).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{LegendsError, LegendsResult};

/// Number of days on the grid.
pub const DAYS: u8 = 7;

/// Number of half-hour slots per day.
pub const SLOTS_PER_DAY: u8 = 48;

/// Length of one slot in minutes.
pub const SLOT_MINUTES: u32 = 30;

/// A single cell of the weekly grid.
///
/// Ordering is by day, then slot, which is the order the range codec scans in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotKey {
    day: u8,
    slot: u8,
}

impl SlotKey {
    /// Encode a (day, slot) pair, rejecting coordinates outside the grid.
    pub fn new(day: u8, slot: u8) -> LegendsResult<Self> {
        if day >= DAYS {
            return Err(LegendsError::Validation(format!(
                "day index {} out of range 0..={}",
                day,
                DAYS - 1
            )));
        }
        if slot >= SLOTS_PER_DAY {
            return Err(LegendsError::Validation(format!(
                "slot index {} out of range 0..={}",
                slot,
                SLOTS_PER_DAY - 1
            )));
        }
        Ok(SlotKey { day, slot })
    }

    /// Build a key from a wall-clock time. Minutes must be 0 or 30.
    pub fn from_time(day: u8, hour: u8, minute: u8) -> LegendsResult<Self> {
        let half = match minute {
            0 => 0,
            30 => 1,
            other => {
                return Err(LegendsError::Validation(format!(
                    "minute must be 0 or 30, got {}",
                    other
                )));
            }
        };
        if hour > 23 {
            return Err(LegendsError::Validation(format!("hour {} out of range 0..=23", hour)));
        }
        SlotKey::new(day, hour * 2 + half)
    }

    /// Decode the canonical `"{day}-{slot}"` form.
    pub fn decode(s: &str) -> LegendsResult<Self> {
        s.parse()
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    /// Wall-clock start of this slot.
    pub fn start_time(&self) -> NaiveTime {
        let minutes = u32::from(self.slot) * SLOT_MINUTES;
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or_default()
    }

    /// Short human label, e.g. `Wed 14:30`.
    pub fn label(&self) -> String {
        format!("{} {}", day_label(self.day), self.start_time().format("%H:%M"))
    }

    /// Every cell of the grid, in (day, slot) order.
    pub fn all() -> impl Iterator<Item = SlotKey> {
        (0..DAYS).flat_map(|day| (0..SLOTS_PER_DAY).map(move |slot| SlotKey { day, slot }))
    }
}

/// Weekday label for a day index (day 0 is Monday).
pub fn day_label(day: u8) -> String {
    Weekday::try_from(day)
        .map(|w| w.to_string())
        .unwrap_or_else(|_| format!("Day {}", day))
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.slot)
    }
}

impl FromStr for SlotKey {
    type Err = LegendsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || LegendsError::Validation(format!("malformed slot key '{}'", s));

        let (day, slot) = s.split_once('-').ok_or_else(malformed)?;
        let day = parse_index(day).ok_or_else(malformed)?;
        let slot = parse_index(slot).ok_or_else(malformed)?;

        SlotKey::new(day, slot)
    }
}

/// Plain decimal digits only; signs and whitespace are rejected.
fn parse_index(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl TryFrom<String> for SlotKey {
    type Error = LegendsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let key = SlotKey::new(2, 10).unwrap();
        assert_eq!(key.to_string(), "2-10");
        assert_eq!(SlotKey::decode("2-10").unwrap(), key);
        assert_eq!(SlotKey::decode("6-47").unwrap(), SlotKey::new(6, 47).unwrap());
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(matches!(SlotKey::new(7, 0), Err(LegendsError::Validation(_))));
        assert!(matches!(SlotKey::new(0, 48), Err(LegendsError::Validation(_))));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for bad in ["", "2", "2-", "-3", "a-1", "1-b", "1-2-3", "+1-2", " 1-2", "7-0", "0-48", "300-1"] {
            assert!(
                matches!(SlotKey::decode(bad), Err(LegendsError::Validation(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_from_time() {
        assert_eq!(SlotKey::from_time(2, 14, 0).unwrap().slot(), 28);
        assert_eq!(SlotKey::from_time(2, 14, 30).unwrap().slot(), 29);
        assert!(SlotKey::from_time(2, 14, 15).is_err());
        assert!(SlotKey::from_time(2, 24, 0).is_err());
    }

    #[test]
    fn test_label_and_time() {
        let key = SlotKey::new(2, 29).unwrap();
        assert_eq!(key.start_time(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(key.label(), "Wed 14:30");
    }

    #[test]
    fn test_all_covers_grid_in_order() {
        let all: Vec<_> = SlotKey::all().collect();
        assert_eq!(all.len(), 7 * 48);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let key = SlotKey::new(3, 5).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"3-5\"");
        let parsed: SlotKey = serde_json::from_str("\"3-5\"").unwrap();
        assert_eq!(parsed, key);
        assert!(serde_json::from_str::<SlotKey>("\"9-5\"").is_err());
    }
}
