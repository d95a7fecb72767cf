//! Committed availability per user.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::range::TimeRange;
use crate::users::UserId;

/// Everything a user has committed. Replaced wholesale on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub user_id: UserId,
    pub ranges: Vec<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl AvailabilityRecord {
    pub fn new(user_id: UserId, ranges: Vec<TimeRange>) -> Self {
        AvailabilityRecord {
            user_id,
            ranges,
            display_name: None,
        }
    }

    /// Total number of slots covered.
    pub fn slot_count(&self) -> usize {
        self.ranges.iter().map(TimeRange::len).sum()
    }
}

/// Committed availability for every user, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityDirectory {
    records: BTreeMap<UserId, AvailabilityRecord>,
}

impl AvailabilityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo availability for the founding legends.
    pub fn seeded() -> Self {
        // (user, day, start hour, end hour), end slot inclusive
        const SEED: [(&str, u8, u8, u8); 5] = [
            ("1", 2, 14, 16),
            ("2", 3, 15, 17),
            ("3", 3, 14, 16),
            ("4", 2, 11, 15),
            ("5", 4, 16, 20),
        ];

        let mut directory = AvailabilityDirectory::new();
        for (user, day, from, to) in SEED {
            if let Ok(range) = TimeRange::new(day, from * 2, to * 2) {
                directory.upsert(UserId::from(user), vec![range], None);
            }
        }
        directory
    }

    /// Replace the record for `user_id` in full. Last write wins.
    pub fn upsert(&mut self, user_id: UserId, ranges: Vec<TimeRange>, display_name: Option<String>) {
        tracing::debug!(user = %user_id, ranges = ranges.len(), "upsert availability");
        let record = AvailabilityRecord {
            user_id: user_id.clone(),
            ranges,
            display_name,
        };
        self.records.insert(user_id, record);
    }

    /// Replace with an already-built record.
    pub fn insert_record(&mut self, record: AvailabilityRecord) {
        self.records.insert(record.user_id.clone(), record);
    }

    /// Ranges for `user_id`, empty when the user has never committed.
    pub fn get(&self, user_id: &str) -> &[TimeRange] {
        self.records
            .get(user_id)
            .map(|r| r.ranges.as_slice())
            .unwrap_or(&[])
    }

    pub fn record(&self, user_id: &str) -> Option<&AvailabilityRecord> {
        self.records.get(user_id)
    }

    pub fn remove(&mut self, user_id: &str) -> Option<AvailabilityRecord> {
        self.records.remove(user_id)
    }

    pub fn all_user_ids(&self) -> BTreeSet<UserId> {
        self.records.keys().cloned().collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &AvailabilityRecord> {
        self.records.values()
    }

    /// Swap the whole directory contents for `records`.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = AvailabilityRecord>) {
        self.records = records
            .into_iter()
            .map(|r| (r.user_id.clone(), r))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(day: u8, start: u8, end: u8) -> TimeRange {
        TimeRange::new(day, start, end).unwrap()
    }

    #[test]
    fn test_unknown_user_is_empty() {
        let dir = AvailabilityDirectory::new();
        assert!(dir.get("nobody").is_empty());
        assert!(dir.record("nobody").is_none());
    }

    #[test]
    fn test_last_write_wins_in_full() {
        let mut dir = AvailabilityDirectory::new();
        let a = vec![range(0, 0, 3), range(1, 4, 4)];
        let b = vec![range(5, 10, 11)];

        dir.upsert(UserId::from("u1"), a, Some("Ann".into()));
        dir.upsert(UserId::from("u1"), b.clone(), None);

        assert_eq!(dir.get("u1"), b.as_slice());
        assert_eq!(dir.record("u1").unwrap().display_name, None);
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_empty_upsert_is_kept() {
        let mut dir = AvailabilityDirectory::new();
        dir.upsert(UserId::from("u1"), Vec::new(), None);
        assert!(dir.get("u1").is_empty());
        assert!(dir.all_user_ids().contains("u1"));
    }

    #[test]
    fn test_remove() {
        let mut dir = AvailabilityDirectory::new();
        dir.upsert(UserId::from("u1"), vec![range(0, 0, 0)], None);
        dir.upsert(UserId::from("u2"), vec![range(0, 1, 1)], None);

        assert!(dir.remove("u1").is_some());
        assert!(dir.remove("u1").is_none());
        assert_eq!(dir.all_user_ids(), BTreeSet::from([UserId::from("u2")]));
    }

    #[test]
    fn test_replace_all_drops_previous_records() {
        let mut dir = AvailabilityDirectory::seeded();
        dir.replace_all([AvailabilityRecord::new(UserId::from("x"), vec![range(6, 0, 1)])]);

        assert_eq!(dir.all_user_ids(), BTreeSet::from([UserId::from("x")]));
        assert_eq!(dir.record("x").unwrap().slot_count(), 2);
    }

    #[test]
    fn test_seed() {
        let dir = AvailabilityDirectory::seeded();
        assert_eq!(dir.len(), 5);
        assert_eq!(dir.get("1"), &[range(2, 28, 32)]);
        assert_eq!(dir.get("4"), &[range(2, 22, 30)]);
        assert!(dir.get("0").is_empty());
    }
}
