//! Overlay of several users' availability into per-slot occupancy counts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::directory::AvailabilityDirectory;
use crate::range::expand;
use crate::roster::SelectedRoster;
use crate::slot::SlotKey;
use crate::users::UserId;

/// Number of roster members free in each slot. Slots nobody covers are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Occupancy {
    counts: BTreeMap<SlotKey, usize>,
}

impl Occupancy {
    pub fn count(&self, key: SlotKey) -> usize {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Highest count on the grid, 0 when empty.
    pub fn max(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count, for every slot, how many roster members have it available.
pub fn occupancy(directory: &AvailabilityDirectory, roster: &SelectedRoster) -> Occupancy {
    let mut counts = BTreeMap::new();

    for user_id in roster {
        for key in expand(directory.get(user_id.as_str())) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    Occupancy { counts }
}

/// Roster members whose availability covers `key`.
pub fn who_is_free(
    directory: &AvailabilityDirectory,
    roster: &SelectedRoster,
    key: SlotKey,
) -> Vec<UserId> {
    roster
        .iter()
        .filter(|id| directory.get(id.as_str()).iter().any(|r| r.contains(key)))
        .cloned()
        .collect()
}

/// Highlight opacity for a slot shared by `count` users.
pub fn overlap_alpha(count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    (0.3 + count as f32 * 0.3).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::compress;
    use std::collections::BTreeSet;

    fn key(s: &str) -> SlotKey {
        s.parse().unwrap()
    }

    fn directory() -> AvailabilityDirectory {
        let mut dir = AvailabilityDirectory::new();
        let u1: BTreeSet<_> = [key("0-0"), key("0-1")].into();
        let u2: BTreeSet<_> = [key("0-1")].into();
        dir.upsert(UserId::from("u1"), compress(&u1), None);
        dir.upsert(UserId::from("u2"), compress(&u2), None);
        dir
    }

    #[test]
    fn test_overlay_counts() {
        let dir = directory();
        let roster: SelectedRoster = ["u1", "u2"].into_iter().map(UserId::from).collect();

        let occ = occupancy(&dir, &roster);

        assert_eq!(occ.count(key("0-0")), 1);
        assert_eq!(occ.count(key("0-1")), 2);
        assert_eq!(occ.count(key("0-2")), 0);
        assert_eq!(occ.len(), 2);
        assert_eq!(occ.max(), 2);
    }

    #[test]
    fn test_overlay_only_counts_roster() {
        let dir = directory();
        let roster: SelectedRoster = ["u2", "ghost"].into_iter().map(UserId::from).collect();

        let occ = occupancy(&dir, &roster);

        assert_eq!(occ.count(key("0-0")), 0);
        assert_eq!(occ.count(key("0-1")), 1);
    }

    #[test]
    fn test_empty_roster() {
        assert!(occupancy(&directory(), &SelectedRoster::new()).is_empty());
    }

    #[test]
    fn test_who_is_free() {
        let dir = directory();
        let roster: SelectedRoster = ["u1", "u2"].into_iter().map(UserId::from).collect();

        assert_eq!(who_is_free(&dir, &roster, key("0-0")), vec![UserId::from("u1")]);
        assert_eq!(who_is_free(&dir, &roster, key("0-1")).len(), 2);
        assert!(who_is_free(&dir, &roster, key("5-5")).is_empty());
    }

    #[test]
    fn test_overlap_alpha() {
        assert_eq!(overlap_alpha(0), 0.0);
        assert!((overlap_alpha(1) - 0.6).abs() < 1e-6);
        assert!((overlap_alpha(2) - 0.9).abs() < 1e-6);
        assert_eq!(overlap_alpha(5), 1.0);
    }
}
