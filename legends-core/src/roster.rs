//! The set of users picked for overlay comparison.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::users::UserId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedRoster {
    members: BTreeSet<UserId>,
}

impl SelectedRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `user_id` was already a member.
    pub fn add(&mut self, user_id: UserId) -> bool {
        self.members.insert(user_id)
    }

    /// Returns false if `user_id` was not a member.
    pub fn remove(&mut self, user_id: &str) -> bool {
        self.members.remove(user_id)
    }

    /// Flip membership; returns whether the user is a member afterwards.
    pub fn toggle(&mut self, user_id: UserId) -> bool {
        if self.members.remove(&user_id) {
            false
        } else {
            self.members.insert(user_id);
            true
        }
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.members.contains(user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<UserId> for SelectedRoster {
    fn from_iter<T: IntoIterator<Item = UserId>>(iter: T) -> Self {
        SelectedRoster {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectedRoster {
    type Item = &'a UserId;
    type IntoIter = std::collections::btree_set::Iter<'a, UserId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut roster = SelectedRoster::new();
        assert!(roster.toggle(UserId::from("1")));
        assert!(roster.contains("1"));
        assert!(!roster.toggle(UserId::from("1")));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_add_remove() {
        let mut roster: SelectedRoster = ["1", "2"].into_iter().map(UserId::from).collect();
        assert!(!roster.add(UserId::from("2")));
        assert!(roster.remove("1"));
        assert!(!roster.remove("1"));
        assert_eq!(roster.iter().collect::<Vec<_>>(), vec![&UserId::from("2")]);
    }
}
