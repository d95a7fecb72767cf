//! Editing session for the single user whose availability is currently mutable.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LegendsResult;
use crate::range::{TimeRange, compress};
use crate::slot::SlotKey;
use crate::users::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditState {
    #[default]
    Viewing,
    Editing,
}

impl fmt::Display for EditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditState::Viewing => write!(f, "viewing"),
            EditState::Editing => write!(f, "editing"),
        }
    }
}

/// The result of committing a session: ranges to store under `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub user_id: UserId,
    pub ranges: Vec<TimeRange>,
}

/// Slots added and removed relative to the committed baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChanges {
    pub added: Vec<SlotKey>,
    pub removed: Vec<SlotKey>,
}

impl PendingChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Working selection versus last-committed baseline for one editing user.
///
/// The editing identity is set by [`EditingSession::initialize`] and travels
/// with every [`Commit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingSession {
    user_id: UserId,
    state: EditState,
    working: BTreeSet<SlotKey>,
    baseline: BTreeSet<SlotKey>,
}

impl EditingSession {
    /// Empty session for `user_id`, in viewing state.
    pub fn new(user_id: UserId) -> Self {
        EditingSession {
            user_id,
            state: EditState::Viewing,
            working: BTreeSet::new(),
            baseline: BTreeSet::new(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == EditState::Editing
    }

    pub fn working(&self) -> &BTreeSet<SlotKey> {
        &self.working
    }

    pub fn baseline(&self) -> &BTreeSet<SlotKey> {
        &self.baseline
    }

    pub fn is_selected(&self, key: SlotKey) -> bool {
        self.working.contains(&key)
    }

    /// Whether the working selection differs from the baseline.
    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }

    pub fn pending(&self) -> PendingChanges {
        PendingChanges {
            added: self.working.difference(&self.baseline).copied().collect(),
            removed: self.baseline.difference(&self.working).copied().collect(),
        }
    }

    pub fn begin_edit(&mut self) {
        if self.state == EditState::Viewing {
            tracing::debug!(user = %self.user_id, "begin edit");
        }
        self.state = EditState::Editing;
    }

    /// Flip membership of `key` in the working selection.
    ///
    /// Outside of edit mode this is a no-op. Returns whether the slot is
    /// selected afterwards.
    pub fn toggle_slot(&mut self, key: SlotKey) -> bool {
        if !self.is_editing() {
            tracing::debug!(user = %self.user_id, slot = %key, "toggle ignored while viewing");
            return self.is_selected(key);
        }

        let selected = if self.working.remove(&key) {
            false
        } else {
            self.working.insert(key);
            true
        };

        tracing::debug!(user = %self.user_id, slot = %key, selected, "toggle slot");
        selected
    }

    /// Toggle by canonical key string. Malformed keys are rejected and leave
    /// the session untouched.
    pub fn toggle_key(&mut self, key: &str) -> LegendsResult<bool> {
        let key = SlotKey::decode(key).inspect_err(|e| {
            tracing::warn!(user = %self.user_id, "rejected toggle: {}", e);
        })?;
        Ok(self.toggle_slot(key))
    }

    /// Commit the working selection and return to viewing.
    ///
    /// The returned [`Commit`] must be handed to the availability directory.
    pub fn save(&mut self) -> Commit {
        self.baseline = self.working.clone();
        self.state = EditState::Viewing;

        let ranges = compress(&self.working);
        tracing::info!(
            user = %self.user_id,
            slots = self.working.len(),
            ranges = ranges.len(),
            "saved availability"
        );

        Commit {
            user_id: self.user_id.clone(),
            ranges,
        }
    }

    /// Discard edits since the last commit. Edit state is unaffected.
    pub fn reset(&mut self) {
        self.working = self.baseline.clone();
    }

    /// Switch the editing identity, starting from `slots` as both working
    /// selection and baseline.
    pub fn initialize(&mut self, user_id: UserId, slots: BTreeSet<SlotKey>) {
        tracing::debug!(from = %self.user_id, to = %user_id, slots = slots.len(), "initialize session");
        self.user_id = user_id;
        self.state = EditState::Viewing;
        self.baseline = slots.clone();
        self.working = slots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> SlotKey {
        s.parse().unwrap()
    }

    fn keys(raw: &[&str]) -> BTreeSet<SlotKey> {
        raw.iter().map(|s| key(s)).collect()
    }

    fn session() -> EditingSession {
        EditingSession::new(UserId::from("0"))
    }

    #[test]
    fn test_toggle_is_noop_while_viewing() {
        let mut s = session();
        assert!(!s.toggle_slot(key("1-1")));
        assert!(s.working().is_empty());
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut s = session();
        s.begin_edit();
        assert!(s.toggle_slot(key("1-1")));
        assert!(s.is_selected(key("1-1")));
        assert!(!s.toggle_slot(key("1-1")));
        assert!(!s.is_selected(key("1-1")));
    }

    #[test]
    fn test_rejected_toggle_keeps_state() {
        let mut s = session();
        s.begin_edit();
        s.toggle_slot(key("0-0"));
        let before = s.clone();

        assert!(s.toggle_key("9-99").is_err());
        assert!(s.toggle_key("garbage").is_err());
        assert_eq!(s, before);
        assert!(s.is_editing());
    }

    #[test]
    fn test_save_commits_and_compresses() {
        let mut s = session();
        s.begin_edit();
        for k in ["2-10", "2-11", "2-12", "3-5"] {
            s.toggle_key(k).unwrap();
        }

        let commit = s.save();

        assert_eq!(commit.user_id, UserId::from("0"));
        assert_eq!(
            commit.ranges,
            vec![TimeRange::new(2, 10, 12).unwrap(), TimeRange::new(3, 5, 5).unwrap()]
        );
        assert_eq!(s.state(), EditState::Viewing);
        assert_eq!(s.baseline(), s.working());
    }

    #[test]
    fn test_save_is_idempotent() {
        let mut s = session();
        s.begin_edit();
        s.toggle_slot(key("4-4"));

        let first = s.save();
        let (working, baseline) = (s.working().clone(), s.baseline().clone());
        let second = s.save();

        assert_eq!(first, second);
        assert_eq!(s.working(), &working);
        assert_eq!(s.baseline(), &baseline);
    }

    #[test]
    fn test_reset_restores_baseline_and_keeps_edit_mode() {
        let mut s = session();
        s.initialize(UserId::from("0"), keys(&["0-1", "0-2"]));
        s.begin_edit();
        s.toggle_slot(key("0-1"));
        s.toggle_slot(key("5-5"));
        s.toggle_slot(key("6-6"));
        assert!(s.is_dirty());

        s.reset();

        assert_eq!(s.working(), s.baseline());
        assert_eq!(s.working(), &keys(&["0-1", "0-2"]));
        assert!(s.is_editing());
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_initialize_does_not_leak_previous_selection() {
        let mut s = session();
        s.begin_edit();
        s.toggle_slot(key("1-1"));
        s.toggle_slot(key("1-2"));

        let fresh = keys(&["3-3"]);
        s.initialize(UserId::from("4"), fresh.clone());

        assert_eq!(s.user_id(), &UserId::from("4"));
        assert_eq!(s.working(), &fresh);
        assert_eq!(s.baseline(), &fresh);
        assert_eq!(s.state(), EditState::Viewing);
    }

    #[test]
    fn test_pending_changes() {
        let mut s = session();
        s.initialize(UserId::from("0"), keys(&["0-1", "0-2"]));
        s.begin_edit();
        s.toggle_slot(key("0-1"));
        s.toggle_slot(key("0-3"));

        let pending = s.pending();
        assert_eq!(pending.added, vec![key("0-3")]);
        assert_eq!(pending.removed, vec![key("0-1")]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut s = session();
        s.initialize(UserId::from("3"), keys(&["2-28"]));

        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["userId"], "3");
        assert_eq!(json["state"], "viewing");
        assert_eq!(json["working"], serde_json::json!(["2-28"]));
        assert!(json.get("user_id").is_none());
    }
}
