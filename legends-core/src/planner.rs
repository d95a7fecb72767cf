//! The planner: one editing session plus the shared availability state.
//!
//! A `Planner` is an ordinary value. The CLI loads one from disk per
//! invocation; the server keeps one behind a lock. Every local mutation that
//! other clients need to see is queued in the outbox.

use crate::directory::{AvailabilityDirectory, AvailabilityRecord};
use crate::error::{LegendsError, LegendsResult};
use crate::overlay::{self, Occupancy};
use crate::range::{compress, expand};
use crate::roster::SelectedRoster;
use crate::session::{Commit, EditingSession};
use crate::slot::SlotKey;
use crate::store::Snapshot;
use crate::sync::{LocalWrite, RemoteUpdate};
use crate::users::{UserDirectory, UserId, UserProfile};

#[derive(Debug, Clone)]
pub struct Planner {
    users: UserDirectory,
    directory: AvailabilityDirectory,
    roster: SelectedRoster,
    session: EditingSession,
    outbox: Vec<LocalWrite>,
}

impl Planner {
    /// Build a planner editing `editing_user`, which must exist in `users`.
    pub fn new(
        users: UserDirectory,
        directory: AvailabilityDirectory,
        editing_user: &str,
    ) -> LegendsResult<Self> {
        let user_id = users.require(editing_user)?.id.clone();
        let slots = expand(directory.get(user_id.as_str()));

        let mut session = EditingSession::new(user_id.clone());
        session.initialize(user_id, slots);

        Ok(Planner {
            users,
            directory,
            roster: SelectedRoster::new(),
            session,
            outbox: Vec::new(),
        })
    }

    /// The founding legends with their demo availability, editing as user "0".
    pub fn demo() -> LegendsResult<Self> {
        Planner::new(UserDirectory::builtin(), AvailabilityDirectory::seeded(), "0")
    }

    pub fn from_snapshot(snapshot: Snapshot) -> LegendsResult<Self> {
        snapshot.users.require(snapshot.session.user_id().as_str())?;

        let mut directory = AvailabilityDirectory::new();
        directory.replace_all(snapshot.records);

        Ok(Planner {
            users: snapshot.users,
            directory,
            roster: snapshot.roster,
            session: snapshot.session,
            outbox: snapshot.outbox,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.clone(),
            records: self.directory.records().cloned().collect(),
            roster: self.roster.clone(),
            session: self.session.clone(),
            outbox: self.outbox.clone(),
        }
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn directory(&self) -> &AvailabilityDirectory {
        &self.directory
    }

    pub fn roster(&self) -> &SelectedRoster {
        &self.roster
    }

    pub fn session(&self) -> &EditingSession {
        &self.session
    }

    pub fn editing_user(&self) -> &UserId {
        self.session.user_id()
    }

    /// Occupancy of the current roster.
    pub fn occupancy(&self) -> Occupancy {
        overlay::occupancy(&self.directory, &self.roster)
    }

    /// Roster members free in `key`.
    pub fn who_is_free(&self, key: SlotKey) -> Vec<UserId> {
        overlay::who_is_free(&self.directory, &self.roster, key)
    }

    /// Make `user_id` the editing user, starting from their committed availability.
    ///
    /// Uncommitted edits of the previous editing user are discarded.
    pub fn switch_user(&mut self, user_id: &str) -> LegendsResult<()> {
        let user_id = self.users.require(user_id)?.id.clone();

        if self.session.is_dirty() {
            tracing::warn!(
                user = %self.session.user_id(),
                "discarding unsaved edits on user switch"
            );
        }

        let slots = expand(self.directory.get(user_id.as_str()));
        self.session.initialize(user_id.clone(), slots);

        if self.roster.remove(user_id.as_str()) {
            self.push_roster();
        }

        Ok(())
    }

    pub fn begin_edit(&mut self) {
        self.session.begin_edit();
    }

    pub fn toggle_slot(&mut self, key: SlotKey) -> bool {
        self.session.toggle_slot(key)
    }

    pub fn toggle_key(&mut self, key: &str) -> LegendsResult<bool> {
        self.session.toggle_key(key)
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Commit the editing session into the directory.
    ///
    /// Only meaningful while editing; returns `None` otherwise. Stored ranges
    /// are annotated with the editing user's display metadata, and a write is
    /// queued only when the stored record actually changes.
    pub fn save(&mut self) -> Option<Commit> {
        if !self.session.is_editing() {
            tracing::debug!(user = %self.session.user_id(), "save ignored while viewing");
            return None;
        }

        let commit = self.session.save();
        let record = self.annotate(AvailabilityRecord::new(
            commit.user_id.clone(),
            commit.ranges.clone(),
        ));

        let unchanged = match self.directory.record(commit.user_id.as_str()) {
            Some(stored) => stored == &record,
            None => record.ranges.is_empty(),
        };
        if unchanged {
            tracing::debug!(user = %commit.user_id, "availability unchanged");
            return Some(commit);
        }

        self.directory.insert_record(record.clone());
        self.outbox.push(LocalWrite::Upsert { record });

        Some(commit)
    }

    /// Add a user to the overlay roster. Returns false if already present.
    pub fn add_to_roster(&mut self, user_id: &str) -> LegendsResult<bool> {
        let user_id = self.rosterable(user_id)?;
        let added = self.roster.add(user_id);
        if added {
            self.push_roster();
        }
        Ok(added)
    }

    /// Returns false if the user was not on the roster.
    pub fn remove_from_roster(&mut self, user_id: &str) -> bool {
        let removed = self.roster.remove(user_id);
        if removed {
            self.push_roster();
        }
        removed
    }

    /// Flip roster membership; returns whether the user is a member afterwards.
    pub fn toggle_roster(&mut self, user_id: &str) -> LegendsResult<bool> {
        let user_id = self.rosterable(user_id)?;
        let member = self.roster.toggle(user_id);
        self.push_roster();
        Ok(member)
    }

    /// Drop a participant: off the roster and their availability deleted.
    pub fn remove_participant(&mut self, user_id: &str) -> Option<AvailabilityRecord> {
        self.remove_from_roster(user_id);

        let removed = self.directory.remove(user_id);
        if removed.is_some() {
            tracing::info!(user = %user_id, "removed participant availability");
            self.outbox.push(LocalWrite::Remove {
                user_id: UserId::from(user_id),
            });
        }

        if self.session.user_id().as_str() == user_id {
            let id = self.session.user_id().clone();
            self.session.initialize(id, Default::default());
        }

        removed
    }

    /// Register a new legend in the user directory.
    pub fn create_legend(&mut self, name: &str) -> LegendsResult<UserProfile> {
        self.users.create_legend(name)
    }

    /// Apply a change received from another client as one whole replacement.
    ///
    /// Incoming ranges are normalized to maximal runs, and roster members
    /// unknown to the user directory are dropped.
    pub fn apply_remote(&mut self, update: RemoteUpdate) {
        tracing::info!(document = %update.document(), "applying remote update");

        match update {
            RemoteUpdate::Record { record } => {
                let record = self.annotate(record);
                self.directory.insert_record(record);
            }
            RemoteUpdate::Removed { user_id } => {
                self.directory.remove(user_id.as_str());
            }
            RemoteUpdate::Snapshot { records } => {
                let records: Vec<_> = records.into_iter().map(|r| self.annotate(r)).collect();
                self.directory.replace_all(records);
            }
            RemoteUpdate::Roster { roster } => {
                self.roster = roster
                    .iter()
                    .filter(|id| {
                        let known = self.users.contains(id.as_str());
                        if !known {
                            tracing::warn!(user = %id, "dropping unknown user from remote roster");
                        }
                        known && *id != self.session.user_id()
                    })
                    .cloned()
                    .collect();
                return;
            }
        }

        self.refresh_session();
    }

    /// Local writes not yet handed to the replication channel, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<LocalWrite> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_writes(&self) -> &[LocalWrite] {
        &self.outbox
    }

    /// Reload the editing user's baseline after a remote change, unless they
    /// are in the middle of editing.
    fn refresh_session(&mut self) {
        if self.session.is_editing() {
            return;
        }
        let user_id = self.session.user_id().clone();
        let slots = expand(self.directory.get(user_id.as_str()));
        self.session.initialize(user_id, slots);
    }

    /// Merge a record's ranges into maximal runs and attach the owner's
    /// display metadata. Unknown owners keep whatever metadata they came with.
    fn annotate(&self, record: AvailabilityRecord) -> AvailabilityRecord {
        let profile = self.users.get(record.user_id.as_str());
        let owner = profile
            .map(UserProfile::owner)
            .or_else(|| record.ranges.iter().find_map(|r| r.owner().cloned()));

        let ranges = compress(&expand(&record.ranges))
            .into_iter()
            .map(|r| match &owner {
                Some(owner) => r.with_owner(owner.clone()),
                None => r,
            })
            .collect();

        AvailabilityRecord {
            ranges,
            display_name: profile.map(|p| p.name.clone()).or(record.display_name),
            user_id: record.user_id,
        }
    }

    fn rosterable(&self, user_id: &str) -> LegendsResult<UserId> {
        let user_id = self.users.require(user_id)?.id.clone();
        if &user_id == self.session.user_id() {
            return Err(LegendsError::Validation(format!(
                "user '{}' is editing and cannot be on the roster",
                user_id
            )));
        }
        Ok(user_id)
    }

    fn push_roster(&mut self) {
        self.outbox.push(LocalWrite::Roster {
            roster: self.roster.clone(),
        });
    }
}
