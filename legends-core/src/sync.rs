//! Messages exchanged with the replication channel.
//!
//! Local writes are queued as [`LocalWrite`]s for the channel to propagate.
//! Remote changes arrive as [`RemoteUpdate`]s, each one a whole-record (or
//! whole-roster) replacement that the planner applies atomically.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::directory::AvailabilityRecord;
use crate::roster::SelectedRoster;
use crate::users::UserId;

/// Stable identifier of a replicated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentId {
    Availability,
    Roster,
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Availability => write!(f, "availability"),
            DocumentId::Roster => write!(f, "roster"),
        }
    }
}

/// A change made locally that the channel must replicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LocalWrite {
    Upsert { record: AvailabilityRecord },
    Remove { user_id: UserId },
    Roster { roster: SelectedRoster },
}

impl LocalWrite {
    pub fn document(&self) -> DocumentId {
        match self {
            LocalWrite::Upsert { .. } | LocalWrite::Remove { .. } => DocumentId::Availability,
            LocalWrite::Roster { .. } => DocumentId::Roster,
        }
    }
}

/// A change delivered by the channel from another client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RemoteUpdate {
    /// Replace one user's record.
    Record { record: AvailabilityRecord },
    /// Delete one user's record.
    Removed { user_id: UserId },
    /// Replace every record at once.
    Snapshot { records: Vec<AvailabilityRecord> },
    /// Replace the roster.
    Roster { roster: SelectedRoster },
}

impl RemoteUpdate {
    pub fn document(&self) -> DocumentId {
        match self {
            RemoteUpdate::Record { .. }
            | RemoteUpdate::Removed { .. }
            | RemoteUpdate::Snapshot { .. } => DocumentId::Availability,
            RemoteUpdate::Roster { .. } => DocumentId::Roster,
        }
    }
}
