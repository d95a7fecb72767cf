//! On-disk planner state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::LegendsConfig;
use crate::directory::{AvailabilityDirectory, AvailabilityRecord};
use crate::error::{LegendsError, LegendsResult};
use crate::planner::Planner;
use crate::roster::SelectedRoster;
use crate::session::EditingSession;
use crate::sync::LocalWrite;
use crate::users::UserDirectory;

const STATE_FILE: &str = "state.json";

/// Full serializable planner state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: UserDirectory,
    pub records: Vec<AvailabilityRecord>,
    #[serde(default)]
    pub roster: SelectedRoster,
    pub session: EditingSession,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outbox: Vec<LocalWrite>,
}

impl Snapshot {
    pub fn to_json(&self) -> LegendsResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LegendsError::Serialization(e.to_string()))
    }
}

/// Reads and writes `state.json` under a data directory.
pub struct PlannerStore {
    dir: PathBuf,
}

impl PlannerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PlannerStore { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the saved snapshot, or `None` if nothing has been saved yet.
    pub fn load(&self) -> LegendsResult<Option<Snapshot>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let snapshot = serde_json::from_str(&content).map_err(|e| {
            LegendsError::Serialization(format!("{}: {}", path.display(), e))
        })?;
        Ok(Some(snapshot))
    }

    /// Load the saved planner, or start a fresh one from `config`.
    pub fn load_or_init(&self, config: &LegendsConfig) -> LegendsResult<Planner> {
        if let Some(snapshot) = self.load()? {
            return Planner::from_snapshot(snapshot);
        }

        let users = UserDirectory::builtin();
        let directory = if config.seed_demo {
            AvailabilityDirectory::seeded()
        } else {
            AvailabilityDirectory::new()
        };
        let editing_user = match &config.default_user {
            Some(id) => id.clone(),
            None => users
                .iter()
                .next()
                .map(|u| u.id.to_string())
                .ok_or_else(|| LegendsError::Config("user directory is empty".into()))?,
        };

        tracing::info!(user = %editing_user, seeded = config.seed_demo, "starting new planner");
        Planner::new(users, directory, &editing_user)
    }

    /// Write the snapshot, replacing the previous file in one rename.
    pub fn save(&self, snapshot: &Snapshot) -> LegendsResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let temp = self.dir.join(STATE_FILE.to_string() + ".tmp");

        std::fs::write(&temp, snapshot.to_json()?)?;
        std::fs::rename(&temp, &path)?;

        tracing::debug!(path = %path.display(), "saved planner state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlannerStore::new(dir.path().join("nested"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlannerStore::new(dir.path());

        let mut planner = Planner::demo().unwrap();
        planner.add_to_roster("5").unwrap();
        planner.begin_edit();
        planner.toggle_key("1-10").unwrap();
        planner.save();

        store.save(&planner.snapshot()).unwrap();
        let loaded = store.load().unwrap().expect("state should exist");

        assert_eq!(loaded, planner.snapshot());
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn test_load_or_init_uses_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlannerStore::new(dir.path());
        let config = LegendsConfig {
            default_user: Some("2".into()),
            seed_demo: false,
            ..LegendsConfig::default()
        };

        let planner = store.load_or_init(&config).unwrap();
        assert_eq!(planner.editing_user().as_str(), "2");
        assert!(planner.directory().is_empty());

        let config = LegendsConfig {
            default_user: Some("nobody".into()),
            ..LegendsConfig::default()
        };
        assert!(matches!(store.load_or_init(&config), Err(LegendsError::UnknownUser(_))));
    }

    #[test]
    fn test_load_or_init_prefers_saved_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlannerStore::new(dir.path());

        let mut planner = Planner::demo().unwrap();
        planner.switch_user("4").unwrap();
        store.save(&planner.snapshot()).unwrap();

        let loaded = store.load_or_init(&LegendsConfig::default()).unwrap();
        assert_eq!(loaded.editing_user().as_str(), "4");
    }

    #[test]
    fn test_corrupt_state_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("state.json"), "{ not json").unwrap();

        let store = PlannerStore::new(dir.path());
        assert!(matches!(store.load(), Err(LegendsError::Serialization(_))));
    }

    #[test]
    fn test_invalid_slot_in_state_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlannerStore::new(dir.path());
        let mut json: serde_json::Value =
            serde_json::from_str(&Planner::demo().unwrap().snapshot().to_json().unwrap()).unwrap();
        json["session"]["working"] = serde_json::json!(["9-99"]);
        std::fs::write(store.path(), json.to_string()).unwrap();

        assert!(store.load().is_err());
    }
}
