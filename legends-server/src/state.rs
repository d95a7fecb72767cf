use std::sync::Arc;

use anyhow::Result;
use legends_core::Planner;
use legends_core::config::LegendsConfig;
use legends_core::store::PlannerStore;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<Planner>>,
    // None when running without persistence (tests)
    store: Option<Arc<PlannerStore>>,
}

impl AppState {
    pub fn load(config: &LegendsConfig) -> Result<Self> {
        let store = PlannerStore::new(config.data_path());
        let planner = store.load_or_init(config)?;

        Ok(AppState {
            planner: Arc::new(RwLock::new(planner)),
            store: Some(Arc::new(store)),
        })
    }

    pub fn in_memory(planner: Planner) -> Self {
        AppState {
            planner: Arc::new(RwLock::new(planner)),
            store: None,
        }
    }

    pub fn planner(&self) -> &RwLock<Planner> {
        &self.planner
    }

    /// Persist the planner after a write.
    pub fn persist(&self, planner: &Planner) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&planner.snapshot())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::router;
    use crate::routes::test_support::{json, send};

    fn config_in(dir: &std::path::Path) -> LegendsConfig {
        LegendsConfig {
            data_dir: dir.to_path_buf(),
            ..LegendsConfig::default()
        }
    }

    #[tokio::test]
    async fn test_writes_are_persisted_to_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let app = router(AppState::load(&config).unwrap());

        let ranges = json!([{ "dayIndex": 5, "startSlot": 20, "endSlot": 23 }]);
        let (status, _) = send(&app, json("PUT", "/availability/0", ranges)).await;
        assert_eq!(status, StatusCode::OK);

        let update = json!({ "kind": "roster", "roster": ["3"] });
        let (status, _) = send(&app, json("POST", "/remote", update)).await;
        assert_eq!(status, StatusCode::OK);

        let snapshot = PlannerStore::new(config.data_path()).load().unwrap().unwrap();
        let record = snapshot
            .records
            .iter()
            .find(|r| r.user_id.as_str() == "0")
            .unwrap();
        assert_eq!(record.slot_count(), 4);
        assert!(snapshot.roster.contains("3"));
    }

    #[tokio::test]
    async fn test_reload_picks_up_saved_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let app = router(AppState::load(&config).unwrap());
        let update = json!({ "kind": "removed", "user_id": "1" });
        let (status, _) = send(&app, json("POST", "/remote", update)).await;
        assert_eq!(status, StatusCode::OK);

        let reloaded = AppState::load(&config).unwrap();
        let planner = reloaded.planner().read().await;
        assert!(planner.directory().record("1").is_none());
        assert!(planner.directory().record("2").is_some());
    }
}
