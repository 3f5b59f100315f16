use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::Deserialize;
use tracing::info;

use crate::dashboard::DashboardState;
use crate::db;
use crate::onboarding::{Onboarding, DEFAULT_DRAFT_NAME};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub dashboard: DashboardState,
}

impl AppState {
    /// No workspace yet, so nothing is known to be persisted: first run.
    pub fn new() -> Self {
        Self {
            workspace: None,
            db: None,
            dashboard: DashboardState::new(Onboarding::resume(false), DEFAULT_DRAFT_NAME),
        }
    }

    /// Opens the preference store and restarts onboarding from what it holds.
    /// Marks entered this session are kept.
    pub fn open_workspace(&mut self, path: &Path) -> anyhow::Result<()> {
        let conn = db::open_db(path)?;
        let prefs = db::load_preferences(&conn)?;

        self.dashboard.onboarding = Onboarding::resume(prefs.onboarding_done);
        self.dashboard.user_name = prefs
            .user_name
            .unwrap_or_else(|| DEFAULT_DRAFT_NAME.to_string());
        self.workspace = Some(path.to_path_buf());
        self.db = Some(conn);

        info!(
            workspace = %path.display(),
            onboarding_done = prefs.onboarding_done,
            "workspace opened"
        );
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
