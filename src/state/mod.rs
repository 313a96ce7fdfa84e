//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::executor::Executor;
use crate::managers::{ClanManager, SettingsManager};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub executor: Executor,
    pub clan_manager: Arc<dyn ClanManager>,
    pub settings_manager: Arc<dyn SettingsManager>,
    pub terms: Option<Arc<str>>,
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        executor: Executor,
        clan_manager: Arc<dyn ClanManager>,
        settings_manager: Arc<dyn SettingsManager>,
    ) -> Self {
        Self {
            executor,
            clan_manager,
            settings_manager,
            terms: None,
            db_pool: None,
        }
    }

    pub fn with_terms(mut self, terms: Option<String>) -> Self {
        self.terms = terms.map(Arc::from);
        self
    }

    pub fn with_db_pool(mut self, db_pool: PgPool) -> Self {
        self.db_pool = Some(db_pool);
        self
    }
}

impl FromRef<AppState> for Executor {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.executor.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ClanManager> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.clan_manager.clone()
    }
}

impl FromRef<AppState> for Arc<dyn SettingsManager> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.settings_manager.clone()
    }
}
