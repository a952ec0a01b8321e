use crate::config::Config;
use crate::interview::InterviewStore;
use crate::roster::Roster;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: InterviewStore,
    pub sessions: SessionRegistry,
    pub roster: Roster,
    pub config: Config,
}

impl AppState {
    pub fn new(store: InterviewStore, config: Config) -> Self {
        AppState {
            store,
            sessions: SessionRegistry::new(config.session_idle_timeout),
            roster: Roster::default(),
            config,
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::time::Duration;

    use super::*;
    use crate::db::testing::{migrated_db, TestDb};

    pub const ADMIN_PASSWORD: &str = "letmein";

    /// App state over a fresh migrated database. Keep the `TestDb` alive.
    pub async fn test_state() -> (AppState, TestDb) {
        let db = migrated_db().await;
        let config = Config {
            database: db.config.clone(),
            admin_password: ADMIN_PASSWORD.to_string(),
            celebration_pause: Duration::from_secs(7),
            session_idle_timeout: Duration::from_secs(1800),
            port: 0,
            rust_log: "debug".to_string(),
        };
        let store = InterviewStore::new(db.pool.clone(), &config.database);
        (AppState::new(store, config), db)
    }
}
