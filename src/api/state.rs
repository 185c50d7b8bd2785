use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::ApiError;
use crate::config::AppConfig;
use crate::league::{League, LeagueError};
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub league: Arc<League>,
    /// Held by every write; a scoring pass never interleaves with other writes
    pub write_lock: Arc<Mutex<()>>,
    pub league_name: String,
    pub cors_origin: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let storage = StorageConfig::new(config.data_dir.clone());
        Self {
            league: Arc::new(League::new(storage, &config.league)),
            write_lock: Arc::new(Mutex::new(())),
            league_name: config.league.name.clone(),
            cors_origin: config.server.cors_origin.clone(),
        }
    }

    /// Run a league call on the blocking pool; every league call does file IO.
    pub async fn with_league<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&League) -> Result<T, LeagueError> + Send + 'static,
        T: Send + 'static,
    {
        let league = Arc::clone(&self.league);
        let result = tokio::task::spawn_blocking(move || op(&league))
            .await
            .map_err(|e| ApiError::Internal(format!("league task failed: {}", e)))?;
        Ok(result?)
    }
}
