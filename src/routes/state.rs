use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::Recommender,
    session::SessionDriver,
};

/// Shared application state
pub struct AppState {
    pub recommender: Arc<dyn Recommender>,
    sessions: RwLock<HashMap<Uuid, SessionDriver>>,
}

impl AppState {
    /// Creates state with no sessions
    pub fn new(recommender: Arc<dyn Recommender>) -> Self {
        Self {
            recommender,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts an empty session and returns its id
    pub async fn create_session(&self) -> (Uuid, SessionDriver) {
        let id = Uuid::new_v4();
        let driver = SessionDriver::new(self.recommender.clone());
        self.sessions.write().await.insert(id, driver.clone());

        tracing::info!(session_id = %id, "Session created");

        (id, driver)
    }

    pub async fn session(&self, id: Uuid) -> AppResult<SessionDriver> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AppError::SessionNotFound(id))
    }

    pub async fn remove_session(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| tracing::info!(session_id = %id, "Session discarded"))
            .ok_or(AppError::SessionNotFound(id))
    }
}
