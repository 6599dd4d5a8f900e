use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::domain::GameRules;
use crate::services::game_store::GameStore;
use crate::services::users::UserStore;

/// Application state shared by all workers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Rules given to newly created games
    pub rules: GameRules,
    pub games: Arc<GameStore>,
    pub users: Arc<UserStore>,
}

impl AppState {
    pub fn new(security: SecurityConfig, rules: GameRules) -> Self {
        Self {
            security,
            rules,
            games: Arc::new(GameStore::new()),
            users: Arc::new(UserStore::new()),
        }
    }
}
