use crate::domain::GameRules;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    rules: GameRules,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            rules: GameRules::default(),
        }
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_rules(mut self, rules: GameRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        if self.security_config.jwt_secret.is_empty() {
            return Err(AppError::config("JWT secret must not be empty"));
        }
        if self.rules.start_hp == 0 {
            return Err(AppError::config("players must start with at least 1 hp"));
        }
        Ok(AppState::new(self.security_config, self.rules))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
