//! Game rule overrides from the environment.

use std::time::Duration;

use super::server::parse_var;
use crate::domain::rules::GameRules;
use crate::error::AppError;

/// Default rules with `QUESTION_TIMEOUT_SECS` applied when set.
pub fn rules_from_env() -> Result<GameRules, AppError> {
    let mut rules = GameRules::default();
    let secs = parse_var("QUESTION_TIMEOUT_SECS", rules.question_timeout.as_secs())?;
    if secs == 0 {
        return Err(AppError::config("QUESTION_TIMEOUT_SECS must be positive"));
    }
    rules.question_timeout = Duration::from_secs(secs);
    Ok(rules)
}
