//! Game engine: pure state transitions over an in-memory `Game` record.
//!
//! Nothing here does I/O. Randomness comes from the per-game seeded rng and
//! time is passed in, so every transition is reproducible in tests.

pub mod board;
pub mod card_duel;
pub mod card_duel_catalogue;
pub mod cards;
pub mod chat;
pub mod draft;
pub mod duel;
pub mod gun;
pub mod lobby;
pub mod log;
pub mod ordering;
pub mod pending;
pub mod question;
pub mod rules;
pub mod shop;
pub mod snapshot;
pub mod state;
pub mod tiles;
pub mod turn;

#[cfg(test)]
mod tests_card_duel;
#[cfg(test)]
mod tests_props;
#[cfg(test)]
mod tests_snapshot;

pub use card_duel_catalogue::DuelCard;
pub use cards::{CardInstance, CardKind};
pub use duel::{DuelMove, DuelReward};
pub use pending::{PendingAction, PendingKind};
pub use rules::GameRules;
pub use snapshot::{snapshot, GameSnapshot};
pub use state::{Game, GameId, GameMode, GameSettings, GameStatus, PlayerId, UserId};
