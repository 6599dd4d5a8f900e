//! Game constants and tunable rules.

use std::time::Duration;

/// Smallest lobby that can be started.
pub const MIN_PLAYERS: usize = 2;
/// Largest lobby size accepted at creation.
pub const MAX_PLAYERS: u8 = 4;
pub const DEFAULT_MAX_PLAYERS: u8 = 4;

pub const MIN_BOARD_LENGTH: u16 = 8;
pub const MAX_BOARD_LENGTH: u16 = 100;
pub const DEFAULT_BOARD_LENGTH: u16 = 50;

/// Faces on the movement and ordering die.
pub const DIE_FACES: u8 = 6;

/// Entries kept in a game's event log.
pub const LOG_CAPACITY: usize = 200;
/// Entries included in a snapshot.
pub const SNAPSHOT_LOG_ENTRIES: usize = 20;

/// Messages kept in a game's chat.
pub const CHAT_CAPACITY: usize = 200;
/// Longest chat message accepted, in characters after normalization.
pub const CHAT_MAX_CHARS: usize = 500;

/// Card duel: hp at the start, which is also the heal cap.
pub const CARD_DUEL_START_HP: u32 = 20;
/// Card duel: picks that make up the opening hand.
pub const CARD_DUEL_HAND_PICKS: u8 = 5;
/// Card duel: cards offered per pick.
pub const CARD_DUEL_PICK_OPTIONS: usize = 3;
/// Card duel: cards drawn at the start of each turn.
pub const CARD_DUEL_TURN_DRAW: usize = 1;

/// Per-game rules, fixed when the game is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    pub start_hp: u32,
    pub start_coins: u32,
    /// Time a player has to answer a question tile.
    pub question_timeout: Duration,
    /// Cards each player drafts before the first turn.
    pub draft_picks_per_player: u8,
    /// Cards offered to each drafter.
    pub draft_offer_count: u8,
    /// Most coins a duel winner can steal.
    pub duel_steal_coins: u32,
    /// Damage a duel winner deals when choosing damage.
    pub duel_damage: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            start_hp: 3,
            start_coins: 0,
            question_timeout: Duration::from_secs(5),
            draft_picks_per_player: 1,
            draft_offer_count: 3,
            duel_steal_coins: 3,
            duel_damage: 2,
        }
    }
}
