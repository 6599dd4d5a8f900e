use serde::Serialize;

use super::state::PlayerId;

/// Kind of a game event log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    CreateGame,
    JoinGame,
    StartGame,
    OrderRoll,
    DraftPick,
    RollDice,
    Move,
    TileEffect,
    QuestionStart,
    QuestionAnswer,
    DuelStart,
    DuelResult,
    ShopBuy,
    ShopSell,
    ShopClose,
    GunAttack,
    CardUse,
    ExtraRoll,
    TurnChange,
    PlayerEliminated,
    DuelCardPick,
    DuelCardPlay,
    StatusTick,
    GameEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub seq: u64,
    pub kind: LogKind,
    pub player_id: Option<PlayerId>,
    pub message: String,
}
