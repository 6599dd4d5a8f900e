//! Authoritative game record: players, board, turn pointer and pending action.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::card_duel::DuelSeat;
use super::cards::CardInstance;
use super::chat::ChatMessage;
use super::duel::DuelResult;
use super::log::{LogEntry, LogKind};
use super::pending::PendingAction;
use super::rules::{
    GameRules, DEFAULT_BOARD_LENGTH, DEFAULT_MAX_PLAYERS, LOG_CAPACITY, MAX_BOARD_LENGTH,
    MAX_PLAYERS, MIN_BOARD_LENGTH, MIN_PLAYERS,
};
use super::tiles::{Tile, TileEffect, TileKind};
use crate::errors::domain::{DomainError, ForbiddenKind, NotFoundKind};

pub type GameId = i64;
pub type PlayerId = u32;
pub type UserId = i64;
pub type CardId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Lobby open for joins.
    Waiting,
    /// Players roll once to decide turn order.
    Ordering,
    /// Players pick starting cards in turn order.
    Drafting,
    Active,
    Finished,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Waiting => "waiting",
            GameStatus::Ordering => "ordering",
            GameStatus::Drafting => "drafting",
            GameStatus::Active => "active",
            GameStatus::Finished => "finished",
        }
    }

    /// Started and not yet finished.
    #[inline]
    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            GameStatus::Ordering | GameStatus::Drafting | GameStatus::Active
        )
    }
}

/// How the board is traversed and how a game is won.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Reach the finish tile first; movement stops at the last tile.
    #[default]
    Finish,
    /// Last player standing; movement wraps around the board.
    Survival,
    /// No board; last player standing after trading cards.
    CardDuel,
}

/// Settings chosen by the host at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub mode: GameMode,
    pub max_players: u8,
    pub board_length: u16,
}

impl GameSettings {
    /// Settings from optional host choices, defaults filled in and ranges checked.
    pub fn new(
        mode: Option<GameMode>,
        max_players: Option<u8>,
        board_length: Option<u16>,
    ) -> Result<Self, DomainError> {
        let max_players = max_players.unwrap_or(DEFAULT_MAX_PLAYERS);
        if !(MIN_PLAYERS as u8..=MAX_PLAYERS).contains(&max_players) {
            return Err(DomainError::invalid_input(format!(
                "max_players must be between {MIN_PLAYERS} and {MAX_PLAYERS}"
            )));
        }
        let board_length = board_length.unwrap_or(DEFAULT_BOARD_LENGTH);
        if !(MIN_BOARD_LENGTH..=MAX_BOARD_LENGTH).contains(&board_length) {
            return Err(DomainError::invalid_input(format!(
                "board_length must be between {MIN_BOARD_LENGTH} and {MAX_BOARD_LENGTH}"
            )));
        }
        Ok(Self {
            mode: mode.unwrap_or_default(),
            max_players,
            board_length,
        })
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            max_players: DEFAULT_MAX_PLAYERS,
            board_length: DEFAULT_BOARD_LENGTH,
        }
    }
}

/// Outcome of an hp reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Damage {
    pub absorbed: u32,
    pub lost: u32,
    pub eliminated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub user_id: UserId,
    pub username: String,
    /// Seat in the turn rotation; join order until ordering resolves.
    pub turn_order: u8,
    pub hp: u32,
    pub coins: u32,
    pub position: u16,
    pub is_alive: bool,
    pub shield_points: u32,
    pub extra_rolls: u32,
    pub cards: Vec<CardInstance>,
}

impl Player {
    pub fn new(
        id: PlayerId,
        user_id: UserId,
        username: impl Into<String>,
        turn_order: u8,
        rules: &GameRules,
    ) -> Self {
        Self {
            id,
            user_id,
            username: username.into(),
            turn_order,
            hp: rules.start_hp,
            coins: rules.start_coins,
            position: 0,
            is_alive: true,
            shield_points: 0,
            extra_rolls: 0,
            cards: Vec::new(),
        }
    }

    /// Shield points absorb damage first; hp floors at 0 and eliminates.
    pub fn take_damage(&mut self, amount: u32) -> Damage {
        let absorbed = amount.min(self.shield_points);
        self.shield_points -= absorbed;
        let lost = (amount - absorbed).min(self.hp);
        self.hp -= lost;
        let eliminated = self.is_alive && self.hp == 0;
        if eliminated {
            self.is_alive = false;
        }
        Damage {
            absorbed,
            lost,
            eliminated,
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount);
    }

    pub fn card_index(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}

/// The single authoritative record for one game.
///
/// All mutation goes through methods on this type (spread over the domain
/// modules); callers run them against a copy and commit on success.
#[derive(Debug, Clone)]
pub struct Game {
    pub id: GameId,
    pub code: String,
    pub host_user_id: UserId,
    pub status: GameStatus,
    pub mode: GameMode,
    pub max_players: u8,
    pub board_length: u16,
    /// Sorted by `turn_order`.
    pub players: Vec<Player>,
    pub tiles: Vec<Tile>,
    /// Index into `players` of the player whose turn it is.
    pub current_turn_index: usize,
    pub pending: Option<PendingAction>,
    pub winner: Option<PlayerId>,
    /// Bumped on every committed mutation.
    pub version: i64,
    pub last_roll: Option<RollOutcome>,
    pub last_duel: Option<DuelResult>,
    pub log: Vec<LogEntry>,
    pub chat: Vec<ChatMessage>,
    /// Card duel seats in player order; empty for board modes.
    pub card_duel: Vec<DuelSeat>,
    pub rules: GameRules,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) next_player_id: PlayerId,
    pub(crate) next_card_id: CardId,
    pub(crate) next_log_seq: u64,
}

/// Result of a movement roll, kept on the game for the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollOutcome {
    pub player_id: PlayerId,
    pub value: u8,
    pub from: u16,
    pub to: u16,
    pub tile: TileKind,
    pub effect: TileEffect,
}

impl Game {
    /// Fresh waiting lobby with the host seated as the first player.
    pub fn new(
        id: GameId,
        code: impl Into<String>,
        host_user_id: UserId,
        host_username: &str,
        settings: GameSettings,
        rules: GameRules,
        seed: u64,
    ) -> Self {
        let mut game = Self {
            id,
            code: code.into(),
            host_user_id,
            status: GameStatus::Waiting,
            mode: settings.mode,
            max_players: settings.max_players,
            board_length: settings.board_length,
            players: Vec::new(),
            tiles: match settings.mode {
                GameMode::CardDuel => Vec::new(),
                _ => super::board::pattern_board(settings.board_length),
            },
            current_turn_index: 0,
            pending: None,
            winner: None,
            version: 1,
            last_roll: None,
            last_duel: None,
            log: Vec::new(),
            chat: Vec::new(),
            card_duel: Vec::new(),
            rules,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_player_id: 1,
            next_card_id: 1,
            next_log_seq: 1,
        };
        let host = game.seat_player(host_user_id, host_username);
        game.push_log(
            LogKind::CreateGame,
            Some(host),
            format!("{host_username} created game {}", game.code),
        );
        game
    }

    /// Append a new player at the end of the rotation.
    pub(crate) fn seat_player(&mut self, user_id: UserId, username: &str) -> PlayerId {
        let id = self.next_player_id;
        self.next_player_id += 1;
        let turn_order = self.players.len() as u8;
        self.players
            .push(Player::new(id, user_id, username, turn_order, &self.rules));
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Like `player_mut` but reports a missing id as `NotFound(Player)`.
    pub(crate) fn require_player_mut(&mut self, id: PlayerId) -> Result<&mut Player, DomainError> {
        self.player_mut(id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("player {id} not in game"))
        })
    }

    pub fn player_by_user(&self, user_id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    /// Player id of `user_id`, or `NotAMember`.
    pub fn member_id(&self, user_id: UserId) -> Result<PlayerId, DomainError> {
        self.player_by_user(user_id).map(|p| p.id).ok_or_else(|| {
            DomainError::forbidden(ForbiddenKind::NotAMember, "you are not a player in this game")
        })
    }

    #[inline]
    pub fn is_host(&self, user_id: UserId) -> bool {
        self.host_user_id == user_id
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    /// Alive players other than `id`.
    pub fn alive_opponents(&self, id: PlayerId) -> impl Iterator<Item = &Player> {
        self.alive_players().filter(move |p| p.id != id)
    }

    pub fn last_position(&self) -> u16 {
        (self.tiles.len() as u16).saturating_sub(1)
    }

    pub fn tile(&self, position: u16) -> Option<&Tile> {
        self.tiles.get(position as usize)
    }

    /// Where a forward move of `steps` from `from` ends up for this game's mode.
    pub fn destination(&self, from: u16, steps: u16) -> u16 {
        let len = self.tiles.len() as u32;
        if len == 0 {
            return from;
        }
        match self.mode {
            GameMode::Finish => (from as u32 + steps as u32).min(len - 1) as u16,
            GameMode::Survival => ((from as u32 + steps as u32) % len) as u16,
            GameMode::CardDuel => from,
        }
    }

    pub fn push_log(&mut self, kind: LogKind, player_id: Option<PlayerId>, message: String) {
        let seq = self.next_log_seq;
        self.next_log_seq += 1;
        self.log.push(LogEntry {
            seq,
            kind,
            player_id,
            message,
        });
        if self.log.len() > LOG_CAPACITY {
            let overflow = self.log.len() - LOG_CAPACITY;
            self.log.drain(..overflow);
        }
    }

    pub(crate) fn username(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.username.clone())
            .unwrap_or_else(|| format!("player {id}"))
    }
}
