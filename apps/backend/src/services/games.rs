//! Lobby services: create, join, start, end, delete and list games.

use rand::Rng;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::game_flow::{commit, expire_question};
use super::game_store::GameStore;
use crate::domain::{
    snapshot, Game, GameId, GameMode, GameRules, GameSettings, GameSnapshot, GameStatus, UserId,
};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::utils::join_code::{generate_join_code, normalize_join_code};

/// Attempts at drawing an unused join code.
const JOIN_CODE_ATTEMPTS: usize = 8;

/// One row of the game list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub id: GameId,
    pub code: String,
    pub status: GameStatus,
    pub mode: GameMode,
    pub host_username: String,
    pub player_count: usize,
    pub max_players: u8,
    pub board_length: u16,
    pub is_member: bool,
    pub winner_id: Option<u32>,
}

impl GameSummary {
    fn of(game: &Game, viewer: UserId) -> Self {
        let host_username = game
            .player_by_user(game.host_user_id)
            .map(|p| p.username.clone())
            .unwrap_or_default();
        Self {
            id: game.id,
            code: game.code.clone(),
            status: game.status,
            mode: game.mode,
            host_username,
            player_count: game.players.len(),
            max_players: game.max_players,
            board_length: game.board_length,
            is_member: game.player_by_user(viewer).is_some(),
            winner_id: game.winner,
        }
    }
}

pub struct GameService;

impl GameService {
    pub fn new() -> Self {
        Self
    }

    /// Create a lobby with the caller as host and first player.
    pub fn create(
        &self,
        store: &GameStore,
        rules: &GameRules,
        host_id: UserId,
        host_username: &str,
        settings: GameSettings,
    ) -> Result<GameSnapshot, AppError> {
        let mut rng = rand::rng();
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let code = generate_join_code(&mut rng);
            let game = Game::new(
                store.next_id(),
                code,
                host_id,
                host_username,
                settings,
                rules.clone(),
                rng.random(),
            );
            match store.insert(game) {
                Ok(slot) => {
                    let game = slot.read();
                    info!(
                        game_id = game.id,
                        code = %game.code,
                        host_id,
                        mode = ?game.mode,
                        "game created"
                    );
                    let host = game.member_id(host_id)?;
                    return Ok(snapshot(&game, Some(host)));
                }
                Err(DomainError::Conflict(ConflictKind::JoinCodeConflict, _)) => {
                    warn!("join code collision, drawing another");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::internal("could not allocate a join code"))
    }

    /// Join the lobby with this code (case-insensitive).
    pub fn join(
        &self,
        store: &GameStore,
        user_id: UserId,
        username: &str,
        code: &str,
    ) -> Result<GameSnapshot, AppError> {
        let game_id = store.id_for_code(&normalize_join_code(code))?;
        let slot = store.get(game_id)?;
        let mut game = slot.write();
        let player_id = commit(&mut game, |g| g.join(user_id, username))?;
        info!(game_id, player_id, user_id, "player joined");
        Ok(snapshot(&game, Some(player_id)))
    }

    pub fn start(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
    ) -> Result<GameSnapshot, AppError> {
        let slot = store.get(game_id)?;
        let mut game = slot.write();
        commit(&mut game, |g| g.start(user_id))?;
        let viewer = game.member_id(user_id)?;
        Ok(snapshot(&game, Some(viewer)))
    }

    pub fn end(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        let slot = store.get(game_id)?;
        let mut game = slot.write();
        expire_question(&mut game, now);
        commit(&mut game, |g| g.end(user_id))?;
        info!(game_id, user_id, winner = ?game.winner, "game ended by host");
        let viewer = game.member_id(user_id)?;
        Ok(snapshot(&game, Some(viewer)))
    }

    pub fn delete(&self, store: &GameStore, game_id: GameId, user_id: UserId) -> Result<(), AppError> {
        let slot = store.get(game_id)?;
        // hold the lock so nobody starts the game in between
        let game = slot.write();
        game.ensure_deletable(user_id)?;
        store.remove(&game);
        info!(game_id, user_id, "game deleted");
        Ok(())
    }

    /// Waiting lobbies plus every game the caller belongs to.
    pub fn list(&self, store: &GameStore, user_id: UserId) -> Vec<GameSummary> {
        store
            .all()
            .iter()
            .filter_map(|slot| {
                let game = slot.read();
                let visible =
                    game.status == GameStatus::Waiting || game.player_by_user(user_id).is_some();
                visible.then(|| GameSummary::of(&game, user_id))
            })
            .collect()
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new()
    }
}
