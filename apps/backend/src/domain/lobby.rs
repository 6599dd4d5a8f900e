//! Lobby lifecycle: join, start, end.

use tracing::info;

use super::board::generate_board;
use super::log::LogKind;
use super::ordering::OrderingRoll;
use super::pending::PendingAction;
use super::rules::MIN_PLAYERS;
use super::state::{Game, GameMode, GameStatus, PlayerId, UserId};
use crate::errors::domain::{ConflictKind, DomainError, ForbiddenKind, ValidationKind};

impl Game {
    /// Seat `user_id` in a waiting lobby.
    pub fn join(&mut self, user_id: UserId, username: &str) -> Result<PlayerId, DomainError> {
        if self.player_by_user(user_id).is_some() {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyJoined,
                "you already joined this game",
            ));
        }
        if self.status != GameStatus::Waiting {
            return Err(DomainError::game_not_active("the game has already started"));
        }
        if self.players.len() >= self.max_players as usize {
            return Err(DomainError::conflict(ConflictKind::GameFull, "the game is full"));
        }
        let id = self.seat_player(user_id, username);
        self.push_log(LogKind::JoinGame, Some(id), format!("{username} joined"));
        Ok(id)
    }

    /// Host starts the game: a fresh random board, then ordering rolls.
    /// Card duels skip both and deal pick options instead.
    pub fn start(&mut self, user_id: UserId) -> Result<(), DomainError> {
        self.ensure_host(user_id)?;
        if self.status != GameStatus::Waiting {
            return Err(DomainError::phase_mismatch("the game has already started"));
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::NotEnoughPlayers,
                format!("at least {MIN_PLAYERS} players are needed to start"),
            ));
        }

        if self.mode == GameMode::CardDuel {
            self.start_card_duel();
            return Ok(());
        }

        self.tiles = generate_board(&mut self.rng, self.board_length);
        for p in &mut self.players {
            p.position = 0;
        }
        self.status = GameStatus::Ordering;
        let ids: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        self.open_pending(PendingAction::OrderingRoll(OrderingRoll::new(ids)))?;
        self.push_log(
            LogKind::StartGame,
            None,
            "The game started. Roll for turn order!".to_string(),
        );
        info!(game_id = self.id, players = self.players.len(), "game started");
        Ok(())
    }

    /// Host ends a game in progress. A sole survivor, if any, wins.
    pub fn end(&mut self, user_id: UserId) -> Result<(), DomainError> {
        self.ensure_host(user_id)?;
        if !self.status.is_in_progress() {
            return Err(DomainError::game_not_active("only a running game can be ended"));
        }
        let alive: Vec<PlayerId> = self.alive_players().map(|p| p.id).collect();
        let winner = match alive.as_slice() {
            [sole] => Some(*sole),
            _ => None,
        };
        self.declare_winner(winner);
        Ok(())
    }

    /// Host may delete a game that is not in progress.
    pub fn ensure_deletable(&self, user_id: UserId) -> Result<(), DomainError> {
        self.ensure_host(user_id)?;
        if self.status.is_in_progress() {
            return Err(DomainError::phase_mismatch("a running game cannot be deleted"));
        }
        Ok(())
    }

    fn ensure_host(&self, user_id: UserId) -> Result<(), DomainError> {
        if !self.is_host(user_id) {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotHost,
                "only the host can do that",
            ));
        }
        Ok(())
    }
}
