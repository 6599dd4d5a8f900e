//! Turn coordination: whose turn it is, movement rolls, and game over.

use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::log::LogKind;
use super::rules::DIE_FACES;
use super::state::{Game, GameMode, GameStatus, Player, PlayerId, RollOutcome};
use super::tiles::TileKind;
use crate::errors::domain::{ConflictKind, DomainError};

impl Game {
    pub fn current_player(&self) -> Option<&Player> {
        match self.status {
            GameStatus::Active => self.players.get(self.current_turn_index),
            _ => None,
        }
    }

    pub fn current_player_id(&self) -> Option<PlayerId> {
        self.current_player().map(|p| p.id)
    }

    /// Move the turn to the next alive player after the current one, in
    /// ascending turn order and wrapping. With nobody alive the game finishes
    /// and `NoAlivePlayers` is returned.
    pub fn advance_turn(&mut self) -> Result<PlayerId, DomainError> {
        let n = self.players.len();
        for step in 1..=n {
            let idx = (self.current_turn_index + step) % n;
            if self.players[idx].is_alive {
                self.current_turn_index = idx;
                let (id, name) = (self.players[idx].id, self.players[idx].username.clone());
                self.push_log(LogKind::TurnChange, Some(id), format!("It is {name}'s turn"));
                debug!(game_id = self.id, player_id = id, "turn advanced");
                return Ok(id);
            }
        }
        self.declare_winner(None);
        Err(DomainError::conflict(
            ConflictKind::NoAlivePlayers,
            "no alive players remain",
        ))
    }

    /// Refuse unless it is `player_id`'s turn in an active game with nothing pending.
    pub(crate) fn ensure_free_turn(&self, player_id: PlayerId) -> Result<(), DomainError> {
        if self.mode == GameMode::CardDuel {
            return Err(DomainError::phase_mismatch("card duel games have no board"));
        }
        if self.status != GameStatus::Active {
            return Err(DomainError::game_not_active(format!(
                "game is {}",
                self.status.as_str()
            )));
        }
        if self.current_player_id() != Some(player_id) {
            return Err(DomainError::not_your_turn("it is not your turn"));
        }
        if let Some(pending) = &self.pending {
            return Err(DomainError::not_your_turn(format!(
                "a {} action must be resolved first",
                pending.kind().as_str()
            )));
        }
        Ok(())
    }

    /// Roll the die for `player_id` and play out the move.
    pub fn roll_dice(
        &mut self,
        player_id: PlayerId,
        now: OffsetDateTime,
    ) -> Result<RollOutcome, DomainError> {
        self.ensure_free_turn(player_id)?;
        let value = self.rng.random_range(1..=DIE_FACES);
        self.apply_roll(player_id, value, now)
    }

    /// Play out a movement roll of `value`: move, apply the landed tile, then
    /// either leave the opened pending action or pass the turn.
    pub fn apply_roll(
        &mut self,
        player_id: PlayerId,
        value: u8,
        now: OffsetDateTime,
    ) -> Result<RollOutcome, DomainError> {
        self.ensure_free_turn(player_id)?;
        if !(1..=DIE_FACES).contains(&value) {
            return Err(DomainError::invalid_input(format!(
                "roll must be between 1 and {DIE_FACES}"
            )));
        }

        let from = self.require_player_mut(player_id)?.position;
        let to = self.destination(from, value as u16);
        self.require_player_mut(player_id)?.position = to;
        let name = self.username(player_id);
        self.push_log(
            LogKind::RollDice,
            Some(player_id),
            format!("{name} rolled {value}"),
        );
        self.push_log(
            LogKind::Move,
            Some(player_id),
            format!("{name} moved from {from} to {to}"),
        );

        let tile = self.tile(to).map(|t| t.kind).unwrap_or(TileKind::Empty);
        let effect = self.apply_tile_effect(player_id, now)?;
        let landed = self.require_player_mut(player_id)?.position;

        let outcome = RollOutcome {
            player_id,
            value,
            from,
            to: landed,
            tile,
            effect,
        };
        self.last_roll = Some(outcome.clone());

        info!(
            game_id = self.id,
            player_id,
            value,
            from,
            to = landed,
            tile = tile.name(),
            "dice rolled"
        );

        self.settle_survivors();
        if self.status == GameStatus::Active && self.pending.is_none() {
            self.end_turn();
        }
        Ok(outcome)
    }

    /// Called once the acting player's turn is over. Consumes an extra roll
    /// if the player has one, otherwise advances the turn.
    pub(crate) fn end_turn(&mut self) {
        self.settle_survivors();
        if self.status != GameStatus::Active {
            return;
        }
        if let Some(player) = self.players.get_mut(self.current_turn_index) {
            if player.is_alive && player.extra_rolls > 0 {
                player.extra_rolls -= 1;
                let (id, name) = (player.id, player.username.clone());
                self.push_log(LogKind::ExtraRoll, Some(id), format!("{name} rolls again"));
                return;
            }
        }
        // a NoAlivePlayers result has already finished the game
        let _ = self.advance_turn();
    }

    /// Finish with a sole survivor once a started game is down to one player.
    pub(crate) fn settle_survivors(&mut self) {
        if !self.status.is_in_progress() || self.players.len() < 2 {
            return;
        }
        let alive: Vec<PlayerId> = self.alive_players().map(|p| p.id).collect();
        match alive.as_slice() {
            [sole] => self.declare_winner(Some(*sole)),
            [] => self.declare_winner(None),
            _ => {}
        }
    }

    pub(crate) fn record_elimination(&mut self, player_id: PlayerId) {
        let name = self.username(player_id);
        self.push_log(
            LogKind::PlayerEliminated,
            Some(player_id),
            format!("{name} was eliminated"),
        );
        info!(game_id = self.id, player_id, "player eliminated");
    }

    /// Finish the game. Any open pending action is discarded.
    pub(crate) fn declare_winner(&mut self, winner: Option<PlayerId>) {
        if self.status == GameStatus::Finished {
            return;
        }
        self.status = GameStatus::Finished;
        self.winner = winner;
        self.pending = None;
        let message = match winner {
            Some(id) => format!("{} won the game", self.username(id)),
            None => "The game ended with no winner".to_string(),
        };
        self.push_log(LogKind::GameEnd, winner, message);
        info!(game_id = self.id, winner = ?winner, "game finished");
    }
}
