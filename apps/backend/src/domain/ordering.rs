//! Turn-order rolls after a game starts.

use rand::Rng;
use tracing::info;

use super::log::LogKind;
use super::pending::PendingAction;
use super::rules::DIE_FACES;
use super::state::{Game, GameStatus, PlayerId};
use crate::errors::domain::DomainError;

/// Every player rolls once; highest roll goes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingRoll {
    /// In join order.
    pub rolls: Vec<(PlayerId, Option<u8>)>,
}

impl OrderingRoll {
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            rolls: players.into_iter().map(|id| (id, None)).collect(),
        }
    }

    pub fn waiting_on(&self) -> Vec<PlayerId> {
        self.rolls
            .iter()
            .filter(|(_, roll)| roll.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn roll_of(&self, id: PlayerId) -> Option<u8> {
        self.rolls
            .iter()
            .find(|(pid, _)| *pid == id)
            .and_then(|(_, roll)| *roll)
    }
}

impl Game {
    /// Roll for turn order.
    pub fn order_roll(&mut self, player_id: PlayerId) -> Result<u8, DomainError> {
        self.check_order_roll(player_id)?;
        let value = self.rng.random_range(1..=DIE_FACES);
        self.apply_order_roll(player_id, value)?;
        Ok(value)
    }

    fn check_order_roll(&self, player_id: PlayerId) -> Result<(), DomainError> {
        match self.status {
            GameStatus::Ordering => {}
            GameStatus::Drafting | GameStatus::Active => {
                return Err(DomainError::already_resolved("turn order is already decided"))
            }
            _ => return Err(DomainError::game_not_active("the game is not ordering turns")),
        }
        match &self.pending {
            Some(PendingAction::OrderingRoll(o)) => match o.rolls.iter().find(|(id, _)| *id == player_id) {
                None => Err(DomainError::not_your_turn("you are not rolling for order")),
                Some((_, Some(_))) => Err(DomainError::already_resolved("you already rolled")),
                Some((_, None)) => Ok(()),
            },
            _ => Err(DomainError::already_resolved("turn order is already decided")),
        }
    }

    /// Record an ordering roll of `value`; once everybody has rolled, seats
    /// are reassigned by descending roll (ties keep join order) and drafting
    /// begins.
    pub fn apply_order_roll(&mut self, player_id: PlayerId, value: u8) -> Result<(), DomainError> {
        self.check_order_roll(player_id)?;
        if !(1..=DIE_FACES).contains(&value) {
            return Err(DomainError::invalid_input(format!(
                "roll must be between 1 and {DIE_FACES}"
            )));
        }

        let mut complete = None;
        if let Some(PendingAction::OrderingRoll(o)) = self.pending.as_mut() {
            if let Some(slot) = o.rolls.iter_mut().find(|(id, _)| *id == player_id) {
                slot.1 = Some(value);
            }
            if o.waiting_on().is_empty() {
                complete = Some(o.clone());
            }
        }
        let name = self.username(player_id);
        self.push_log(
            LogKind::OrderRoll,
            Some(player_id),
            format!("{name} rolled {value} for turn order"),
        );

        if let Some(order) = complete {
            self.clear_pending();
            // stable sort keeps join order for equal rolls
            self.players
                .sort_by_key(|p| std::cmp::Reverse(order.roll_of(p.id).unwrap_or(0)));
            for (seat, p) in self.players.iter_mut().enumerate() {
                p.turn_order = seat as u8;
            }
            self.current_turn_index = 0;
            let order_names: Vec<&str> = self.players.iter().map(|p| p.username.as_str()).collect();
            info!(game_id = self.id, order = ?order_names, "turn order decided");
            self.begin_draft();
        }
        Ok(())
    }
}
