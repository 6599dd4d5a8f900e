//! Duels: a commit/predict mind game between the tile owner and an opponent.
//!
//! Phases run `choose_opponent -> commit -> predict -> winner_choice` and
//! resolve into a [`DuelResult`]. Each side scores a point when its
//! prediction matches the other side's committed move; the higher score
//! wins, equal scores draw with no reward.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::log::LogKind;
use super::pending::PendingAction;
use super::state::{Game, GameStatus, PlayerId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelMove {
    Strike,
    Guard,
    Feint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelReward {
    /// Steal coins from the loser.
    Coins,
    /// Damage the loser.
    Damage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelPhase {
    ChooseOpponent,
    Commit,
    Predict,
    WinnerChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelSide {
    pub player_id: PlayerId,
    pub committed: Option<DuelMove>,
    pub prediction: Option<DuelMove>,
}

impl DuelSide {
    fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            committed: None,
            prediction: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duel {
    pub challenger: DuelSide,
    pub opponent: Option<DuelSide>,
    pub phase: DuelPhase,
    pub winner: Option<PlayerId>,
}

/// Public record of a finished duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuelResult {
    pub challenger: PlayerId,
    pub opponent: PlayerId,
    pub challenger_move: Option<DuelMove>,
    pub opponent_move: Option<DuelMove>,
    pub challenger_prediction: Option<DuelMove>,
    pub opponent_prediction: Option<DuelMove>,
    pub winner: Option<PlayerId>,
    pub reward: Option<DuelReward>,
    /// Coins stolen or damage dealt.
    pub amount: u32,
}

impl Duel {
    pub fn new(challenger: PlayerId) -> Self {
        Self {
            challenger: DuelSide::new(challenger),
            opponent: None,
            phase: DuelPhase::ChooseOpponent,
            winner: None,
        }
    }

    pub fn is_participant(&self, id: PlayerId) -> bool {
        self.challenger.player_id == id || self.opponent.is_some_and(|o| o.player_id == id)
    }

    /// Participant `id`'s side.
    pub fn side(&self, id: PlayerId) -> Option<&DuelSide> {
        if self.challenger.player_id == id {
            return Some(&self.challenger);
        }
        self.opponent.as_ref().filter(|o| o.player_id == id)
    }

    fn side_mut(&mut self, id: PlayerId) -> Option<&mut DuelSide> {
        if self.challenger.player_id == id {
            return Some(&mut self.challenger);
        }
        self.opponent.as_mut().filter(|o| o.player_id == id)
    }

    /// The other participant of `id`.
    pub fn other_side(&self, id: PlayerId) -> Option<&DuelSide> {
        let opponent = self.opponent.as_ref()?;
        if self.challenger.player_id == id {
            Some(opponent)
        } else if opponent.player_id == id {
            Some(&self.challenger)
        } else {
            None
        }
    }

    pub fn waiting_on(&self) -> Vec<PlayerId> {
        let sides = || std::iter::once(&self.challenger).chain(self.opponent.iter());
        match self.phase {
            DuelPhase::ChooseOpponent => vec![self.challenger.player_id],
            DuelPhase::Commit => sides()
                .filter(|s| s.committed.is_none())
                .map(|s| s.player_id)
                .collect(),
            DuelPhase::Predict => sides()
                .filter(|s| s.prediction.is_none())
                .map(|s| s.player_id)
                .collect(),
            DuelPhase::WinnerChoice => self.winner.into_iter().collect(),
        }
    }

    /// Score both predictions; `None` on a draw.
    fn decide(&self) -> Option<PlayerId> {
        let opponent = self.opponent.as_ref()?;
        let challenger_hit = self.challenger.prediction.is_some()
            && self.challenger.prediction == opponent.committed;
        let opponent_hit =
            opponent.prediction.is_some() && opponent.prediction == self.challenger.committed;
        match (challenger_hit, opponent_hit) {
            (true, false) => Some(self.challenger.player_id),
            (false, true) => Some(opponent.player_id),
            _ => None,
        }
    }

    fn result(&self, reward: Option<DuelReward>, amount: u32) -> DuelResult {
        let opponent = self
            .opponent
            .unwrap_or_else(|| DuelSide::new(self.challenger.player_id));
        DuelResult {
            challenger: self.challenger.player_id,
            opponent: opponent.player_id,
            challenger_move: self.challenger.committed,
            opponent_move: opponent.committed,
            challenger_prediction: self.challenger.prediction,
            opponent_prediction: opponent.prediction,
            winner: self.winner,
            reward,
            amount,
        }
    }
}

impl Game {
    fn duel_mut(&mut self) -> Result<&mut Duel, DomainError> {
        if self.status != GameStatus::Active {
            return Err(DomainError::game_not_active("the game is not being played"));
        }
        match self.pending.as_mut() {
            Some(PendingAction::Duel(duel)) => Ok(duel),
            _ => Err(DomainError::already_resolved("there is no open duel")),
        }
    }

    fn duel_in_phase(&mut self, phase: DuelPhase) -> Result<&mut Duel, DomainError> {
        let duel = self.duel_mut()?;
        if duel.phase != phase {
            return Err(DomainError::phase_mismatch(format!(
                "the duel is in the {:?} phase",
                duel.phase
            )));
        }
        Ok(duel)
    }

    /// Challenger names the opponent.
    pub fn duel_select_opponent(
        &mut self,
        player_id: PlayerId,
        target: PlayerId,
    ) -> Result<(), DomainError> {
        let target_ok = target != player_id && self.player(target).is_some_and(|p| p.is_alive);
        let duel = self.duel_in_phase(DuelPhase::ChooseOpponent)?;
        if duel.challenger.player_id != player_id {
            return Err(DomainError::not_your_turn("only the challenger picks an opponent"));
        }
        if !target_ok {
            return Err(DomainError::no_such_target(format!(
                "player {target} cannot be challenged"
            )));
        }
        duel.opponent = Some(DuelSide::new(target));
        duel.phase = DuelPhase::Commit;

        let (a, b) = (self.username(player_id), self.username(target));
        self.push_log(LogKind::DuelStart, Some(player_id), format!("{a} challenged {b}"));
        Ok(())
    }

    /// Secretly commit a move. Advances to `predict` once both sides commit.
    pub fn duel_commit(&mut self, player_id: PlayerId, mv: DuelMove) -> Result<(), DomainError> {
        let duel = self.duel_in_phase(DuelPhase::Commit)?;
        let side = duel
            .side_mut(player_id)
            .ok_or_else(|| DomainError::not_your_turn("you are not in this duel"))?;
        if side.committed.is_some() {
            return Err(DomainError::already_resolved("you already committed a move"));
        }
        side.committed = Some(mv);
        let both = duel.challenger.committed.is_some()
            && duel.opponent.is_some_and(|o| o.committed.is_some());
        if both {
            duel.phase = DuelPhase::Predict;
        }
        Ok(())
    }

    /// Predict the opponent's move. Scores the duel once both sides predict.
    pub fn duel_predict(&mut self, player_id: PlayerId, mv: DuelMove) -> Result<(), DomainError> {
        let duel = self.duel_in_phase(DuelPhase::Predict)?;
        let side = duel
            .side_mut(player_id)
            .ok_or_else(|| DomainError::not_your_turn("you are not in this duel"))?;
        if side.prediction.is_some() {
            return Err(DomainError::already_resolved("you already made a prediction"));
        }
        side.prediction = Some(mv);
        let both = duel.challenger.prediction.is_some()
            && duel.opponent.is_some_and(|o| o.prediction.is_some());
        if !both {
            return Ok(());
        }

        match duel.decide() {
            Some(winner) => {
                duel.winner = Some(winner);
                duel.phase = DuelPhase::WinnerChoice;
                Ok(())
            }
            None => {
                let result = duel.result(None, 0);
                self.finish_duel(result);
                Ok(())
            }
        }
    }

    /// Winner picks a reward, resolving the duel.
    pub fn duel_choose_reward(
        &mut self,
        player_id: PlayerId,
        reward: DuelReward,
    ) -> Result<(), DomainError> {
        let steal_cap = self.rules.duel_steal_coins;
        let damage = self.rules.duel_damage;
        let duel = self.duel_in_phase(DuelPhase::WinnerChoice)?;
        if duel.winner != Some(player_id) {
            return Err(DomainError::not_your_turn("only the duel winner chooses the reward"));
        }
        let loser = duel
            .other_side(player_id)
            .map(|s| s.player_id)
            .ok_or_else(|| DomainError::no_such_target("duel has no opponent"))?;
        let snapshot = duel.clone();

        let amount = match reward {
            DuelReward::Coins => {
                let loser_p = self.require_player_mut(loser)?;
                let stolen = loser_p.coins.min(steal_cap);
                loser_p.coins -= stolen;
                let winner_p = self.require_player_mut(player_id)?;
                winner_p.coins = winner_p.coins.saturating_add(stolen);
                stolen
            }
            DuelReward::Damage => {
                let dmg = self.require_player_mut(loser)?.take_damage(damage);
                if dmg.eliminated {
                    self.record_elimination(loser);
                }
                dmg.lost
            }
        };

        self.finish_duel(snapshot.result(Some(reward), amount));
        Ok(())
    }

    /// Challenger declines to duel.
    pub fn duel_skip(&mut self, player_id: PlayerId) -> Result<(), DomainError> {
        let duel = self.duel_in_phase(DuelPhase::ChooseOpponent)?;
        if duel.challenger.player_id != player_id {
            return Err(DomainError::not_your_turn("only the challenger can skip the duel"));
        }
        self.clear_pending();
        let name = self.username(player_id);
        self.push_log(LogKind::DuelResult, Some(player_id), format!("{name} skipped the duel"));
        self.end_turn();
        Ok(())
    }

    fn finish_duel(&mut self, result: DuelResult) {
        self.clear_pending();
        let message = match (result.winner, result.reward) {
            (Some(w), Some(DuelReward::Coins)) => {
                format!("{} won the duel and stole {} coins", self.username(w), result.amount)
            }
            (Some(w), Some(DuelReward::Damage)) => {
                format!("{} won the duel and dealt {} damage", self.username(w), result.amount)
            }
            _ => "The duel ended in a draw".to_string(),
        };
        self.push_log(LogKind::DuelResult, result.winner, message);
        info!(
            game_id = self.id,
            challenger = result.challenger,
            opponent = result.opponent,
            winner = ?result.winner,
            "duel resolved"
        );
        self.last_duel = Some(result);
        self.end_turn();
    }
}
