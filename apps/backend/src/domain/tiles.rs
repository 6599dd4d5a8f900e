//! Board tiles and the effect applied when a roll lands on one.

use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

use super::duel::Duel;
use super::gun::GunAction;
use super::log::LogKind;
use super::pending::{PendingAction, PendingKind};
use super::question::{generate_math_question, PendingQuestion};
use super::state::{Damage, Game, GameMode, PlayerId};
use crate::errors::domain::DomainError;

/// Tile type with its static effect parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TileKind {
    Start,
    Finish,
    Empty,
    Trap { damage: u32 },
    Heal { amount: u32 },
    Bonus { coins: u32 },
    Question { reward: u32 },
    Warp { offset: i16 },
    MassWarp { target: u16 },
    Duel,
    Shop { level: u8 },
    Gun { damage: u32 },
    Portal { target: u16 },
}

impl TileKind {
    pub fn name(&self) -> &'static str {
        match self {
            TileKind::Start => "start",
            TileKind::Finish => "finish",
            TileKind::Empty => "empty",
            TileKind::Trap { .. } => "trap",
            TileKind::Heal { .. } => "heal",
            TileKind::Bonus { .. } => "bonus",
            TileKind::Question { .. } => "question",
            TileKind::Warp { .. } => "warp",
            TileKind::MassWarp { .. } => "mass_warp",
            TileKind::Duel => "duel",
            TileKind::Shop { .. } => "shop",
            TileKind::Gun { .. } => "gun",
            TileKind::Portal { .. } => "portal",
        }
    }

    /// Short label shown on the board.
    pub fn label(&self) -> String {
        match self {
            TileKind::Start => "Start".to_string(),
            TileKind::Finish => "Finish".to_string(),
            TileKind::Empty => String::new(),
            TileKind::Trap { damage } => format!("-{damage} HP"),
            TileKind::Heal { amount } => format!("+{amount} HP"),
            TileKind::Bonus { coins } => format!("+{coins} coins"),
            TileKind::Question { reward } => format!("? +{reward}"),
            TileKind::Warp { offset } => format!("Warp {offset:+}"),
            TileKind::MassWarp { target } => format!("All to {target}"),
            TileKind::Duel => "Duel".to_string(),
            TileKind::Shop { level } => format!("Shop L{level}"),
            TileKind::Gun { damage } => format!("Gun {damage}"),
            TileKind::Portal { target } => format!("Portal {target}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub position: u16,
    #[serde(flatten)]
    pub kind: TileKind,
    pub label: String,
}

impl Tile {
    pub fn new(position: u16, kind: TileKind) -> Self {
        Self {
            position,
            kind,
            label: kind.label(),
        }
    }
}

/// What landing on a tile did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TileEffect {
    None,
    Won,
    Damaged(Damage),
    Healed { amount: u32 },
    Coins { amount: u32 },
    Moved { from: u16, to: u16 },
    MassMoved { target: u16, players: Vec<PlayerId> },
    Opened { pending: PendingKind },
    /// Duel or gun tile with nobody to target.
    NoOpponent,
}

impl Game {
    /// Apply the effect of the tile under `player_id`.
    ///
    /// Deterministic given the game state and rng; warps, mass warps and
    /// portals move players without activating the tile they reach.
    pub(crate) fn apply_tile_effect(
        &mut self,
        player_id: PlayerId,
        now: OffsetDateTime,
    ) -> Result<TileEffect, DomainError> {
        let position = self.require_player_mut(player_id)?.position;
        let kind = match self.tile(position) {
            Some(tile) => tile.kind,
            None => return Ok(TileEffect::None),
        };
        let name = self.username(player_id);

        let effect = match kind {
            TileKind::Start | TileKind::Empty => TileEffect::None,
            TileKind::Finish => match self.mode {
                GameMode::Finish => {
                    self.declare_winner(Some(player_id));
                    TileEffect::Won
                }
                GameMode::Survival | GameMode::CardDuel => TileEffect::None,
            },
            TileKind::Trap { damage } => {
                let dmg = self.require_player_mut(player_id)?.take_damage(damage);
                self.push_log(
                    LogKind::TileEffect,
                    Some(player_id),
                    format!("{name} hit a trap and lost {} hp", dmg.lost),
                );
                if dmg.eliminated {
                    self.record_elimination(player_id);
                }
                TileEffect::Damaged(dmg)
            }
            TileKind::Heal { amount } => {
                self.require_player_mut(player_id)?.heal(amount);
                self.push_log(
                    LogKind::TileEffect,
                    Some(player_id),
                    format!("{name} healed {amount} hp"),
                );
                TileEffect::Healed { amount }
            }
            TileKind::Bonus { coins } => {
                let p = self.require_player_mut(player_id)?;
                p.coins = p.coins.saturating_add(coins);
                self.push_log(
                    LogKind::TileEffect,
                    Some(player_id),
                    format!("{name} found {coins} coins"),
                );
                TileEffect::Coins { amount: coins }
            }
            TileKind::Question { reward } => {
                let question = generate_math_question(&mut self.rng);
                self.open_pending(PendingAction::Question(PendingQuestion {
                    for_player: player_id,
                    question,
                    reward,
                    deadline: now + self.rules.question_timeout,
                }))?;
                self.push_log(
                    LogKind::QuestionStart,
                    Some(player_id),
                    format!("{name} must answer a question for {reward} coins"),
                );
                TileEffect::Opened {
                    pending: PendingKind::Question,
                }
            }
            TileKind::Warp { offset } => {
                let last = self.last_position() as i32;
                let to = (position as i32 + offset as i32).clamp(0, last) as u16;
                self.require_player_mut(player_id)?.position = to;
                self.push_log(
                    LogKind::TileEffect,
                    Some(player_id),
                    format!("{name} warped from {position} to {to}"),
                );
                TileEffect::Moved { from: position, to }
            }
            TileKind::MassWarp { target } => {
                let target = target.min(self.last_position());
                let mut moved = Vec::new();
                for p in self.players.iter_mut().filter(|p| p.is_alive) {
                    p.position = target;
                    moved.push(p.id);
                }
                self.push_log(
                    LogKind::TileEffect,
                    Some(player_id),
                    format!("{name} triggered a mass warp to {target}"),
                );
                TileEffect::MassMoved {
                    target,
                    players: moved,
                }
            }
            TileKind::Portal { target } => {
                let to = target.min(self.last_position());
                self.require_player_mut(player_id)?.position = to;
                self.push_log(
                    LogKind::TileEffect,
                    Some(player_id),
                    format!("{name} stepped through a portal to {to}"),
                );
                TileEffect::Moved { from: position, to }
            }
            TileKind::Duel => {
                if self.alive_opponents(player_id).next().is_none() {
                    TileEffect::NoOpponent
                } else {
                    self.open_pending(PendingAction::Duel(Duel::new(player_id)))?;
                    self.push_log(
                        LogKind::DuelStart,
                        Some(player_id),
                        format!("{name} may challenge someone to a duel"),
                    );
                    TileEffect::Opened {
                        pending: PendingKind::Duel,
                    }
                }
            }
            TileKind::Shop { level } => {
                self.open_shop(player_id, level)?;
                TileEffect::Opened {
                    pending: PendingKind::Shop,
                }
            }
            TileKind::Gun { damage } => {
                if self.alive_opponents(player_id).next().is_none() {
                    TileEffect::NoOpponent
                } else {
                    self.open_pending(PendingAction::Gun(GunAction {
                        for_player: player_id,
                        damage,
                    }))?;
                    TileEffect::Opened {
                        pending: PendingKind::Gun,
                    }
                }
            }
        };

        debug!(game_id = self.id, player_id, tile = kind.name(), position, "tile effect applied");
        Ok(effect)
    }
}
