//! Gun tiles: shoot one other player or pass.

use tracing::debug;

use super::log::LogKind;
use super::pending::PendingAction;
use super::state::{Game, GameStatus, PlayerId};
use crate::errors::domain::DomainError;

/// Gun tile: shoot one alive opponent or pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GunAction {
    pub for_player: PlayerId,
    pub damage: u32,
}

impl Game {
    fn gun_for(&self, player_id: PlayerId) -> Result<GunAction, DomainError> {
        if self.status != GameStatus::Active {
            return Err(DomainError::game_not_active("the game is not being played"));
        }
        match &self.pending {
            Some(PendingAction::Gun(gun)) if gun.for_player == player_id => Ok(*gun),
            Some(PendingAction::Gun(_)) => {
                Err(DomainError::not_your_turn("this gun belongs to another player"))
            }
            _ => Err(DomainError::already_resolved("there is no gun to fire")),
        }
    }

    pub fn gun_attack(&mut self, player_id: PlayerId, target: PlayerId) -> Result<(), DomainError> {
        let gun = self.gun_for(player_id)?;
        if target == player_id || !self.player(target).is_some_and(|p| p.is_alive) {
            return Err(DomainError::no_such_target(format!(
                "player {target} cannot be shot"
            )));
        }

        self.clear_pending();
        let dmg = self.require_player_mut(target)?.take_damage(gun.damage);
        let (shooter, victim) = (self.username(player_id), self.username(target));
        self.push_log(
            LogKind::GunAttack,
            Some(player_id),
            format!("{shooter} shot {victim} for {} damage", dmg.lost),
        );
        if dmg.eliminated {
            self.record_elimination(target);
        }
        debug!(game_id = self.id, player_id, target, lost = dmg.lost, "gun fired");
        self.end_turn();
        Ok(())
    }

    pub fn gun_skip(&mut self, player_id: PlayerId) -> Result<(), DomainError> {
        self.gun_for(player_id)?;
        self.clear_pending();
        let name = self.username(player_id);
        self.push_log(LogKind::GunAttack, Some(player_id), format!("{name} holstered the gun"));
        self.end_turn();
        Ok(())
    }
}
