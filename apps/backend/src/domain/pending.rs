//! The single blocking sub-interaction a game may have open.
//!
//! At most one `PendingAction` exists per game. While one is open the turn
//! does not advance and `roll` is refused; each kind has its own terminal
//! resolution in its module (`question`, `shop`, `duel`, `gun`, `draft`,
//! `ordering`).

use serde::Serialize;

use super::draft::Draft;
use super::duel::Duel;
use super::gun::GunAction;
use super::ordering::OrderingRoll;
use super::question::PendingQuestion;
use super::shop::ShopSession;
use super::state::{Game, PlayerId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    OrderingRoll(OrderingRoll),
    Draft(Draft),
    Question(PendingQuestion),
    Shop(ShopSession),
    Duel(Duel),
    Gun(GunAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    OrderingRoll,
    Draft,
    Question,
    Shop,
    Duel,
    Gun,
}

impl PendingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PendingKind::OrderingRoll => "ordering_roll",
            PendingKind::Draft => "draft",
            PendingKind::Question => "question",
            PendingKind::Shop => "shop",
            PendingKind::Duel => "duel",
            PendingKind::Gun => "gun",
        }
    }
}

impl PendingAction {
    pub fn kind(&self) -> PendingKind {
        match self {
            PendingAction::OrderingRoll(_) => PendingKind::OrderingRoll,
            PendingAction::Draft(_) => PendingKind::Draft,
            PendingAction::Question(_) => PendingKind::Question,
            PendingAction::Shop(_) => PendingKind::Shop,
            PendingAction::Duel(_) => PendingKind::Duel,
            PendingAction::Gun(_) => PendingKind::Gun,
        }
    }

    /// Players whose input the action is currently waiting for.
    pub fn awaiting(&self) -> Vec<PlayerId> {
        match self {
            PendingAction::OrderingRoll(o) => o.waiting_on(),
            PendingAction::Draft(d) => vec![d.picker],
            PendingAction::Question(q) => vec![q.for_player],
            PendingAction::Shop(s) => vec![s.for_player],
            PendingAction::Duel(d) => d.waiting_on(),
            PendingAction::Gun(g) => vec![g.for_player],
        }
    }
}

impl Game {
    /// Open `action`, failing with `ActionAlreadyPending` if one is open.
    pub fn open_pending(&mut self, action: PendingAction) -> Result<(), DomainError> {
        if let Some(existing) = &self.pending {
            return Err(DomainError::action_already_pending(format!(
                "a {} action is already pending",
                existing.kind().as_str()
            )));
        }
        self.pending = Some(action);
        Ok(())
    }

    /// Close whatever is pending.
    pub(crate) fn clear_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub fn pending_kind(&self) -> Option<PendingKind> {
        self.pending.as_ref().map(PendingAction::kind)
    }
}
