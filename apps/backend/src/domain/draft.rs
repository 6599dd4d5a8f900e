//! Card draft before play: each player in turn order picks one of a few offers.

use std::collections::VecDeque;

use tracing::info;

use super::cards::CardInstance;
use super::log::LogKind;
use super::pending::PendingAction;
use super::state::{CardId, Game, GameStatus, PlayerId};
use crate::errors::domain::DomainError;

/// Starting-card draft; players pick one card at a time in turn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub picker: PlayerId,
    /// Only visible to `picker`.
    pub offers: Vec<CardInstance>,
    /// Pickers after the current one.
    pub queue: VecDeque<PlayerId>,
}

impl Game {
    /// Enter drafting, or go straight to play when no picks are configured.
    pub(crate) fn begin_draft(&mut self) {
        let picks = self.rules.draft_picks_per_player as usize;
        let mut queue: VecDeque<PlayerId> = (0..picks)
            .flat_map(|_| self.players.iter().map(|p| p.id).collect::<Vec<_>>())
            .collect();

        match queue.pop_front() {
            Some(picker) => {
                self.status = GameStatus::Drafting;
                let offers = self.mint_random_cards(self.rules.draft_offer_count as usize);
                self.pending = Some(PendingAction::Draft(Draft {
                    picker,
                    offers,
                    queue,
                }));
            }
            None => self.begin_play(),
        }
    }

    fn begin_play(&mut self) {
        self.status = GameStatus::Active;
        self.current_turn_index = 0;
        self.pending = None;
        let first = self.players.first().map(|p| (p.id, p.username.clone()));
        if let Some((id, name)) = first {
            self.push_log(
                LogKind::StartGame,
                Some(id),
                format!("The game is on! {name} goes first"),
            );
        }
        info!(game_id = self.id, "game active");
    }

    /// Take an offered card into the picker's inventory.
    pub fn draft_pick(&mut self, player_id: PlayerId, card_id: CardId) -> Result<(), DomainError> {
        match self.status {
            GameStatus::Drafting => {}
            GameStatus::Active => return Err(DomainError::already_resolved("the draft is over")),
            _ => return Err(DomainError::game_not_active("the game is not drafting")),
        }
        let draft = match self.pending.as_mut() {
            Some(PendingAction::Draft(d)) => d,
            _ => return Err(DomainError::already_resolved("the draft is over")),
        };
        if draft.picker != player_id {
            return Err(DomainError::not_your_turn("it is not your pick"));
        }
        let index = draft
            .offers
            .iter()
            .position(|c| c.id == card_id)
            .ok_or_else(|| DomainError::no_such_target(format!("card {card_id} is not offered")))?;
        let card = draft.offers.remove(index);
        let next = draft.queue.pop_front();

        self.require_player_mut(player_id)?.cards.push(card);
        let name = self.username(player_id);
        self.push_log(
            LogKind::DraftPick,
            Some(player_id),
            format!("{name} drafted {}", card.kind.card_type().name),
        );

        match next {
            Some(picker) => {
                let offers = self.mint_random_cards(self.rules.draft_offer_count as usize);
                if let Some(PendingAction::Draft(d)) = self.pending.as_mut() {
                    d.picker = picker;
                    d.offers = offers;
                }
            }
            None => self.begin_play(),
        }
        Ok(())
    }
}
