//! Support card catalogue, card instances and card use.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use super::log::LogKind;
use super::pending::PendingAction;
use super::question::generate_math_question;
use super::state::{CardId, Game, GameMode, GameStatus, PlayerId};
use crate::errors::domain::DomainError;

/// Card types in the catalogue. Each type has exactly one effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    MoveExtra,
    Heal,
    Shield,
    Reroll,
    SwapPosition,
    ChangeQuestion,
}

/// Static catalogue entry.
#[derive(Debug)]
pub struct CardType {
    pub kind: CardKind,
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_price: u32,
}

pub const CATALOGUE: [CardType; 6] = [
    CardType {
        kind: CardKind::MoveExtra,
        code: "move_extra",
        name: "Sprint",
        description: "Move 1 to 3 cells forward",
        base_price: 3,
    },
    CardType {
        kind: CardKind::Heal,
        code: "heal",
        name: "Medkit",
        description: "Restore 2 hp",
        base_price: 3,
    },
    CardType {
        kind: CardKind::Shield,
        code: "shield",
        name: "Shield",
        description: "Absorb the next 2 damage",
        base_price: 2,
    },
    CardType {
        kind: CardKind::Reroll,
        code: "reroll",
        name: "Second Wind",
        description: "Roll again at the end of this turn",
        base_price: 4,
    },
    CardType {
        kind: CardKind::SwapPosition,
        code: "swap_position",
        name: "Switcheroo",
        description: "Swap positions with another player",
        base_price: 4,
    },
    CardType {
        kind: CardKind::ChangeQuestion,
        code: "change_question",
        name: "Skip Question",
        description: "Replace your open question with a new one",
        base_price: 2,
    },
];

const HEAL_AMOUNT: u32 = 2;
const SHIELD_AMOUNT: u32 = 2;
const MOVE_EXTRA_MAX: u16 = 3;

impl CardKind {
    pub fn card_type(self) -> &'static CardType {
        match self {
            CardKind::MoveExtra => &CATALOGUE[0],
            CardKind::Heal => &CATALOGUE[1],
            CardKind::Shield => &CATALOGUE[2],
            CardKind::Reroll => &CATALOGUE[3],
            CardKind::SwapPosition => &CATALOGUE[4],
            CardKind::ChangeQuestion => &CATALOGUE[5],
        }
    }

    pub fn code(self) -> &'static str {
        self.card_type().code
    }

    pub fn base_price(self) -> u32 {
        self.card_type().base_price
    }

    /// Half price, rounded down.
    pub fn sell_price(self) -> u32 {
        self.base_price() / 2
    }

    pub fn needs_target(self) -> bool {
        matches!(self, CardKind::SwapPosition)
    }
}

/// A concrete card: held by one player or offered by a shop or draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardInstance {
    pub id: CardId,
    pub kind: CardKind,
}

pub fn random_kind<R: Rng + ?Sized>(rng: &mut R) -> CardKind {
    CATALOGUE
        .choose(rng)
        .map(|t| t.kind)
        .unwrap_or(CardKind::Heal)
}

/// What a used card did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum CardOutcome {
    Moved { from: u16, to: u16, won: bool },
    Healed { amount: u32 },
    Shielded { amount: u32 },
    ExtraRoll,
    Swapped { with: PlayerId },
    QuestionChanged,
}

impl Game {
    pub(crate) fn mint_card(&mut self, kind: CardKind) -> CardInstance {
        let id = self.next_card_id;
        self.next_card_id += 1;
        CardInstance { id, kind }
    }

    pub(crate) fn mint_random_cards(&mut self, count: usize) -> Vec<CardInstance> {
        (0..count)
            .map(|_| {
                let kind = random_kind(&mut self.rng);
                self.mint_card(kind)
            })
            .collect()
    }

    /// Use a card from `player_id`'s inventory.
    ///
    /// `change_question` needs the player's own open question; every other card
    /// is played on the player's own turn with nothing pending. Card movement
    /// never triggers tile effects except winning on the finish tile.
    pub fn use_card(
        &mut self,
        player_id: PlayerId,
        card_id: CardId,
        target: Option<PlayerId>,
        now: OffsetDateTime,
    ) -> Result<CardOutcome, DomainError> {
        if self.status != GameStatus::Active {
            return Err(DomainError::game_not_active("cards can only be used during play"));
        }
        let player = self.require_player_mut(player_id)?;
        let index = player.card_index(card_id).ok_or_else(|| {
            DomainError::insufficient_resource(format!("you do not hold card {card_id}"))
        })?;
        let kind = player.cards[index].kind;

        if kind == CardKind::ChangeQuestion {
            match &self.pending {
                Some(PendingAction::Question(q)) if q.for_player == player_id => {}
                Some(PendingAction::Question(_)) => {
                    return Err(DomainError::not_your_turn("that question belongs to another player"))
                }
                _ => return Err(DomainError::phase_mismatch("you have no open question")),
            }
        } else {
            self.ensure_free_turn(player_id)?;
        }

        if kind.needs_target() {
            let target_id = target
                .ok_or_else(|| DomainError::no_such_target("this card needs a target player"))?;
            if target_id == player_id || !self.player(target_id).is_some_and(|p| p.is_alive) {
                return Err(DomainError::no_such_target(format!(
                    "player {target_id} is not a valid target"
                )));
            }
        }

        // all checks passed; consume the card before applying it
        let card = self.require_player_mut(player_id)?.cards.remove(index);

        let outcome = match kind {
            CardKind::MoveExtra => {
                let steps = self.rng.random_range(1..=MOVE_EXTRA_MAX);
                self.move_by_card(player_id, steps)?
            }
            CardKind::Heal => {
                self.require_player_mut(player_id)?.heal(HEAL_AMOUNT);
                CardOutcome::Healed {
                    amount: HEAL_AMOUNT,
                }
            }
            CardKind::Shield => {
                let p = self.require_player_mut(player_id)?;
                p.shield_points = p.shield_points.saturating_add(SHIELD_AMOUNT);
                CardOutcome::Shielded {
                    amount: SHIELD_AMOUNT,
                }
            }
            CardKind::Reroll => {
                self.require_player_mut(player_id)?.extra_rolls += 1;
                CardOutcome::ExtraRoll
            }
            CardKind::SwapPosition => {
                // validated above
                let target_id = target.unwrap_or(player_id);
                let mine = self.require_player_mut(player_id)?.position;
                let theirs = self.require_player_mut(target_id)?.position;
                self.require_player_mut(player_id)?.position = theirs;
                self.require_player_mut(target_id)?.position = mine;
                CardOutcome::Swapped { with: target_id }
            }
            CardKind::ChangeQuestion => {
                let question = generate_math_question(&mut self.rng);
                let deadline = now + self.rules.question_timeout;
                if let Some(PendingAction::Question(q)) = self.pending.as_mut() {
                    q.question = question;
                    q.deadline = deadline;
                }
                CardOutcome::QuestionChanged
            }
        };

        let name = self.username(player_id);
        self.push_log(
            LogKind::CardUse,
            Some(player_id),
            format!("{name} used {}", card.kind.card_type().name),
        );
        debug!(game_id = self.id, player_id, card = card.kind.code(), "card used");

        Ok(outcome)
    }

    fn move_by_card(&mut self, player_id: PlayerId, steps: u16) -> Result<CardOutcome, DomainError> {
        let from = self.require_player_mut(player_id)?.position;
        let to = self.destination(from, steps);
        self.require_player_mut(player_id)?.position = to;
        let won = self.mode == GameMode::Finish && to == self.last_position();
        if won {
            self.declare_winner(Some(player_id));
        }
        Ok(CardOutcome::Moved { from, to, won })
    }
}
