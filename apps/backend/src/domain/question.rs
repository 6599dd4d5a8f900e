//! Timed multiple-choice questions opened by question tiles.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::log::LogKind;
use super::pending::PendingAction;
use super::state::{Game, GameStatus, PlayerId};
use crate::errors::domain::DomainError;

const OPERAND_MAX: i32 = 12;
const WRONG_CHOICES: usize = 3;
const WRONG_SPREAD: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Never leaves the server.
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuestion {
    pub for_player: PlayerId,
    pub question: Question,
    pub reward: u32,
    pub deadline: OffsetDateTime,
}

/// How an open question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct { reward: u32 },
    Incorrect,
    TimedOut,
}

/// Arithmetic question with one correct and three distinct wrong choices.
pub fn generate_math_question<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let a = rng.random_range(1..=OPERAND_MAX);
    let b = rng.random_range(1..=OPERAND_MAX);
    let (symbol, answer) = match rng.random_range(0..3) {
        0 => ('+', a + b),
        1 => ('-', a - b),
        _ => ('*', a * b),
    };

    let mut values = vec![answer];
    while values.len() < WRONG_CHOICES + 1 {
        let candidate = answer + rng.random_range(-WRONG_SPREAD..=WRONG_SPREAD);
        if !values.contains(&candidate) {
            values.push(candidate);
        }
    }
    values.shuffle(rng);

    let correct_index = values.iter().position(|v| *v == answer).unwrap_or(0);
    Question {
        prompt: format!("{a} {symbol} {b} = ?"),
        choices: values.iter().map(i32::to_string).collect(),
        correct_index,
    }
}

impl Game {
    /// Answer the caller's open question.
    ///
    /// Correct answers pay the tile reward; incorrect or late answers pay
    /// nothing. Either way the question resolves and the turn moves on.
    pub fn answer_question(
        &mut self,
        player_id: PlayerId,
        choice: usize,
        now: OffsetDateTime,
    ) -> Result<AnswerOutcome, DomainError> {
        if self.status != GameStatus::Active {
            return Err(DomainError::game_not_active("the game is not being played"));
        }
        let pending = match &self.pending {
            Some(PendingAction::Question(q)) => q,
            _ => return Err(DomainError::already_resolved("there is no open question")),
        };
        if pending.for_player != player_id {
            return Err(DomainError::not_your_turn("this question belongs to another player"));
        }
        if choice >= pending.question.choices.len() {
            return Err(DomainError::invalid_input(format!(
                "choice must be between 0 and {}",
                pending.question.choices.len() - 1
            )));
        }

        let outcome = if now >= pending.deadline {
            AnswerOutcome::TimedOut
        } else if choice == pending.question.correct_index {
            AnswerOutcome::Correct {
                reward: pending.reward,
            }
        } else {
            AnswerOutcome::Incorrect
        };
        self.resolve_question(player_id, outcome)?;
        Ok(outcome)
    }

    /// Resolve an overdue question as timed out. Returns whether anything changed.
    pub fn expire_overdue(&mut self, now: OffsetDateTime) -> bool {
        let overdue = match &self.pending {
            Some(PendingAction::Question(q)) if now >= q.deadline => Some(q.for_player),
            _ => None,
        };
        match overdue {
            Some(player_id) => {
                info!(game_id = self.id, player_id, "question expired");
                self.resolve_question(player_id, AnswerOutcome::TimedOut)
                    .is_ok()
            }
            None => false,
        }
    }

    /// Earliest moment `expire_overdue` would change this game.
    pub fn question_deadline(&self) -> Option<OffsetDateTime> {
        match &self.pending {
            Some(PendingAction::Question(q)) => Some(q.deadline),
            _ => None,
        }
    }

    fn resolve_question(
        &mut self,
        player_id: PlayerId,
        outcome: AnswerOutcome,
    ) -> Result<(), DomainError> {
        self.clear_pending();
        let name = self.username(player_id);
        let message = match outcome {
            AnswerOutcome::Correct { reward } => {
                let p = self.require_player_mut(player_id)?;
                p.coins = p.coins.saturating_add(reward);
                format!("{name} answered correctly and earned {reward} coins")
            }
            AnswerOutcome::Incorrect => format!("{name} answered incorrectly"),
            AnswerOutcome::TimedOut => format!("{name} ran out of time"),
        };
        self.push_log(LogKind::QuestionAnswer, Some(player_id), message);
        debug!(game_id = self.id, player_id, ?outcome, "question resolved");
        self.end_turn();
        Ok(())
    }
}
