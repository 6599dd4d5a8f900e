//! Game flow orchestration: bridges HTTP handlers and the pure domain.
//!
//! Every action runs under the game's write lock against a copy of the record.
//! The copy replaces the stored game only when the domain call succeeds, so a
//! rejected action leaves no trace. Each committed change bumps `version`.

use time::OffsetDateTime;
use tracing::{debug, info};

use super::game_store::GameStore;
use crate::domain::chat::ChatMessage;
use crate::domain::state::CardId;
use crate::domain::{
    snapshot, DuelCard, DuelMove, DuelReward, Game, GameId, GameSnapshot, PlayerId, UserId,
};
use crate::error::AppError;
use crate::errors::domain::DomainError;

/// Resolve an overdue question before anything else touches the game.
pub(crate) fn expire_question(game: &mut Game, now: OffsetDateTime) {
    if game.expire_overdue(now) {
        game.version += 1;
    }
}

/// Run `op` on a copy of `game` and commit the copy on success.
pub(crate) fn commit<T>(
    game: &mut Game,
    op: impl FnOnce(&mut Game) -> Result<T, DomainError>,
) -> Result<T, DomainError> {
    let mut draft = game.clone();
    let out = op(&mut draft)?;
    draft.version += 1;
    *game = draft;
    Ok(out)
}

/// When to expire an overdue question relative to the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expiry {
    Before,
    /// The action itself reports late answers.
    Skip,
}

pub struct GameFlowService;

impl GameFlowService {
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::too_many_arguments)]
    fn act(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
        action: &'static str,
        expiry: Expiry,
        op: impl FnOnce(&mut Game, PlayerId) -> Result<(), DomainError>,
    ) -> Result<GameSnapshot, AppError> {
        let slot = store.get(game_id)?;
        let mut game = slot.write();
        if expiry == Expiry::Before {
            expire_question(&mut game, now);
        }
        let player_id = game.member_id(user_id)?;

        commit(&mut game, |g| op(g, player_id)).map_err(|e| {
            if e.is_already_resolved() {
                debug!(game_id, player_id, action, "duplicate submission ignored");
            } else {
                info!(game_id, player_id, action, error = %e, "game action rejected");
            }
            e
        })?;

        info!(
            game_id,
            player_id,
            action,
            version = game.version,
            status = game.status.as_str(),
            "game action applied"
        );
        Ok(snapshot(&game, Some(player_id)))
    }

    /// Snapshot for a member of the game.
    pub fn state(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        let slot = store.get(game_id)?;
        {
            let game = slot.read();
            let player_id = game.member_id(user_id)?;
            if !game.question_deadline().is_some_and(|d| now >= d) {
                return Ok(snapshot(&game, Some(player_id)));
            }
        }
        let mut game = slot.write();
        expire_question(&mut game, now);
        let player_id = game.member_id(user_id)?;
        Ok(snapshot(&game, Some(player_id)))
    }

    pub fn roll(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "roll", Expiry::Before, |g, p| {
            g.roll_dice(p, now).map(|_| ())
        })
    }

    pub fn order_roll(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "order_roll", Expiry::Before, |g, p| {
            g.order_roll(p).map(|_| ())
        })
    }

    pub fn answer_question(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        choice: usize,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "answer_question", Expiry::Skip, |g, p| {
            g.answer_question(p, choice, now).map(|_| ())
        })
    }

    pub fn use_card(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        card_id: CardId,
        target: Option<PlayerId>,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "use_card", Expiry::Before, |g, p| {
            g.use_card(p, card_id, target, now).map(|_| ())
        })
    }

    pub fn shop_buy(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        card_id: CardId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "shop_buy", Expiry::Before, |g, p| {
            g.shop_buy(p, card_id)
        })
    }

    pub fn shop_sell(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        card_id: CardId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "shop_sell", Expiry::Before, |g, p| {
            g.shop_sell(p, card_id)
        })
    }

    pub fn shop_close(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "shop_close", Expiry::Before, |g, p| {
            g.shop_close(p)
        })
    }

    pub fn duel_select_opponent(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        opponent: PlayerId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "duel_select_opponent", Expiry::Before, |g, p| {
            g.duel_select_opponent(p, opponent)
        })
    }

    pub fn duel_commit(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        mv: DuelMove,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "duel_commit", Expiry::Before, |g, p| {
            g.duel_commit(p, mv)
        })
    }

    pub fn duel_predict(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        mv: DuelMove,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "duel_predict", Expiry::Before, |g, p| {
            g.duel_predict(p, mv)
        })
    }

    pub fn duel_choose_reward(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        reward: DuelReward,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "duel_choose_reward", Expiry::Before, |g, p| {
            g.duel_choose_reward(p, reward)
        })
    }

    pub fn duel_skip(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "duel_skip", Expiry::Before, |g, p| {
            g.duel_skip(p)
        })
    }

    pub fn gun_attack(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        target: PlayerId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "gun_attack", Expiry::Before, |g, p| {
            g.gun_attack(p, target)
        })
    }

    pub fn gun_skip(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "gun_skip", Expiry::Before, |g, p| {
            g.gun_skip(p)
        })
    }

    pub fn draft_pick(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        card_id: CardId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "draft_pick", Expiry::Before, |g, p| {
            g.draft_pick(p, card_id)
        })
    }

    pub fn card_duel_pick(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        card: DuelCard,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "card_duel_pick", Expiry::Before, |g, p| {
            g.card_duel_pick(p, card)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn card_duel_play(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        card: DuelCard,
        target: Option<PlayerId>,
        replace: Vec<DuelCard>,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "card_duel_play", Expiry::Before, |g, p| {
            g.card_duel_play(p, card, target, &replace)
        })
    }

    pub fn card_duel_end_turn(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<GameSnapshot, AppError> {
        self.act(store, game_id, user_id, now, "card_duel_end_turn", Expiry::Before, |g, p| {
            g.card_duel_end_turn(p)
        })
    }

    /// Post a chat message. Chat does not change the game version.
    pub fn send_chat(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        text: &str,
        now: OffsetDateTime,
    ) -> Result<ChatMessage, AppError> {
        let slot = store.get(game_id)?;
        let mut game = slot.write();
        let player_id = game.member_id(user_id)?;
        let sent_at_ms = (now.unix_timestamp_nanos() / 1_000_000) as i64;
        let message = game.post_chat(player_id, text, sent_at_ms)?;
        debug!(game_id, player_id, message_id = %message.id, "chat message posted");
        Ok(message)
    }

    /// Chat messages after the `after` cursor, oldest first.
    pub fn chat_messages(
        &self,
        store: &GameStore,
        game_id: GameId,
        user_id: UserId,
        after: Option<&str>,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let slot = store.get(game_id)?;
        let game = slot.read();
        game.member_id(user_id)?;
        Ok(game.chat_since(after))
    }
}

impl Default for GameFlowService {
    fn default() -> Self {
        Self::new()
    }
}
