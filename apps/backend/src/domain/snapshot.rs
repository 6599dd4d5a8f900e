//! Per-viewer snapshot of a game, served to polling clients.
//!
//! Public facts are identical for every viewer. Private facts (own hand, own
//! draft offers, own duel choices) are only filled in for the viewer they
//! belong to, and the correct answer of a question never leaves the server.
//! Card duel games add per-player pile counts and statuses, plus the
//! viewer's own hand and pick options.

use serde::Serialize;

use super::card_duel::{DuelSeat, TurnFlags};
use super::card_duel_catalogue::{DuelCard, DuelCardCategory, Status};
use super::cards::{CardInstance, CardKind};
use super::duel::{DuelMove, DuelPhase, DuelResult};
use super::log::LogEntry;
use super::pending::PendingAction;
use super::rules::SNAPSHOT_LOG_ENTRIES;
use super::state::{CardId, Game, GameId, GameMode, GameStatus, PlayerId, RollOutcome, UserId};
use super::tiles::Tile;

/// Game-level header present in all snapshots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameHeader {
    pub id: GameId,
    pub code: String,
    pub status: GameStatus,
    pub mode: GameMode,
    pub host_user_id: UserId,
    pub max_players: u8,
    pub board_length: u16,
    pub current_player_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub version: i64,
}

/// Public stats of one player.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub user_id: UserId,
    pub username: String,
    pub turn_order: u8,
    pub hp: u32,
    pub coins: u32,
    pub position: u16,
    pub is_alive: bool,
    pub shield_points: u32,
    pub extra_rolls: u32,
    pub card_count: usize,
    pub is_host: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_duel: Option<DuelSeatPublic>,
}

/// What everyone can see of a card duel seat.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuelSeatPublic {
    pub hand_count: usize,
    pub deck_count: usize,
    pub discard_count: usize,
    pub picks_remaining: u8,
    pub status: Vec<Status>,
}

impl From<&DuelSeat> for DuelSeatPublic {
    fn from(seat: &DuelSeat) -> Self {
        Self {
            hand_count: seat.hand.len(),
            deck_count: seat.deck.len(),
            discard_count: seat.discard.len(),
            picks_remaining: seat.picks_remaining(),
            status: seat.statuses.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuelCardView {
    pub code: DuelCard,
    pub name: &'static str,
    pub description: &'static str,
    pub category: DuelCardCategory,
}

impl From<DuelCard> for DuelCardView {
    fn from(card: DuelCard) -> Self {
        let spec = card.spec();
        Self {
            code: card,
            name: spec.name,
            description: spec.description,
            category: spec.category,
        }
    }
}

/// The viewer's own card duel seat.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardDuelMine {
    pub hand: Vec<DuelCardView>,
    pub pick_options: Vec<DuelCardView>,
    pub picks_remaining: u8,
    pub deck_count: usize,
    pub discard_count: usize,
    pub status: Vec<Status>,
    pub turn_flags: TurnFlags,
}

impl From<&DuelSeat> for CardDuelMine {
    fn from(seat: &DuelSeat) -> Self {
        Self {
            hand: seat.hand.iter().copied().map(DuelCardView::from).collect(),
            pick_options: seat
                .pick_options
                .iter()
                .copied()
                .map(DuelCardView::from)
                .collect(),
            picks_remaining: seat.picks_remaining(),
            deck_count: seat.deck.len(),
            discard_count: seat.discard.len(),
            status: seat.statuses.clone(),
            turn_flags: seat.turn_flags.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardView {
    pub id: CardId,
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub effect_type: CardKind,
    pub price: u32,
}

impl From<&CardInstance> for CardView {
    fn from(card: &CardInstance) -> Self {
        let t = card.kind.card_type();
        Self {
            id: card.id,
            code: t.code,
            name: t.name,
            description: t.description,
            effect_type: card.kind,
            price: t.base_price,
        }
    }
}

/// The viewer's own seat.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewerState {
    pub player_id: PlayerId,
    pub is_current: bool,
    pub cards: Vec<CardView>,
    /// Whether the viewer is expected to act on the pending action.
    pub must_respond: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_duel: Option<CardDuelMine>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderRollView {
    pub player_id: PlayerId,
    pub roll: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShopOfferView {
    pub card: CardView,
    pub price: u32,
}

/// What a duel participant can see of a side: whether it acted, not how.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuelSideView {
    pub player_id: PlayerId,
    pub committed: bool,
    pub predicted: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuelMine {
    pub committed: Option<DuelMove>,
    pub prediction: Option<DuelMove>,
}

/// Adjacently tagged view of the open pending action.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PendingView {
    OrderingRoll {
        rolls: Vec<OrderRollView>,
    },
    Draft {
        picker: PlayerId,
        /// Only present for the picker.
        offers: Option<Vec<CardView>>,
        picks_remaining: usize,
    },
    Question {
        player_id: PlayerId,
        prompt: String,
        choices: Vec<String>,
        reward: u32,
        deadline_ms: i64,
    },
    Shop {
        player_id: PlayerId,
        level: u8,
        offers: Vec<ShopOfferView>,
    },
    Duel {
        challenger: PlayerId,
        opponent: Option<PlayerId>,
        phase: DuelPhase,
        sides: Vec<DuelSideView>,
        winner: Option<PlayerId>,
        /// Only present for a participant.
        mine: Option<DuelMine>,
    },
    Gun {
        player_id: PlayerId,
        damage: u32,
        targets: Vec<PlayerId>,
    },
}

/// Top-level snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub game: GameHeader,
    pub tiles: Vec<Tile>,
    pub players: Vec<PlayerPublic>,
    pub me: Option<ViewerState>,
    pub pending: Option<PendingView>,
    pub last_roll: Option<RollOutcome>,
    pub last_duel: Option<DuelResult>,
    pub log: Vec<LogEntry>,
}

/// Build the snapshot `viewer` is allowed to see. `viewer` is `None` for
/// spectators.
pub fn snapshot(game: &Game, viewer: Option<PlayerId>) -> GameSnapshot {
    let header = GameHeader {
        id: game.id,
        code: game.code.clone(),
        status: game.status,
        mode: game.mode,
        host_user_id: game.host_user_id,
        max_players: game.max_players,
        board_length: game.board_length,
        current_player_id: game.current_player_id(),
        winner_id: game.winner,
        version: game.version,
    };

    let players = game
        .players
        .iter()
        .map(|p| PlayerPublic {
            id: p.id,
            user_id: p.user_id,
            username: p.username.clone(),
            turn_order: p.turn_order,
            hp: p.hp,
            coins: p.coins,
            position: p.position,
            is_alive: p.is_alive,
            shield_points: p.shield_points,
            extra_rolls: p.extra_rolls,
            card_count: p.cards.len(),
            is_host: p.user_id == game.host_user_id,
            card_duel: game.duel_seat(p.id).map(DuelSeatPublic::from),
        })
        .collect();

    let me = viewer.and_then(|id| game.player(id)).map(|p| ViewerState {
        player_id: p.id,
        is_current: game.current_player_id() == Some(p.id),
        cards: p.cards.iter().map(CardView::from).collect(),
        must_respond: game
            .pending
            .as_ref()
            .is_some_and(|action| action.awaiting().contains(&p.id)),
        card_duel: game.duel_seat(p.id).map(CardDuelMine::from),
    });

    let log_start = game.log.len().saturating_sub(SNAPSHOT_LOG_ENTRIES);

    GameSnapshot {
        game: header,
        tiles: game.tiles.clone(),
        players,
        me,
        pending: game.pending.as_ref().map(|action| pending_view(game, action, viewer)),
        last_roll: game.last_roll.clone(),
        last_duel: game.last_duel.clone(),
        log: game.log[log_start..].to_vec(),
    }
}

fn pending_view(game: &Game, action: &PendingAction, viewer: Option<PlayerId>) -> PendingView {
    match action {
        PendingAction::OrderingRoll(o) => PendingView::OrderingRoll {
            rolls: o
                .rolls
                .iter()
                .map(|(player_id, roll)| OrderRollView {
                    player_id: *player_id,
                    roll: *roll,
                })
                .collect(),
        },
        PendingAction::Draft(d) => PendingView::Draft {
            picker: d.picker,
            offers: (viewer == Some(d.picker))
                .then(|| d.offers.iter().map(CardView::from).collect()),
            picks_remaining: d.queue.len() + 1,
        },
        PendingAction::Question(q) => PendingView::Question {
            player_id: q.for_player,
            prompt: q.question.prompt.clone(),
            choices: q.question.choices.clone(),
            reward: q.reward,
            deadline_ms: (q.deadline.unix_timestamp_nanos() / 1_000_000) as i64,
        },
        PendingAction::Shop(s) => PendingView::Shop {
            player_id: s.for_player,
            level: s.level,
            offers: s
                .offers
                .iter()
                .map(|o| ShopOfferView {
                    card: CardView::from(&o.card),
                    price: o.price,
                })
                .collect(),
        },
        PendingAction::Duel(d) => PendingView::Duel {
            challenger: d.challenger.player_id,
            opponent: d.opponent.map(|o| o.player_id),
            phase: d.phase,
            sides: std::iter::once(&d.challenger)
                .chain(d.opponent.iter())
                .map(|s| DuelSideView {
                    player_id: s.player_id,
                    committed: s.committed.is_some(),
                    predicted: s.prediction.is_some(),
                })
                .collect(),
            winner: d.winner,
            mine: viewer.and_then(|id| d.side(id)).map(|s| DuelMine {
                committed: s.committed,
                prediction: s.prediction,
            }),
        },
        PendingAction::Gun(g) => PendingView::Gun {
            player_id: g.for_player,
            damage: g.damage,
            targets: game.alive_opponents(g.for_player).map(|p| p.id).collect(),
        },
    }
}
