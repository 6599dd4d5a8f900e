//! Polling and in-game action endpoints under `/api/games/{game_id}`.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::state::CardId;
use crate::domain::{DuelCard, DuelMove, DuelReward, GameSnapshot, PlayerId};
use crate::error::AppError;
use crate::extractors::{CurrentUser, GameId, ValidatedJson};
use crate::http::etag::{game_etag, if_none_match};
use crate::services::game_flow::GameFlowService;
use crate::state::app_state::AppState;

/// Envelope of every successful game mutation.
#[derive(Debug, Serialize)]
pub struct GameStateResponse {
    pub game_state: GameSnapshot,
}

pub(crate) fn game_state(snapshot: GameSnapshot) -> HttpResponse {
    HttpResponse::Ok().json(GameStateResponse {
        game_state: snapshot,
    })
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub choice_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct UseCardRequest {
    pub card_id: CardId,
    pub target_id: Option<PlayerId>,
}

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub card_id: CardId,
}

#[derive(Debug, Deserialize)]
pub struct OpponentRequest {
    pub opponent_id: PlayerId,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub mv: DuelMove,
}

#[derive(Debug, Deserialize)]
pub struct RewardRequest {
    pub reward: DuelReward,
}

#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub target_id: PlayerId,
}

#[derive(Debug, Deserialize)]
pub struct DuelPickRequest {
    pub card: DuelCard,
}

#[derive(Debug, Deserialize)]
pub struct DuelPlayRequest {
    pub card: DuelCard,
    pub target_id: Option<PlayerId>,
    /// Hand cards swapped out by a cycling card.
    #[serde(default)]
    pub replace: Vec<DuelCard>,
}

/// `GET /state/`: the caller's snapshot, or 304 if their `If-None-Match`
/// still matches the game version.
async fn get_state(
    req: HttpRequest,
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().state(
        &app_state.games,
        game_id.0,
        user.id,
        OffsetDateTime::now_utc(),
    )?;
    let etag = game_etag(game_id.0, snapshot.game.version);

    if if_none_match(req.headers().get(header::IF_NONE_MATCH), &etag) {
        return Ok(HttpResponse::NotModified()
            .insert_header((header::ETAG, etag))
            .insert_header((header::CACHE_CONTROL, "no-cache"))
            .finish());
    }

    Ok(HttpResponse::Ok()
        .insert_header((header::ETAG, etag))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .json(snapshot))
}

async fn roll(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().roll(
        &app_state.games,
        game_id.0,
        user.id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn order_roll(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().order_roll(
        &app_state.games,
        game_id.0,
        user.id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn answer_question(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<AnswerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().answer_question(
        &app_state.games,
        game_id.0,
        user.id,
        body.choice_index,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn use_card(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<UseCardRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().use_card(
        &app_state.games,
        game_id.0,
        user.id,
        body.card_id,
        body.target_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn shop_buy(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<CardRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().shop_buy(
        &app_state.games,
        game_id.0,
        user.id,
        body.card_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn shop_sell(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<CardRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().shop_sell(
        &app_state.games,
        game_id.0,
        user.id,
        body.card_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn shop_close(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().shop_close(
        &app_state.games,
        game_id.0,
        user.id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn duel_select_opponent(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<OpponentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().duel_select_opponent(
        &app_state.games,
        game_id.0,
        user.id,
        body.opponent_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn duel_commit(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<MoveRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().duel_commit(
        &app_state.games,
        game_id.0,
        user.id,
        body.mv,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn duel_predict(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<MoveRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().duel_predict(
        &app_state.games,
        game_id.0,
        user.id,
        body.mv,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn duel_choose_reward(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<RewardRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().duel_choose_reward(
        &app_state.games,
        game_id.0,
        user.id,
        body.reward,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn duel_skip(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().duel_skip(
        &app_state.games,
        game_id.0,
        user.id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn gun_attack(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<TargetRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().gun_attack(
        &app_state.games,
        game_id.0,
        user.id,
        body.target_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn gun_skip(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().gun_skip(
        &app_state.games,
        game_id.0,
        user.id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn draft_pick(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<CardRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().draft_pick(
        &app_state.games,
        game_id.0,
        user.id,
        body.card_id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn card_duel_pick(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<DuelPickRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().card_duel_pick(
        &app_state.games,
        game_id.0,
        user.id,
        body.card,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn card_duel_play(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<DuelPlayRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let DuelPlayRequest {
        card,
        target_id,
        replace,
    } = body.into_inner();
    let snapshot = GameFlowService::new().card_duel_play(
        &app_state.games,
        game_id.0,
        user.id,
        card,
        target_id,
        replace,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn card_duel_end_turn(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameFlowService::new().card_duel_end_turn(
        &app_state.games,
        game_id.0,
        user.id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{game_id}/state/", web::get().to(get_state))
        .route("/{game_id}/roll/", web::post().to(roll))
        .route("/{game_id}/order_roll/", web::post().to(order_roll))
        .route("/{game_id}/answer_question/", web::post().to(answer_question))
        .route("/{game_id}/use_card/", web::post().to(use_card))
        .route("/{game_id}/shop/buy/", web::post().to(shop_buy))
        .route("/{game_id}/shop/sell/", web::post().to(shop_sell))
        .route("/{game_id}/shop/close/", web::post().to(shop_close))
        .route(
            "/{game_id}/duel/select_opponent/",
            web::post().to(duel_select_opponent),
        )
        .route("/{game_id}/duel/commit/", web::post().to(duel_commit))
        .route("/{game_id}/duel/predict/", web::post().to(duel_predict))
        .route(
            "/{game_id}/duel/choose_reward/",
            web::post().to(duel_choose_reward),
        )
        .route("/{game_id}/duel/skip/", web::post().to(duel_skip))
        .route("/{game_id}/gun/attack/", web::post().to(gun_attack))
        .route("/{game_id}/gun/skip/", web::post().to(gun_skip))
        .route("/{game_id}/draft/pick/", web::post().to(draft_pick))
        .route("/{game_id}/card_duel/pick/", web::post().to(card_duel_pick))
        .route("/{game_id}/card_duel/play/", web::post().to(card_duel_play))
        .route(
            "/{game_id}/card_duel/end_turn/",
            web::post().to(card_duel_end_turn),
        );
}
