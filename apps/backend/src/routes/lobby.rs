//! Lobby endpoints: list, create, join, start, end and delete games.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::games::game_state;
use crate::domain::{GameMode, GameSettings};
use crate::error::AppError;
use crate::extractors::{CurrentUser, GameId, ValidatedJson};
use crate::services::games::{GameService, GameSummary};
use crate::state::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateGameRequest {
    pub mode: Option<GameMode>,
    pub max_players: Option<u8>,
    pub board_length: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct GameListResponse {
    pub games: Vec<GameSummary>,
}

async fn list_games(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let games = GameService::new().list(&app_state.games, user.id);
    Ok(HttpResponse::Ok().json(GameListResponse { games }))
}

async fn create_game(
    user: CurrentUser,
    body: ValidatedJson<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let settings = GameSettings::new(body.mode, body.max_players, body.board_length)?;
    let snapshot = GameService::new().create(
        &app_state.games,
        &app_state.rules,
        user.id,
        &user.username,
        settings,
    )?;
    Ok(game_state(snapshot))
}

async fn join_game(
    user: CurrentUser,
    body: ValidatedJson<JoinGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot =
        GameService::new().join(&app_state.games, user.id, &user.username, &body.code)?;
    Ok(game_state(snapshot))
}

async fn start_game(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameService::new().start(&app_state.games, game_id.0, user.id)?;
    Ok(game_state(snapshot))
}

async fn end_game(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = GameService::new().end(
        &app_state.games,
        game_id.0,
        user.id,
        OffsetDateTime::now_utc(),
    )?;
    Ok(game_state(snapshot))
}

async fn delete_game(
    user: CurrentUser,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    GameService::new().delete(&app_state.games, game_id.0, user.id)?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_games))
            .route(web::post().to(create_game)),
    )
    .route("/join", web::post().to(join_game))
    .route("/{game_id}/start/", web::post().to(start_game))
    .route("/{game_id}/end/", web::post().to(end_game))
    .route("/{game_id}/delete/", web::post().to(delete_game));
}
