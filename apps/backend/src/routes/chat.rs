//! Per-game chat endpoints.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::chat::ChatMessage;
use crate::domain::GameSnapshot;
use crate::error::AppError;
use crate::extractors::{CurrentUser, GameId, ValidatedJson};
use crate::services::game_flow::GameFlowService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendChatRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatCursor {
    /// Only messages newer than this message id.
    pub after: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendChatResponse {
    pub game_state: GameSnapshot,
    pub message: ChatMessage,
}

#[derive(Debug, Serialize)]
pub struct ChatMessagesResponse {
    pub messages: Vec<ChatMessage>,
}

async fn send(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<SendChatRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let flow = GameFlowService::new();
    let now = OffsetDateTime::now_utc();
    let message = flow.send_chat(&app_state.games, game_id.0, user.id, &body.text, now)?;
    let game_state = flow.state(&app_state.games, game_id.0, user.id, now)?;
    Ok(HttpResponse::Ok().json(SendChatResponse {
        game_state,
        message,
    }))
}

async fn messages_get(
    user: CurrentUser,
    game_id: GameId,
    query: web::Query<ChatCursor>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    messages(&app_state, user, game_id, query.into_inner())
}

async fn messages_post(
    user: CurrentUser,
    game_id: GameId,
    body: ValidatedJson<ChatCursor>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    messages(&app_state, user, game_id, body.into_inner())
}

fn messages(
    app_state: &AppState,
    user: CurrentUser,
    game_id: GameId,
    cursor: ChatCursor,
) -> Result<HttpResponse, AppError> {
    let messages = GameFlowService::new().chat_messages(
        &app_state.games,
        game_id.0,
        user.id,
        cursor.after.as_deref(),
    )?;
    Ok(HttpResponse::Ok().json(ChatMessagesResponse { messages }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{game_id}/chat/send/", web::post().to(send))
        .service(
            web::resource("/{game_id}/chat/messages/")
                .route(web::get().to(messages_get))
                .route(web::post().to(messages_post)),
        );
}
