use std::time::SystemTime;

use actix_web::{web, HttpResponse, HttpResponseBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::jwt::{mint_access_token, new_csrf_token};
use crate::domain::UserId;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::users::User;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Echo in `X-CSRF-Token` on every POST under `/api/games`.
    pub csrf_token: String,
    pub user_id: UserId,
    pub username: String,
}

/// Issue a session token bound to a fresh CSRF token.
fn session_response(
    mut builder: HttpResponseBuilder,
    user: User,
    app_state: &AppState,
) -> Result<HttpResponse, AppError> {
    let csrf_token = new_csrf_token();
    let token = mint_access_token(
        &user.sub,
        &user.username,
        &csrf_token,
        SystemTime::now(),
        &app_state.security,
    )?;
    Ok(builder.json(LoginResponse {
        token,
        csrf_token,
        user_id: user.id,
        username: user.username,
    }))
}

/// Create an account and log it in.
async fn signup(
    body: ValidatedJson<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = app_state.users.sign_up(
        &body.username,
        &body.password,
        &app_state.security.password_params,
    )?;
    session_response(HttpResponse::Created(), user, &app_state)
}

async fn login(
    body: ValidatedJson<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = app_state
        .users
        .authenticate(&body.username, &body.password)?;
    info!(user_id = user.id, "user logged in");
    session_response(HttpResponse::Ok(), user, &app_state)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/login", web::post().to(login));
}
