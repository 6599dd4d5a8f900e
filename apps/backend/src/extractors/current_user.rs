use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Serialize;

use crate::auth::jwt::Claims;
use crate::domain::UserId;
use crate::error::AppError;
use crate::state::app_state::AppState;

/// The authenticated caller.
///
/// Built from the [`Claims`] that `JwtExtract` stored in request extensions,
/// resolved against the user store so tokens of unknown users are refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub sub: String,
    pub username: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(current_user(req))
    }
}

fn current_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or_else(AppError::unauthorized_missing_bearer)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let user = state
        .users
        .find_by_sub(&claims.sub)
        .ok_or_else(AppError::forbidden_user_not_found)?;

    Ok(CurrentUser {
        id: user.id,
        sub: claims.sub,
        username: user.username,
    })
}
