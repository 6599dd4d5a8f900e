//! ETags for polled game state.
//!
//! Every committed mutation bumps the game version, so `"game-{id}-v{version}"`
//! changes exactly when a snapshot could differ.

use actix_web::http::header::HeaderValue;

/// Strong ETag for a game version, quoted as HTTP requires.
///
/// ```
/// # use blitzquest_backend::http::etag::game_etag;
/// assert_eq!(game_etag(123, 5), r#""game-123-v5""#);
/// ```
pub fn game_etag(id: i64, version: i64) -> String {
    format!(r#""game-{id}-v{version}""#)
}

/// Whether an `If-None-Match` header matches `etag`.
///
/// Accepts `*`, comma-separated lists and weak validators (`W/"..."`), which
/// compare weakly as `If-None-Match` requires.
pub fn if_none_match(header: Option<&HeaderValue>, etag: &str) -> bool {
    let Some(raw) = header.and_then(|v| v.to_str().ok()) else {
        return false;
    };
    raw.split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
}
