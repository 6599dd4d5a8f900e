use actix_web::web;

use crate::middleware::{CsrfGuard, JwtExtract};

pub mod auth;
pub mod chat;
pub mod games;
pub mod health;
pub mod lobby;

/// Register every route. Shared by `main.rs` and the integration tests, which
/// add the request-level middleware (tracing, logging, CORS) around it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // /api/games/**: bearer token required, POSTs also need the CSRF header
    cfg.service(
        web::scope("/api/games")
            .wrap(CsrfGuard)
            .wrap(JwtExtract)
            .configure(lobby::configure_routes)
            .configure(games::configure_routes)
            .configure(chat::configure_routes),
    );
}
