use actix_web::{web, App, HttpServer};
use blitzquest_backend::config::{rules_from_env, ServerConfig};
use blitzquest_backend::middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use blitzquest_backend::routes;
use blitzquest_backend::services::question_sweeper::spawn_question_sweeper;
use blitzquest_backend::state::build_state;
use blitzquest_backend::telemetry::{init_tracing, LogFormat};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing(LogFormat::from_env());

    // Environment variables must be set by the runtime environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };
    let rules = match rules_from_env() {
        Ok(rules) => rules,
        Err(e) => {
            error!(error = %e, "invalid game rules");
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_security(config.security.clone())
        .with_rules(rules)
        .build()
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    let sweeper = spawn_question_sweeper(
        app_state.games.clone(),
        config.sweep_interval,
        cancel.clone(),
    );

    info!(host = %config.host, port = config.port, "starting BlitzQuest backend");

    let data = web::Data::new(app_state);
    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    cancel.cancel();
    if let Err(e) = sweeper.await {
        error!(error = %e, "question sweeper panicked");
    }
    result
}
