use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{Method, StatusCode};
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, warn};

use crate::domain::GameId;

/// Emits one `request_completed` event per request, levelled by status class.
///
/// Requests under `/api/games/{id}/` carry a `game_id` field. Successful
/// state polls log at debug, since every open client polls every few seconds.
pub struct StructuredLogger;

/// Game id from a `/api/games/{id}/...` path.
fn game_id_from_path(path: &str) -> Option<GameId> {
    let rest = path.strip_prefix("/api/games/")?;
    rest.split('/').next()?.parse().ok()
}

fn is_quiet_poll(method: &Method, path: &str, status: StatusCode) -> bool {
    method == Method::GET
        && path.trim_end_matches('/').ends_with("/state")
        && (status.is_success() || status == StatusCode::NOT_MODIFIED)
}

macro_rules! request_completed {
    ($level:ident, $method:expr, $path:expr, $status:expr, $duration:expr, $game_id:expr, $trace_id:expr) => {
        $level!(
            http.method = %$method,
            url.path = %$path,
            http.status_code = $status,
            duration_us = $duration,
            game_id = $game_id,
            trace_id = %$trace_id,
            "request_completed"
        )
    };
}

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let game_id = game_id_from_path(&path);
        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let status_code = status.as_u16();
            let duration_us = start.elapsed().as_micros() as u64;

            if status.is_server_error() {
                request_completed!(error, method, path, status_code, duration_us, game_id, trace_id);
            } else if status.is_client_error() {
                request_completed!(warn, method, path, status_code, duration_us, game_id, trace_id);
            } else if is_quiet_poll(&method, &path, status) {
                request_completed!(debug, method, path, status_code, duration_us, game_id, trace_id);
            } else {
                request_completed!(info, method, path, status_code, duration_us, game_id, trace_id);
            }

            result
        })
    }
}
