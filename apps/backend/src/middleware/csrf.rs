//! CSRF guard for state-changing requests.
//!
//! Every non-safe request must echo the `csrf` claim of its access token in
//! `X-CSRF-Token`. Must run inside [`JwtExtract`](super::jwt_extract::JwtExtract),
//! which puts the claims in request extensions.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;

use crate::auth::jwt::Claims;
use crate::error::AppError;
use crate::errors::ErrorCode;

pub const CSRF_HEADER: &str = "x-csrf-token";

pub struct CsrfGuard;

impl<S, B> Transform<S, ServiceRequest> for CsrfGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CsrfGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfGuardMiddleware { service }))
    }
}

pub struct CsrfGuardMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CsrfGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(err) = check(&req) {
            warn!(url.path = %req.path(), "csrf token rejected");
            return Box::pin(async move {
                let res = err.error_response();
                Ok(req.into_response(res).map_into_right_body())
            });
        }
        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}

fn check(req: &ServiceRequest) -> Result<(), AppError> {
    if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(());
    }
    let extensions = req.extensions();
    let claims = extensions
        .get::<Claims>()
        .ok_or_else(AppError::unauthorized)?;
    let sent = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok());
    if tokens_match(sent, &claims.csrf) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            ErrorCode::CsrfTokenMismatch,
            "Missing or mismatched X-CSRF-Token header",
        ))
    }
}

/// Length-independent comparison of the header against the expected token.
fn tokens_match(sent: Option<&str>, expected: &str) -> bool {
    let Some(sent) = sent else {
        return false;
    };
    if sent.len() != expected.len() || expected.is_empty() {
        return false;
    }
    sent.bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
