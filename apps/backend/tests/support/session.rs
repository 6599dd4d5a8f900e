use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use serde_json::{json, Value};

/// A logged-in test user.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub csrf: String,
    pub user_id: i64,
    pub username: String,
}

impl Session {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

/// Password used for every test account.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// POST credentials to `/api/auth/{signup|login}` and return the raw response.
pub async fn credentials<S, B>(
    app: &S,
    endpoint: &str,
    username: &str,
    password: &str,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/auth/{endpoint}"))
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

async fn session_from<B: MessageBody>(resp: ServiceResponse<B>) -> Session {
    let body: Value = test::read_body_json(resp).await;
    Session {
        token: body["token"].as_str().unwrap().to_string(),
        csrf: body["csrf_token"].as_str().unwrap().to_string(),
        user_id: body["user_id"].as_i64().unwrap(),
        username: body["username"].as_str().unwrap().to_string(),
    }
}

/// Create a fresh account with `TEST_PASSWORD`.
pub async fn sign_up<S, B>(app: &S, username: &str) -> Session
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = credentials(app, "signup", username, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "signup failed for {username}");
    session_from(resp).await
}

/// Log an existing account in with `TEST_PASSWORD`.
pub async fn log_in<S, B>(app: &S, username: &str) -> Session
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = credentials(app, "login", username, TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK, "login failed for {username}");
    session_from(resp).await
}

/// Authenticated POST with the CSRF header and a JSON body.
pub async fn post_json<S, B>(
    app: &S,
    session: &Session,
    uri: &str,
    body: Value,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(session.bearer())
        .insert_header(("X-CSRF-Token", session.csrf.clone()))
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

/// Authenticated POST with the CSRF header and a url-encoded form body.
pub async fn post_form<S, B>(
    app: &S,
    session: &Session,
    uri: &str,
    form: &str,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(session.bearer())
        .insert_header(("X-CSRF-Token", session.csrf.clone()))
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(form.to_string())
        .to_request();
    test::call_service(app, req).await
}

/// Authenticated POST with the CSRF header and no body.
pub async fn post<S, B>(app: &S, session: &Session, uri: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(session.bearer())
        .insert_header(("X-CSRF-Token", session.csrf.clone()))
        .to_request();
    test::call_service(app, req).await
}

pub async fn get<S, B>(app: &S, session: &Session, uri: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(session.bearer())
        .to_request();
    test::call_service(app, req).await
}
