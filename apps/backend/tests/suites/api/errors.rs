use std::time::SystemTime;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use backend_test_support::unique_helpers::unique_username;
use blitzquest_backend::auth::jwt::mint_access_token;
use blitzquest_backend::state::SecurityConfig;
use serde_json::{json, Value};

use crate::support::{create_test_app, get, post, post_json, sign_up, test_state};

#[actix_web::test]
async fn test_missing_bearer_is_unauthorized() {
    let app = create_test_app(test_state()).await;

    let req = test::TestRequest::get().uri("/api/games").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("www-authenticate").unwrap(), "Bearer");
    assert_problem(
        resp,
        "UNAUTHORIZED_MISSING_BEARER",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;
}

#[actix_web::test]
async fn test_garbage_token_is_invalid() {
    let app = create_test_app(test_state()).await;

    let req = test::TestRequest::get()
        .uri("/api/games")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem(resp, "UNAUTHORIZED_INVALID_JWT", StatusCode::UNAUTHORIZED, None).await;
}

#[actix_web::test]
async fn test_token_for_unknown_user_is_forbidden() {
    let app = create_test_app(test_state()).await;
    let token = mint_access_token(
        "no-such-sub",
        "ghost",
        "csrf",
        SystemTime::now(),
        &SecurityConfig::default(),
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/games")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem(resp, "FORBIDDEN_USER_NOT_FOUND", StatusCode::FORBIDDEN, None).await;
}

#[actix_web::test]
async fn test_post_without_csrf_header_is_rejected() {
    let app = create_test_app(test_state()).await;
    let session = sign_up(&app, &unique_username("dave")).await;

    let req = test::TestRequest::post()
        .uri("/api/games")
        .insert_header(session.bearer())
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "CSRF_TOKEN_MISMATCH", StatusCode::FORBIDDEN, None).await;

    let req = test::TestRequest::post()
        .uri("/api/games")
        .insert_header(session.bearer())
        .insert_header(("X-CSRF-Token", "wrong"))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "CSRF_TOKEN_MISMATCH", StatusCode::FORBIDDEN, None).await;
}

#[actix_web::test]
async fn test_invalid_game_ids() {
    let app = create_test_app(test_state()).await;
    let session = sign_up(&app, &unique_username("erin")).await;

    for raw in ["abc", "0", "-4"] {
        let resp = get(&app, &session, &format!("/api/games/{raw}/state/")).await;
        assert_problem(resp, "INVALID_GAME_ID", StatusCode::BAD_REQUEST, None).await;
    }
}

#[actix_web::test]
async fn test_unknown_game_is_not_found() {
    let app = create_test_app(test_state()).await;
    let session = sign_up(&app, &unique_username("frank")).await;

    let resp = get(&app, &session, "/api/games/424242/state/").await;
    assert_problem(resp, "GAME_NOT_FOUND", StatusCode::NOT_FOUND, Some("424242")).await;

    let resp = post(&app, &session, "/api/games/424242/roll/").await;
    assert_problem(resp, "GAME_NOT_FOUND", StatusCode::NOT_FOUND, None).await;
}

#[actix_web::test]
async fn test_mistyped_body_is_bad_request() {
    let app = create_test_app(test_state()).await;
    let session = sign_up(&app, &unique_username("gina")).await;

    let resp = post_json(&app, &session, "/api/games", json!({ "max_players": "four" })).await;
    assert_problem(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, Some("wrong types")).await;
}

#[actix_web::test]
async fn test_problem_trace_id_matches_request_id() {
    let app = create_test_app(test_state()).await;

    let req = test::TestRequest::get().uri("/api/games").to_request();
    let resp = test::call_service(&app, req).await;
    let request_id = resp
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["trace_id"], request_id.as_str());
}
