use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use backend_test_support::unique_helpers::unique_username;
use serde_json::{json, Value};

use crate::support::{
    active_game, create_test_app, credentials, log_in, post, sign_up, state_of, test_state,
    TEST_PASSWORD,
};

#[actix_web::test]
async fn test_signup_issues_token_and_csrf() {
    let app = create_test_app(test_state()).await;
    let name = unique_username("alice");

    let session = sign_up(&app, &name).await;

    assert_eq!(session.username, name);
    assert_eq!(session.token.split('.').count(), 3);
    assert_eq!(session.csrf.len(), 32);
}

#[actix_web::test]
async fn test_login_is_case_insensitive_and_rotates_csrf() {
    let app = create_test_app(test_state()).await;
    let name = unique_username("bob");

    let first = sign_up(&app, &name).await;
    let second = log_in(&app, &name.to_uppercase()).await;

    assert_eq!(first.user_id, second.user_id);
    assert_eq!(second.username, name);
    assert_ne!(first.csrf, second.csrf);
}

#[actix_web::test]
async fn test_taken_username_cannot_be_claimed_again() {
    let app = create_test_app(test_state()).await;
    let name = unique_username("taken");
    sign_up(&app, &name).await;

    let resp = credentials(&app, "signup", &name.to_lowercase(), "another-password").await;

    assert_problem(resp, "USERNAME_TAKEN", StatusCode::CONFLICT, None).await;
}

#[actix_web::test]
async fn test_login_requires_the_right_password() {
    let app = create_test_app(test_state()).await;
    let name = unique_username("carol");
    sign_up(&app, &name).await;

    let resp = credentials(&app, "login", &name, "not-the-password").await;
    assert_eq!(resp.headers().get("www-authenticate").unwrap(), "Bearer");
    assert_problem(
        resp,
        "UNAUTHORIZED_INVALID_CREDENTIALS",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": name }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None).await;
}

#[actix_web::test]
async fn test_unknown_user_gets_the_same_answer_as_a_wrong_password() {
    let app = create_test_app(test_state()).await;

    let resp = credentials(&app, "login", &unique_username("ghost"), TEST_PASSWORD).await;

    assert_problem(
        resp,
        "UNAUTHORIZED_INVALID_CREDENTIALS",
        StatusCode::UNAUTHORIZED,
        Some("Invalid username or password"),
    )
    .await;
}

#[actix_web::test]
async fn test_seat_cannot_be_taken_over_by_name() {
    let app = create_test_app(test_state()).await;
    let game = active_game(&app, "steal").await;
    let state = state_of(&app, &game, &game.host).await;
    let victim = game.seat(state["game"]["current_player_id"].as_i64().unwrap());

    let resp = credentials(&app, "login", &victim.username, "guessing-game").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = credentials(&app, "signup", &victim.username, "guessing-game").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // the rightful owner still plays
    let resp = post(&app, victim, &game.url("roll/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_signup_validates_username_and_password() {
    let app = create_test_app(test_state()).await;

    for name in ["ab", "has space", "semi;colon", "averyveryverylongusername"] {
        let resp = credentials(&app, "signup", name, TEST_PASSWORD).await;
        assert_problem(
            resp,
            "INVALID_USERNAME",
            StatusCode::UNPROCESSABLE_ENTITY,
            None,
        )
        .await;
    }

    let resp = credentials(&app, "signup", &unique_username("dan"), "short").await;
    assert_problem(resp, "INVALID_PASSWORD", StatusCode::UNPROCESSABLE_ENTITY, None).await;
}

#[actix_web::test]
async fn test_login_without_body_is_bad_request() {
    let app = create_test_app(test_state()).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, Some("Invalid JSON")).await;
}

#[actix_web::test]
async fn test_session_response_shape() {
    let app = create_test_app(test_state()).await;

    let resp = credentials(&app, "signup", &unique_username("erin"), TEST_PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    for key in ["token", "csrf_token", "user_id", "username"] {
        assert!(body.get(key).is_some(), "{key} missing");
    }
    assert!(body.get("password").is_none());
}
