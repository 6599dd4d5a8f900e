use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::problem_details::assert_problem;
use backend_test_support::unique_helpers::unique_username;
use serde_json::{json, Value};

use crate::support::game_setup::finish_draft;
use crate::support::{
    active_game, create_test_app, post, post_form, post_json, sign_up, started_game, state_of, test_state,
    waiting_game,
};

#[actix_web::test]
async fn test_ordering_rolls_lead_to_draft() {
    let app = create_test_app(test_state()).await;
    let game = started_game(&app, "ord").await;

    let resp = post(&app, &game.host, &game.url("order_roll/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let rolls = body["game_state"]["pending"]["data"]["rolls"].as_array().unwrap().clone();
    let mine = rolls.iter().find(|r| r["player_id"] == 1).unwrap();
    assert!((1..=6).contains(&mine["roll"].as_i64().unwrap()));

    let resp = post(&app, &game.host, &game.url("order_roll/")).await;
    assert_problem(resp, "ALREADY_RESOLVED", StatusCode::CONFLICT, None).await;

    let resp = post(&app, &game.guest, &game.url("order_roll/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["game_state"]["game"]["status"], "drafting");
    assert_eq!(body["game_state"]["pending"]["kind"], "draft");
}

#[actix_web::test]
async fn test_draft_offers_are_private_and_turn_bound() {
    let app = create_test_app(test_state()).await;
    let game = started_game(&app, "dft").await;
    for session in [&game.host, &game.guest] {
        post(&app, session, &game.url("order_roll/")).await;
    }

    let state = state_of(&app, &game, &game.host).await;
    let picker_id = state["pending"]["data"]["picker"].as_i64().unwrap();
    let picker = game.seat(picker_id);
    let other = game.seat(3 - picker_id);

    let picker_view = state_of(&app, &game, picker).await;
    let offers = picker_view["pending"]["data"]["offers"].as_array().unwrap();
    assert_eq!(offers.len(), 3);
    let other_view = state_of(&app, &game, other).await;
    assert!(other_view["pending"]["data"]["offers"].is_null());

    let card_id = offers[0]["id"].as_i64().unwrap();
    let resp = post_json(&app, other, &game.url("draft/pick/"), json!({ "card_id": card_id })).await;
    assert_problem(resp, "NOT_YOUR_TURN", StatusCode::FORBIDDEN, None).await;

    let resp = post_json(&app, picker, &game.url("draft/pick/"), json!({ "card_id": 99999 })).await;
    assert_problem(resp, "NO_SUCH_TARGET", StatusCode::UNPROCESSABLE_ENTITY, None).await;

    finish_draft(&app, &game).await;

    for session in [&game.host, &game.guest] {
        let state = state_of(&app, &game, session).await;
        assert_eq!(state["game"]["status"], "active");
        assert_eq!(state["me"]["cards"].as_array().unwrap().len(), 1);
        assert_eq!(state["players"][0]["card_count"], 1);
    }

    let resp = post_json(&app, picker, &game.url("draft/pick/"), json!({ "card_id": card_id })).await;
    assert_problem(resp, "ALREADY_RESOLVED", StatusCode::CONFLICT, None).await;
}

#[actix_web::test]
async fn test_roll_moves_current_player() {
    let app = create_test_app(test_state()).await;
    let game = active_game(&app, "roll").await;

    let state = state_of(&app, &game, &game.host).await;
    let current = state["game"]["current_player_id"].as_i64().unwrap();
    let version = state["game"]["version"].as_i64().unwrap();

    let resp = post(&app, game.seat(3 - current), &game.url("roll/")).await;
    assert_problem(resp, "NOT_YOUR_TURN", StatusCode::FORBIDDEN, None).await;

    let resp = post(&app, game.seat(current), &game.url("roll/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let snap = &body["game_state"];

    let last_roll = &snap["last_roll"];
    assert_eq!(last_roll["player_id"], current);
    let value = last_roll["value"].as_i64().unwrap();
    assert!((1..=6).contains(&value));
    assert_eq!(last_roll["from"], 0);
    assert!(snap["game"]["version"].as_i64().unwrap() > version);

    assert!(snap["log"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["kind"] == "roll_dice" && e["player_id"] == current));
}

#[actix_web::test]
async fn test_actions_outside_play_are_rejected() {
    let app = create_test_app(test_state()).await;
    let game = waiting_game(&app, "idle").await;

    let resp = post(&app, &game.host, &game.url("roll/")).await;
    assert_problem(resp, "GAME_NOT_ACTIVE", StatusCode::CONFLICT, None).await;

    let resp = post(&app, &game.host, &game.url("order_roll/")).await;
    assert_problem(resp, "GAME_NOT_ACTIVE", StatusCode::CONFLICT, None).await;

    let resp = post_json(
        &app,
        &game.host,
        &game.url("use_card/"),
        json!({ "card_id": 1 }),
    )
    .await;
    assert_problem(resp, "GAME_NOT_ACTIVE", StatusCode::CONFLICT, None).await;
}

#[actix_web::test]
async fn test_resolving_nothing_pending() {
    let app = create_test_app(test_state()).await;
    let game = active_game(&app, "none").await;
    let state = state_of(&app, &game, &game.host).await;
    let current = game.seat(state["game"]["current_player_id"].as_i64().unwrap());

    for (action, body) in [
        ("shop/close/", json!({})),
        ("gun/skip/", json!({})),
        ("duel/skip/", json!({})),
        ("answer_question/", json!({ "choice_index": 0 })),
    ] {
        let resp = post_json(&app, current, &game.url(action), body).await;
        assert_problem(resp, "ALREADY_RESOLVED", StatusCode::CONFLICT, None).await;
    }
}

#[actix_web::test]
async fn test_unknown_card_is_insufficient() {
    let app = create_test_app(test_state()).await;
    let game = active_game(&app, "card").await;
    let state = state_of(&app, &game, &game.host).await;
    let current = game.seat(state["game"]["current_player_id"].as_i64().unwrap());

    let resp = post_json(&app, current, &game.url("use_card/"), json!({ "card_id": 99999 })).await;
    assert_problem(resp, "INSUFFICIENT_RESOURCE", StatusCode::UNPROCESSABLE_ENTITY, None).await;
}

#[actix_web::test]
async fn test_state_etag_and_not_modified() {
    let app = create_test_app(test_state()).await;
    let game = started_game(&app, "etag").await;

    let req = test::TestRequest::get()
        .uri(&game.url("state/"))
        .insert_header(game.host.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-cache");
    let etag = resp
        .headers()
        .get(header::ETAG)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(etag.starts_with(&format!("\"game-{}-v", game.id)));

    let req = test::TestRequest::get()
        .uri(&game.url("state/"))
        .insert_header(game.host.bearer())
        .insert_header((header::IF_NONE_MATCH, etag.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(resp.headers().get(header::ETAG).unwrap(), etag.as_str());

    post(&app, &game.guest, &game.url("order_roll/")).await;

    let req = test::TestRequest::get()
        .uri(&game.url("state/"))
        .insert_header(game.host.bearer())
        .insert_header((header::IF_NONE_MATCH, etag.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_ne!(resp.headers().get(header::ETAG).unwrap(), etag.as_str());
}

#[actix_web::test]
async fn test_outsiders_cannot_view_or_act() {
    let app = create_test_app(test_state()).await;
    let game = started_game(&app, "priv").await;
    let outsider = sign_up(&app, &unique_username("peek")).await;

    let resp = crate::support::get(&app, &outsider, &game.url("state/")).await;
    assert_problem(resp, "NOT_A_MEMBER", StatusCode::FORBIDDEN, None).await;

    let resp = post(&app, &outsider, &game.url("order_roll/")).await;
    assert_problem(resp, "NOT_A_MEMBER", StatusCode::FORBIDDEN, None).await;
}

#[actix_web::test]
async fn test_snapshot_is_per_viewer() {
    let app = create_test_app(test_state()).await;
    let game = active_game(&app, "view").await;

    let host_view = state_of(&app, &game, &game.host).await;
    let guest_view = state_of(&app, &game, &game.guest).await;

    assert_eq!(host_view["me"]["player_id"], 1);
    assert_eq!(guest_view["me"]["player_id"], 2);
    assert_eq!(host_view["players"], guest_view["players"]);
    assert_eq!(host_view["tiles"], guest_view["tiles"]);
    assert_ne!(host_view["me"]["cards"][0]["id"], guest_view["me"]["cards"][0]["id"]);
}

#[actix_web::test]
async fn test_actions_accept_form_bodies() {
    let app = create_test_app(test_state()).await;
    let game = active_game(&app, "form").await;
    let state = state_of(&app, &game, &game.host).await;
    let current = game.seat(state["game"]["current_player_id"].as_i64().unwrap());

    // decoded, then rejected by the game: nothing is pending
    let resp = post_form(&app, current, &game.url("answer_question/"), "choice_index=2").await;
    assert_problem(resp, "ALREADY_RESOLVED", StatusCode::CONFLICT, None).await;

    let resp = post_form(&app, current, &game.url("answer_question/"), "choice_index=two").await;
    assert_problem(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, Some("Invalid form body")).await;

    let resp = post_form(&app, current, &game.url("use_card/"), "card_id=99999&target_id=2").await;
    assert_problem(resp, "INSUFFICIENT_RESOURCE", StatusCode::UNPROCESSABLE_ENTITY, None).await;
}
