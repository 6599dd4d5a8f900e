use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use backend_test_support::unique_helpers::unique_usernames;
use serde_json::{json, Value};

use super::session::{get, post, post_json, sign_up, Session};

/// A two-player game: the host is player 1, the guest player 2.
pub struct TwoPlayerGame {
    pub id: i64,
    pub host: Session,
    pub guest: Session,
}

impl TwoPlayerGame {
    pub fn url(&self, action: &str) -> String {
        format!("/api/games/{}/{action}", self.id)
    }

    /// Session seated as `player_id`.
    pub fn seat(&self, player_id: i64) -> &Session {
        if player_id == 1 {
            &self.host
        } else {
            &self.guest
        }
    }
}

/// Snapshot for `session`, unwrapped from a 200 response.
pub async fn state_of<S, B>(app: &S, game: &TwoPlayerGame, session: &Session) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = get(app, session, &game.url("state/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    test::read_body_json(resp).await
}

/// Created and joined, still waiting.
pub async fn waiting_game<S, B>(app: &S, prefix: &str) -> TwoPlayerGame
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    waiting_game_with(app, prefix, json!({})).await
}

/// Like `waiting_game` with explicit create settings.
pub async fn waiting_game_with<S, B>(app: &S, prefix: &str, settings: Value) -> TwoPlayerGame
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let names = unique_usernames(prefix, 2);
    let host = sign_up(app, &names[0]).await;
    let guest = sign_up(app, &names[1]).await;

    let resp = post_json(app, &host, "/api/games", settings).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let id = body["game_state"]["game"]["id"].as_i64().unwrap();
    let code = body["game_state"]["game"]["code"].as_str().unwrap().to_string();

    let resp = post_json(app, &guest, "/api/games/join", json!({ "code": code })).await;
    assert_eq!(resp.status(), StatusCode::OK);

    TwoPlayerGame { id, host, guest }
}

/// Started and waiting for ordering rolls.
pub async fn started_game<S, B>(app: &S, prefix: &str) -> TwoPlayerGame
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let game = waiting_game(app, prefix).await;
    let resp = post(app, &game.host, &game.url("start/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    game
}

/// Started card duel; every player still has to pick a hand.
pub async fn card_duel_game<S, B>(app: &S, prefix: &str) -> TwoPlayerGame
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let game = waiting_game_with(app, prefix, json!({ "mode": "card_duel" })).await;
    let resp = post(app, &game.host, &game.url("start/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    game
}

/// Ordered and drafted; the first turn is open.
pub async fn active_game<S, B>(app: &S, prefix: &str) -> TwoPlayerGame
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let game = started_game(app, prefix).await;
    for session in [&game.host, &game.guest] {
        let resp = post(app, session, &game.url("order_roll/")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    finish_draft(app, &game).await;
    game
}

/// Let whoever is picking take their first offer until play begins.
pub async fn finish_draft<S, B>(app: &S, game: &TwoPlayerGame)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    for _ in 0..16 {
        let state = state_of(app, game, &game.host).await;
        if state["game"]["status"] == "active" {
            return;
        }
        assert_eq!(state["pending"]["kind"], "draft");
        let picker = game.seat(state["pending"]["data"]["picker"].as_i64().unwrap());

        let view = state_of(app, game, picker).await;
        let card_id = view["pending"]["data"]["offers"][0]["id"].as_i64().unwrap();
        let resp = post_json(app, picker, &game.url("draft/pick/"), json!({ "card_id": card_id })).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    panic!("draft did not finish");
}
