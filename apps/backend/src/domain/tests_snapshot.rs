use crate::domain::duel::DuelMove;
use crate::domain::fixtures::{active_game, lobby, now, set_tile, user_id};
use crate::domain::rules::SNAPSHOT_LOG_ENTRIES;
use crate::domain::snapshot::{snapshot, PendingView};
use crate::domain::state::GameMode;
use crate::domain::tiles::TileKind;

#[test]
fn public_header_and_players() {
    let game = active_game(2, 12);
    let snap = snapshot(&game, Some(1));

    assert_eq!(snap.game.id, game.id);
    assert_eq!(snap.game.current_player_id, Some(1));
    assert_eq!(snap.tiles.len(), 12);
    assert_eq!(snap.players.len(), 2);
    assert!(snap.players[0].is_host);
    assert!(!snap.players[1].is_host);

    let me = snap.me.unwrap();
    assert_eq!(me.player_id, 1);
    assert!(me.is_current);
}

#[test]
fn spectator_has_no_private_view() {
    let game = active_game(2, 12);
    let snap = snapshot(&game, None);
    assert!(snap.me.is_none());
}

#[test]
fn question_never_includes_answer() {
    let mut game = active_game(2, 20);
    set_tile(&mut game, 2, TileKind::Question { reward: 1 });
    game.apply_roll(1, 2, now()).unwrap();

    let json = serde_json::to_value(snapshot(&game, Some(1))).unwrap();
    let pending = &json["pending"];
    assert_eq!(pending["kind"], "question");
    assert_eq!(pending["data"]["choices"].as_array().unwrap().len(), 4);
    assert!(!json.to_string().contains("correct"));
}

#[test]
fn duel_choices_are_masked_from_the_other_side() {
    let mut game = active_game(3, 20);
    set_tile(&mut game, 3, TileKind::Duel);
    game.apply_roll(1, 3, now()).unwrap();
    game.duel_select_opponent(1, 2).unwrap();
    game.duel_commit(1, DuelMove::Feint).unwrap();

    let for_opponent = serde_json::to_value(snapshot(&game, Some(2))).unwrap();
    let for_bystander = serde_json::to_value(snapshot(&game, Some(3))).unwrap();
    let for_challenger = serde_json::to_value(snapshot(&game, Some(1))).unwrap();

    assert!(!for_opponent.to_string().contains("feint"));
    assert!(!for_bystander.to_string().contains("feint"));
    assert_eq!(for_challenger["pending"]["data"]["mine"]["committed"], "feint");
    assert_eq!(for_opponent["pending"]["data"]["sides"][0]["committed"], true);
    assert!(for_bystander["pending"]["data"]["mine"].is_null());
}

#[test]
fn draft_offers_only_visible_to_picker() {
    let mut game = lobby(2, GameMode::Finish);
    game.start(user_id(0)).unwrap();
    game.apply_order_roll(1, 6).unwrap();
    game.apply_order_roll(2, 1).unwrap();

    match snapshot(&game, Some(1)).pending {
        Some(PendingView::Draft { picker, offers, .. }) => {
            assert_eq!(picker, 1);
            assert_eq!(offers.map(|o| o.len()), Some(3));
        }
        other => panic!("expected draft view, got {other:?}"),
    }
    match snapshot(&game, Some(2)).pending {
        Some(PendingView::Draft { offers, .. }) => assert!(offers.is_none()),
        other => panic!("expected draft view, got {other:?}"),
    }
}

#[test]
fn log_is_truncated_to_recent_entries() {
    let mut game = active_game(2, 100);
    for _ in 0..20 {
        let current = game.current_player_id().unwrap();
        game.apply_roll(current, 1, now()).unwrap();
    }
    assert!(game.log.len() > SNAPSHOT_LOG_ENTRIES);

    let snap = snapshot(&game, Some(1));
    assert_eq!(snap.log.len(), SNAPSHOT_LOG_ENTRIES);
    assert_eq!(snap.log.last(), game.log.last());
}
