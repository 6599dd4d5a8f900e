//! Property tests for turn flow (pure domain).
//!
//! Properties tested:
//! - A roll lands on exactly one tile and is reproducible from the same pre-state
//! - Whenever the game is active, the current player is alive
//! - Positions stay on the board and at most one pending action is open
//! - Duel choices never leak to the other side before the duel resolves

use proptest::prelude::*;

use crate::domain::duel::{DuelMove, DuelPhase, DuelReward};
use crate::domain::fixtures::{active_game_in, now, set_tile};
use crate::domain::pending::PendingAction;
use crate::domain::snapshot::snapshot;
use crate::domain::state::{Game, GameMode, GameStatus, PlayerId};
use crate::domain::test_gens;
use crate::domain::tiles::TileKind;
use crate::errors::domain::DomainError;

const LENGTH: u16 = 24;

fn board_game(players: usize, tiles: &[TileKind], mode: GameMode) -> Game {
    let mut game = active_game_in(players, LENGTH, mode);
    for (i, kind) in tiles.iter().enumerate() {
        set_tile(&mut game, i as u16 + 1, *kind);
    }
    game
}

/// Resolve whatever is pending with simple deterministic answers.
fn resolve_pending(game: &mut Game, pick: usize) {
    let Some(action) = game.pending.clone() else {
        return;
    };
    let result = match action {
        PendingAction::Question(q) => game.answer_question(q.for_player, pick % 4, now()).map(|_| ()),
        PendingAction::Shop(s) => game.shop_close(s.for_player),
        PendingAction::Gun(g) => {
            let target = game.alive_opponents(g.for_player).map(|p| p.id).next();
            match target {
                Some(t) if pick % 2 == 0 => game.gun_attack(g.for_player, t),
                _ => game.gun_skip(g.for_player),
            }
        }
        PendingAction::Duel(d) => match d.phase {
            DuelPhase::ChooseOpponent => {
                let target = game.alive_opponents(d.challenger.player_id).map(|p| p.id).next();
                match target {
                    Some(t) if pick % 3 != 0 => game.duel_select_opponent(d.challenger.player_id, t),
                    _ => game.duel_skip(d.challenger.player_id),
                }
            }
            DuelPhase::Commit | DuelPhase::Predict => {
                let mv = [DuelMove::Strike, DuelMove::Guard, DuelMove::Feint][pick % 3];
                let who = d.waiting_on()[0];
                if d.phase == DuelPhase::Commit {
                    game.duel_commit(who, mv)
                } else {
                    game.duel_predict(who, mv)
                }
            }
            DuelPhase::WinnerChoice => {
                let reward = if pick % 2 == 0 { DuelReward::Coins } else { DuelReward::Damage };
                game.duel_choose_reward(d.winner.unwrap_or_default(), reward)
            }
        },
        PendingAction::OrderingRoll(_) | PendingAction::Draft(_) => Ok(()),
    };
    expect_ok(result);
}

fn expect_ok(result: Result<(), DomainError>) {
    if let Err(e) = result {
        panic!("resolution failed: {e}");
    }
}

fn check_invariants(game: &Game) {
    for p in &game.players {
        assert!(p.position < LENGTH, "player {} off board at {}", p.id, p.position);
        assert_eq!(p.is_alive, p.hp > 0, "alive flag out of sync for {}", p.id);
    }
    if game.status == GameStatus::Active {
        let current = game.current_player().expect("active game has a current player");
        assert!(current.is_alive);
    } else {
        assert!(game.pending.is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_roll_is_deterministic(
        tiles in test_gens::middle_tiles(LENGTH),
        value in test_gens::roll(),
        start in 0u16..(LENGTH - 1),
    ) {
        let mut a = board_game(3, &tiles, GameMode::Finish);
        a.player_mut(1).unwrap().position = start;
        let mut b = a.clone();

        let ra = a.apply_roll(1, value, now());
        let rb = b.apply_roll(1, value, now());

        prop_assert_eq!(ra, rb);
        prop_assert_eq!(&a.players, &b.players);
        prop_assert_eq!(a.pending_kind(), b.pending_kind());
        prop_assert_eq!(a.current_turn_index, b.current_turn_index);
    }

    #[test]
    fn prop_random_play_keeps_invariants(
        tiles in test_gens::middle_tiles(LENGTH),
        rolls in prop::collection::vec((test_gens::roll(), 0usize..12), 1..60),
        survival in any::<bool>(),
    ) {
        let mode = if survival { GameMode::Survival } else { GameMode::Finish };
        let mut game = board_game(3, &tiles, mode);

        for (value, pick) in rolls {
            if game.status != GameStatus::Active {
                break;
            }
            // resolve pending actions until the turn is free again
            let mut guard = 0;
            while game.pending.is_some() && guard < 10 {
                resolve_pending(&mut game, pick + guard);
                check_invariants(&game);
                guard += 1;
            }
            if game.status != GameStatus::Active {
                break;
            }
            let current: PlayerId = game.current_player_id().unwrap();
            let outcome = game.apply_roll(current, value, now()).unwrap();
            prop_assert!((1..=6).contains(&outcome.value));
            check_invariants(&game);
        }
    }

    #[test]
    fn prop_duel_moves_hidden_until_resolved(
        commit in test_gens::duel_move(),
    ) {
        let mut game = board_game(3, &[TileKind::Duel], GameMode::Finish);
        game.apply_roll(1, 1, now()).unwrap();
        game.duel_select_opponent(1, 2).unwrap();
        game.duel_commit(1, commit).unwrap();

        let mine = serde_json::to_value(commit).unwrap();
        for viewer in [Some(2), Some(3), None] {
            let view = serde_json::to_value(snapshot(&game, viewer)).unwrap();
            let pending = &view["pending"]["data"];
            prop_assert!(pending["mine"].is_null() || pending["mine"]["committed"].is_null());
            prop_assert!(!pending.to_string().contains(mine.as_str().unwrap()));
        }
    }
}
