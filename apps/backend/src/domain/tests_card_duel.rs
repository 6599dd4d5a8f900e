use crate::domain::card_duel::DuelSeat;
use crate::domain::card_duel_catalogue::{DuelCard, Status, StatusKind};
use crate::domain::fixtures::{hp, lobby, now, user_id};
use crate::domain::rules::{CARD_DUEL_HAND_PICKS, CARD_DUEL_START_HP};
use crate::domain::snapshot::snapshot;
use crate::domain::state::{Game, GameMode, GameStatus, PlayerId};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

fn duel_game(players: usize) -> Game {
    let mut game = lobby(players, GameMode::CardDuel);
    game.start(user_id(0)).unwrap();
    game
}

/// Current player and the next one in turn order.
fn seats(game: &Game) -> (PlayerId, PlayerId) {
    (game.players[0].id, game.players[1].id)
}

fn seat_mut(game: &mut Game, id: PlayerId) -> &mut DuelSeat {
    game.card_duel
        .iter_mut()
        .find(|s| s.player_id == id)
        .unwrap()
}

/// Skip the picking phase and hand `id` exactly `cards`.
fn set_hand(game: &mut Game, id: PlayerId, cards: &[DuelCard]) {
    let seat = seat_mut(game, id);
    let options: Vec<DuelCard> = seat.pick_options.drain(..).collect();
    seat.deck.extend(options);
    seat.hand = cards.to_vec();
    seat.picks_done = CARD_DUEL_HAND_PICKS;
}

fn give_status(game: &mut Game, id: PlayerId, kind: StatusKind, turns: u8, amount: u32) {
    seat_mut(game, id).statuses.push(Status {
        kind,
        turns,
        amount,
    });
}

fn has_status(game: &Game, id: PlayerId, kind: StatusKind) -> bool {
    game.duel_seat(id).unwrap().status(kind).is_some()
}

#[test]
fn start_skips_board_and_deals_pick_options() {
    let game = duel_game(3);

    assert_eq!(game.status, GameStatus::Active);
    assert!(game.tiles.is_empty());
    assert!(game.pending.is_none());
    assert_eq!(game.current_player_id(), Some(game.players[0].id));
    assert_eq!(game.card_duel.len(), 3);

    for (idx, p) in game.players.iter().enumerate() {
        assert_eq!(p.turn_order as usize, idx);
        assert_eq!(p.hp, CARD_DUEL_START_HP);
        assert_eq!(p.coins, 0);
        let seat = game.duel_seat(p.id).unwrap();
        assert_eq!(seat.pick_options.len(), 3);
        assert_eq!(seat.deck.len(), DuelCard::ALL.len() - 3);
        assert!(seat.hand.is_empty());
        assert_eq!(seat.picks_remaining(), CARD_DUEL_HAND_PICKS);
    }
}

#[test]
fn waiting_card_duel_has_no_board() {
    let game = lobby(2, GameMode::CardDuel);
    assert!(game.tiles.is_empty());
    assert!(game.card_duel.is_empty());
}

#[test]
fn pick_keeps_one_card_and_redeals() {
    let mut game = duel_game(2);
    let (_, other) = seats(&game);
    let choice = game.duel_seat(other).unwrap().pick_options[1];

    // picks do not wait for the turn
    game.card_duel_pick(other, choice).unwrap();

    let seat = game.duel_seat(other).unwrap();
    assert_eq!(seat.hand, vec![choice]);
    assert_eq!(seat.pick_options.len(), 3);
    assert_eq!(seat.picks_done, 1);
    assert_eq!(
        seat.deck.len() + seat.hand.len() + seat.pick_options.len(),
        DuelCard::ALL.len()
    );
}

#[test]
fn pick_must_come_from_the_options() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    let options = game.duel_seat(me).unwrap().pick_options.clone();
    let off_offer = DuelCard::ALL
        .into_iter()
        .find(|c| !options.contains(c))
        .unwrap();

    let err = game.card_duel_pick(me, off_offer).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NoSuchTarget, _)
    ));
}

#[test]
fn hand_is_complete_after_five_picks() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    for _ in 0..CARD_DUEL_HAND_PICKS {
        let card = game.duel_seat(me).unwrap().pick_options[0];
        game.card_duel_pick(me, card).unwrap();
    }

    let seat = game.duel_seat(me).unwrap();
    assert_eq!(seat.hand.len(), CARD_DUEL_HAND_PICKS as usize);
    assert!(seat.pick_options.is_empty());
    assert_eq!(seat.deck.len(), DuelCard::ALL.len() - CARD_DUEL_HAND_PICKS as usize);

    let err = game.card_duel_pick(me, DuelCard::Heal).unwrap_err();
    assert!(err.is_already_resolved());
}

#[test]
fn play_waits_for_a_complete_hand() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    let err = game.card_duel_play(me, DuelCard::Heal, None, &[]).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::PhaseMismatch, _)
    ));
    let err = game.card_duel_end_turn(me).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::PhaseMismatch, _)
    ));
}

#[test]
fn board_actions_are_refused() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    let err = game.roll_dice(me, now()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::PhaseMismatch, _)
    ));
}

#[test]
fn only_the_current_player_plays() {
    let mut game = duel_game(2);
    let (_, other) = seats(&game);
    set_hand(&mut game, other, &[DuelCard::Heal]);
    let err = game.card_duel_play(other, DuelCard::Heal, None, &[]).unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_, _)));
}

#[test]
fn attack_card_damages_and_applies_status() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::CripplingShot, DuelCard::VenomStrike, DuelCard::IronSkin]);

    game.card_duel_play(me, DuelCard::CripplingShot, None, &[]).unwrap();

    assert_eq!(hp(&game, foe), CARD_DUEL_START_HP - 4);
    assert!(has_status(&game, foe, StatusKind::Weaken));
    let seat = game.duel_seat(me).unwrap();
    assert!(seat.turn_flags.bonus_used);
    assert_eq!(seat.turn_flags.last_played, Some(DuelCard::CripplingShot));
    assert_eq!(seat.discard, vec![DuelCard::CripplingShot]);

    // one bonus card per turn
    let err = game.card_duel_play(me, DuelCard::VenomStrike, None, &[]).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::CardBlocked, _)));

    // the action slot is still free
    game.card_duel_play(me, DuelCard::IronSkin, None, &[]).unwrap();
    assert_eq!(game.player(me).unwrap().shield_points, 6);
}

#[test]
fn card_must_be_in_hand() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::Heal]);
    let err = game.card_duel_play(me, DuelCard::Burn, None, &[]).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InsufficientResource, _)
    ));
}

#[test]
fn silence_blocks_everything_and_stun_blocks_actions() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::Heal, DuelCard::LuckyDraw]);

    give_status(&mut game, me, StatusKind::Silence, 1, 0);
    let err = game.card_duel_play(me, DuelCard::LuckyDraw, None, &[]).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::CardBlocked, _)));

    seat_mut(&mut game, me).statuses.clear();
    give_status(&mut game, me, StatusKind::Stun, 1, 0);
    let err = game.card_duel_play(me, DuelCard::Heal, None, &[]).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::CardBlocked, _)));
    game.card_duel_play(me, DuelCard::LuckyDraw, None, &[]).unwrap();
}

#[test]
fn damage_modifiers_stack_up() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::VenomStrike]);
    give_status(&mut game, me, StatusKind::BattleFocus, 2, 2);
    give_status(&mut game, me, StatusKind::Weaken, 99, 2);
    give_status(&mut game, foe, StatusKind::Vulnerable, 2, 1);

    game.card_duel_play(me, DuelCard::VenomStrike, None, &[]).unwrap();

    // 3 base + 2 focus - 2 weaken + 1 vulnerable
    assert_eq!(hp(&game, foe), CARD_DUEL_START_HP - 4);
    assert!(!has_status(&game, me, StatusKind::Weaken));
    assert!(has_status(&game, me, StatusKind::BattleFocus));
    assert!(has_status(&game, foe, StatusKind::Poison));
}

#[test]
fn weaken_curse_halves_the_next_attack() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::CripplingShot]);
    give_status(&mut game, me, StatusKind::WeakenCurse, 99, 50);

    game.card_duel_play(me, DuelCard::CripplingShot, None, &[]).unwrap();

    assert_eq!(hp(&game, foe), CARD_DUEL_START_HP - 2);
    assert!(!has_status(&game, me, StatusKind::WeakenCurse));
}

#[test]
fn counter_stance_reflects_once() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::FlameJab]);
    give_status(&mut game, foe, StatusKind::CounterStance, 99, 3);
    game.player_mut(foe).unwrap().shield_points = 2;

    game.card_duel_play(me, DuelCard::FlameJab, None, &[]).unwrap();

    assert_eq!(hp(&game, foe), CARD_DUEL_START_HP - 1);
    assert_eq!(game.player(foe).unwrap().shield_points, 0);
    assert_eq!(hp(&game, me), CARD_DUEL_START_HP - 3);
    assert!(!has_status(&game, foe, StatusKind::CounterStance));
    assert!(has_status(&game, foe, StatusKind::Burn));
}

#[test]
fn heals_are_amplified_and_capped() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::Heal, DuelCard::HolyLight]);
    game.player_mut(me).unwrap().hp = 10;
    give_status(&mut game, me, StatusKind::AmplifyHeal, 99, 3);

    game.card_duel_play(me, DuelCard::Heal, None, &[]).unwrap();
    assert_eq!(hp(&game, me), 18);
    assert!(!has_status(&game, me, StatusKind::AmplifyHeal));

    game.card_duel_play(me, DuelCard::HolyLight, None, &[]).unwrap();
    assert_eq!(hp(&game, me), CARD_DUEL_START_HP);
    assert!(has_status(&game, me, StatusKind::Regen));
}

#[test]
fn guard_swap_trades_shields() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::GuardSwap]);
    game.player_mut(foe).unwrap().shield_points = 5;
    game.player_mut(me).unwrap().shield_points = 1;

    game.card_duel_play(me, DuelCard::GuardSwap, Some(foe), &[]).unwrap();

    assert_eq!(game.player(me).unwrap().shield_points, 5);
    assert_eq!(game.player(foe).unwrap().shield_points, 1);
}

#[test]
fn card_cycle_replaces_named_cards() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::CardCycle, DuelCard::Heal, DuelCard::Poison, DuelCard::Burn]);

    let err = game
        .card_duel_play(
            me,
            DuelCard::CardCycle,
            None,
            &[DuelCard::Heal, DuelCard::Poison, DuelCard::Burn],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidInput, _)
    ));

    game.card_duel_play(me, DuelCard::CardCycle, None, &[DuelCard::Heal, DuelCard::Poison])
        .unwrap();

    let seat = game.duel_seat(me).unwrap();
    assert_eq!(seat.hand.len(), 3);
    assert_eq!(seat.turn_flags.draws_this_turn, 2);
    for card in [DuelCard::Heal, DuelCard::Poison, DuelCard::CardCycle] {
        assert!(seat.discard.contains(&card), "{card:?}");
    }
}

#[test]
fn hostile_card_needs_a_target_with_several_opponents() {
    let mut game = duel_game(3);
    let (me, _) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::Poison]);

    let err = game.card_duel_play(me, DuelCard::Poison, None, &[]).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NoSuchTarget, _)
    ));
    let err = game.card_duel_play(me, DuelCard::Poison, Some(me), &[]).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NoSuchTarget, _)
    ));

    let third = game.players[2].id;
    game.card_duel_play(me, DuelCard::Poison, Some(third), &[]).unwrap();
    assert!(has_status(&game, third, StatusKind::Poison));
}

#[test]
fn end_turn_ticks_statuses_and_draws_for_the_next_player() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    set_hand(&mut game, me, &[]);
    set_hand(&mut game, foe, &[]);
    give_status(&mut game, me, StatusKind::Silence, 1, 0);
    give_status(&mut game, foe, StatusKind::Poison, 3, 1);
    give_status(&mut game, foe, StatusKind::Focus, 1, 1);
    game.player_mut(foe).unwrap().shield_points = 4;

    game.card_duel_end_turn(me).unwrap();

    assert_eq!(game.current_player_id(), Some(foe));
    assert!(!has_status(&game, me, StatusKind::Silence));
    // ticks ignore shields
    assert_eq!(hp(&game, foe), CARD_DUEL_START_HP - 1);
    let seat = game.duel_seat(foe).unwrap();
    assert_eq!(seat.status(StatusKind::Poison).map(|s| s.turns), Some(2));
    assert!(seat.status(StatusKind::Focus).is_none());
    assert_eq!(seat.hand.len(), 2);
    assert_eq!(seat.turn_flags.draws_this_turn, 2);
    assert!(!seat.turn_flags.action_used);
}

#[test]
fn lethal_tick_ends_the_game() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    set_hand(&mut game, me, &[]);
    set_hand(&mut game, foe, &[]);
    game.player_mut(foe).unwrap().hp = 1;
    give_status(&mut game, foe, StatusKind::Burn, 2, 2);

    game.card_duel_end_turn(me).unwrap();

    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner, Some(me));
    assert!(!game.player(foe).unwrap().is_alive);
}

#[test]
fn lethal_attack_ends_the_game() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::VenomStrike]);
    game.player_mut(foe).unwrap().hp = 3;

    game.card_duel_play(me, DuelCard::VenomStrike, None, &[]).unwrap();

    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.winner, Some(me));
    assert!(!has_status(&game, foe, StatusKind::Poison));
}

#[test]
fn gamble_either_shields_or_hurts() {
    let mut game = duel_game(2);
    let (me, _) = seats(&game);
    set_hand(&mut game, me, &[DuelCard::GambleCoin]);

    game.card_duel_play(me, DuelCard::GambleCoin, None, &[]).unwrap();

    let p = game.player(me).unwrap();
    assert!(
        (p.shield_points == 8 && p.hp == CARD_DUEL_START_HP)
            || (p.shield_points == 0 && p.hp == CARD_DUEL_START_HP - 3)
    );
}

#[test]
fn snapshot_shows_own_cards_only() {
    let mut game = duel_game(2);
    let (me, foe) = seats(&game);
    let pick = game.duel_seat(me).unwrap().pick_options[0];
    game.card_duel_pick(me, pick).unwrap();

    let snap = snapshot(&game, Some(me));
    let mine = snap.me.as_ref().and_then(|m| m.card_duel.as_ref()).unwrap();
    assert_eq!(mine.hand.len(), 1);
    assert_eq!(mine.hand[0].code, pick);
    assert_eq!(mine.pick_options.len(), 3);
    assert_eq!(mine.picks_remaining, CARD_DUEL_HAND_PICKS - 1);

    let json = serde_json::to_value(&snap).unwrap();
    for player in json["players"].as_array().unwrap() {
        let public = &player["card_duel"];
        assert!(public.get("hand").is_none());
        assert!(public.get("pick_options").is_none());
    }
    let foe_view = json["players"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == foe)
        .unwrap();
    assert_eq!(foe_view["card_duel"]["hand_count"], 0);
    assert_eq!(foe_view["card_duel"]["picks_remaining"], CARD_DUEL_HAND_PICKS);
    assert_eq!(json["me"]["card_duel"]["hand"][0]["code"], serde_json::to_value(pick).unwrap());

    assert!(snapshot(&game, None).me.is_none());
}

#[test]
fn board_snapshots_carry_no_card_duel_fields() {
    let game = lobby(2, GameMode::Finish);
    let json = serde_json::to_value(snapshot(&game, Some(1))).unwrap();
    assert!(json["players"][0].get("card_duel").is_none());
    assert!(json["me"].get("card_duel").is_none());
}
