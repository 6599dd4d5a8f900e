//! Card duel mode: no board. Every player drafts an opening hand from a
//! personal deck, then players take turns playing cards at each other until
//! one is left standing.
//!
//! A turn allows one action card and one bonus card. Status effects tick at
//! the start of the holder's turn, before the turn draw.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::card_duel_catalogue::{DuelCard, DuelEffect, PlaySlot, Status, StatusKind};
use super::log::LogKind;
use super::rules::{
    CARD_DUEL_HAND_PICKS, CARD_DUEL_PICK_OPTIONS, CARD_DUEL_START_HP, CARD_DUEL_TURN_DRAW,
};
use super::state::{Game, GameMode, GameStatus, PlayerId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

/// What the current player has done this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TurnFlags {
    pub action_used: bool,
    pub bonus_used: bool,
    pub draws_this_turn: u32,
    pub last_played: Option<DuelCard>,
}

/// One player's cards and statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelSeat {
    pub player_id: PlayerId,
    pub deck: Vec<DuelCard>,
    pub hand: Vec<DuelCard>,
    pub discard: Vec<DuelCard>,
    /// Reserved off the deck until the pick resolves.
    pub pick_options: Vec<DuelCard>,
    pub picks_done: u8,
    pub statuses: Vec<Status>,
    pub turn_flags: TurnFlags,
}

impl DuelSeat {
    /// Full shuffled deck with the first pick already dealt.
    fn new(player_id: PlayerId, rng: &mut ChaCha8Rng) -> Self {
        let mut seat = Self {
            player_id,
            deck: DuelCard::ALL.to_vec(),
            hand: Vec::new(),
            discard: Vec::new(),
            pick_options: Vec::new(),
            picks_done: 0,
            statuses: Vec::new(),
            turn_flags: TurnFlags::default(),
        };
        seat.deal_pick_options(rng);
        seat
    }

    pub fn picks_remaining(&self) -> u8 {
        CARD_DUEL_HAND_PICKS.saturating_sub(self.picks_done)
    }

    /// Shuffle the deck and reserve the next pick options off its top.
    fn deal_pick_options(&mut self, rng: &mut ChaCha8Rng) {
        self.deck.shuffle(rng);
        let take = CARD_DUEL_PICK_OPTIONS.min(self.deck.len());
        self.pick_options = self.deck.drain(..take).collect();
    }

    /// Draw up to `n` cards. An empty deck is refilled from the shuffled
    /// discard pile; returns how many were drawn.
    fn draw(&mut self, n: usize, rng: &mut ChaCha8Rng) -> usize {
        let mut drawn = 0;
        while drawn < n {
            if self.deck.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.deck.append(&mut self.discard);
                self.deck.shuffle(rng);
            }
            let Some(card) = self.deck.pop() else { break };
            self.hand.push(card);
            drawn += 1;
        }
        drawn
    }

    pub fn status(&self, kind: StatusKind) -> Option<&Status> {
        self.statuses.iter().find(|s| s.kind == kind)
    }

    /// Strength of `kind`, 0 when absent.
    pub fn amount(&self, kind: StatusKind) -> u32 {
        self.status(kind).map_or(0, |s| s.amount)
    }

    fn take_status(&mut self, kind: StatusKind) -> Option<Status> {
        let idx = self.statuses.iter().position(|s| s.kind == kind)?;
        Some(self.statuses.remove(idx))
    }

    /// Statuses do not stack; reapplying keeps the stronger values.
    fn add_status(&mut self, status: Status) {
        match self.statuses.iter_mut().find(|s| s.kind == status.kind) {
            Some(existing) => {
                existing.turns = existing.turns.max(status.turns);
                existing.amount = existing.amount.max(status.amount);
            }
            None => self.statuses.push(status),
        }
    }

    fn hand_index(&self, card: DuelCard) -> Option<usize> {
        self.hand.iter().position(|c| *c == card)
    }
}

fn card_blocked(detail: impl Into<String>) -> DomainError {
    DomainError::conflict(ConflictKind::CardBlocked, detail)
}

/// `replace` must name at most `max` cards still in hand once the card at
/// `played` has left it.
fn check_replacements(
    hand: &[DuelCard],
    played: usize,
    replace: &[DuelCard],
    max: usize,
) -> Result<(), DomainError> {
    if replace.len() > max {
        return Err(DomainError::invalid_input(format!(
            "at most {max} cards can be replaced"
        )));
    }
    let mut rest = hand.to_vec();
    rest.remove(played);
    for card in replace {
        let pos = rest.iter().position(|c| c == card).ok_or_else(|| {
            DomainError::insufficient_resource(format!("{} is not in your hand", card.spec().name))
        })?;
        rest.remove(pos);
    }
    Ok(())
}

impl Game {
    pub fn duel_seat(&self, id: PlayerId) -> Option<&DuelSeat> {
        self.card_duel.iter().find(|s| s.player_id == id)
    }

    fn seat_index(&self, id: PlayerId) -> Result<usize, DomainError> {
        self.card_duel
            .iter()
            .position(|s| s.player_id == id)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("player {id} has no seat"))
            })
    }

    /// Set up a card duel in place of board and ordering: random seat order,
    /// fresh stats, and a shuffled deck with the first pick dealt per player.
    pub(crate) fn start_card_duel(&mut self) {
        self.tiles.clear();
        self.players.shuffle(&mut self.rng);
        for (idx, p) in self.players.iter_mut().enumerate() {
            p.turn_order = idx as u8;
            p.position = 0;
            p.coins = 0;
            p.hp = CARD_DUEL_START_HP;
            p.shield_points = 0;
            p.extra_rolls = 0;
            p.is_alive = true;
            p.cards.clear();
        }
        self.current_turn_index = 0;
        self.pending = None;
        self.status = GameStatus::Active;

        let ids: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        let seats: Vec<DuelSeat> = ids
            .into_iter()
            .map(|id| DuelSeat::new(id, &mut self.rng))
            .collect();
        self.card_duel = seats;

        self.push_log(
            LogKind::StartGame,
            None,
            "The card duel started. Pick your cards!".to_string(),
        );
        info!(game_id = self.id, players = self.players.len(), "card duel started");
    }

    fn ensure_card_duel(&self) -> Result<(), DomainError> {
        if self.mode != GameMode::CardDuel {
            return Err(DomainError::phase_mismatch("this game is not a card duel"));
        }
        if self.status != GameStatus::Active {
            return Err(DomainError::game_not_active(format!(
                "game is {}",
                self.status.as_str()
            )));
        }
        Ok(())
    }

    /// Refuse unless it is `player_id`'s turn and their hand is picked.
    fn ensure_duel_turn(&self, player_id: PlayerId) -> Result<usize, DomainError> {
        self.ensure_card_duel()?;
        if self.current_player_id() != Some(player_id) {
            return Err(DomainError::not_your_turn("it is not your turn"));
        }
        let idx = self.seat_index(player_id)?;
        let remaining = self.card_duel[idx].picks_remaining();
        if remaining > 0 {
            return Err(DomainError::phase_mismatch(format!(
                "pick your hand first ({remaining} picks left)"
            )));
        }
        Ok(idx)
    }

    /// Keep `card` from the viewer's pick options. The others go back into
    /// the deck and the next options are dealt until the hand is complete.
    /// Picks are simultaneous and do not depend on the turn.
    pub fn card_duel_pick(&mut self, player_id: PlayerId, card: DuelCard) -> Result<(), DomainError> {
        self.ensure_card_duel()?;
        let idx = self.seat_index(player_id)?;
        let seat = &mut self.card_duel[idx];
        if seat.picks_remaining() == 0 {
            return Err(DomainError::already_resolved("your hand is already picked"));
        }
        let pos = seat
            .pick_options
            .iter()
            .position(|c| *c == card)
            .ok_or_else(|| {
                DomainError::no_such_target(format!("{} is not on offer", card.spec().name))
            })?;

        seat.pick_options.remove(pos);
        seat.hand.push(card);
        let rest = std::mem::take(&mut seat.pick_options);
        seat.deck.extend(rest);
        seat.picks_done += 1;
        let remaining = seat.picks_remaining();
        if remaining > 0 {
            seat.deal_pick_options(&mut self.rng);
        }

        let name = self.username(player_id);
        self.push_log(
            LogKind::DuelCardPick,
            Some(player_id),
            format!("{name} picked a card"),
        );
        debug!(game_id = self.id, player_id, remaining, "duel card picked");
        Ok(())
    }

    /// Play `card` from hand. Hostile cards go at `target`, or at the only
    /// opponent left when no target is named. `replace` lists the hand
    /// cards a cycling card swaps out.
    pub fn card_duel_play(
        &mut self,
        player_id: PlayerId,
        card: DuelCard,
        target: Option<PlayerId>,
        replace: &[DuelCard],
    ) -> Result<(), DomainError> {
        let idx = self.ensure_duel_turn(player_id)?;
        let spec = card.spec();
        let seat = &self.card_duel[idx];
        let hand_pos = seat.hand_index(card).ok_or_else(|| {
            DomainError::insufficient_resource(format!("{} is not in your hand", spec.name))
        })?;
        if seat.status(StatusKind::Silence).is_some() {
            return Err(card_blocked("you are silenced this turn"));
        }
        let slot = card.slot();
        let used = match slot {
            PlaySlot::Action => {
                if seat.status(StatusKind::Stun).is_some() {
                    return Err(card_blocked("you are stunned and cannot play action cards"));
                }
                seat.turn_flags.action_used
            }
            PlaySlot::Bonus => seat.turn_flags.bonus_used,
        };
        if used {
            return Err(card_blocked(match slot {
                PlaySlot::Action => "you already played an action card this turn",
                PlaySlot::Bonus => "you already played a bonus card this turn",
            }));
        }
        if let DuelEffect::DiscardAndDraw(max) = spec.effect {
            check_replacements(&seat.hand, hand_pos, replace, max)?;
        }
        let target = if card.is_hostile() {
            Some(self.resolve_duel_target(player_id, target)?)
        } else {
            None
        };

        let seat = &mut self.card_duel[idx];
        seat.hand.remove(hand_pos);
        match slot {
            PlaySlot::Action => seat.turn_flags.action_used = true,
            PlaySlot::Bonus => seat.turn_flags.bonus_used = true,
        }
        seat.turn_flags.last_played = Some(card);

        let name = self.username(player_id);
        let message = match target {
            Some(t) => format!("{name} played {} on {}", spec.name, self.username(t)),
            None => format!("{name} played {}", spec.name),
        };
        self.push_log(LogKind::DuelCardPlay, Some(player_id), message);

        self.apply_duel_effect(idx, player_id, spec.effect, target, replace)?;
        self.card_duel[idx].discard.push(card);

        info!(game_id = self.id, player_id, card = ?card, target = ?target, "duel card played");
        self.settle_survivors();
        Ok(())
    }

    fn resolve_duel_target(
        &self,
        player_id: PlayerId,
        target: Option<PlayerId>,
    ) -> Result<PlayerId, DomainError> {
        match target {
            Some(t) if t == player_id => Err(DomainError::no_such_target(
                "you cannot target yourself with that card",
            )),
            Some(t) => {
                if self.alive_opponents(player_id).any(|p| p.id == t) {
                    Ok(t)
                } else {
                    Err(DomainError::no_such_target(format!(
                        "player {t} is not an opponent still in the game"
                    )))
                }
            }
            None => {
                let mut opponents = self.alive_opponents(player_id).map(|p| p.id);
                match (opponents.next(), opponents.next()) {
                    (Some(only), None) => Ok(only),
                    _ => Err(DomainError::no_such_target("choose a target")),
                }
            }
        }
    }

    fn apply_duel_effect(
        &mut self,
        idx: usize,
        player_id: PlayerId,
        effect: DuelEffect,
        target: Option<PlayerId>,
        replace: &[DuelCard],
    ) -> Result<(), DomainError> {
        match effect {
            DuelEffect::ApplyStatus(status) => {
                let holder = match target {
                    Some(t) => self.seat_index(t)?,
                    None => idx,
                };
                self.card_duel[holder].add_status(status);
            }
            DuelEffect::Shield(amount) => {
                self.require_player_mut(player_id)?.shield_points += amount;
            }
            DuelEffect::Cleanse => {
                self.card_duel[idx].statuses.retain(|s| !s.kind.is_negative());
            }
            DuelEffect::Heal { amount, then } => {
                self.duel_heal(idx, player_id, amount)?;
                if let Some(status) = then {
                    self.card_duel[idx].add_status(status);
                }
            }
            DuelEffect::HealAndShield { heal, shield } => {
                self.duel_heal(idx, player_id, heal)?;
                self.require_player_mut(player_id)?.shield_points += shield;
            }
            DuelEffect::Antidote { heal } => {
                self.card_duel[idx]
                    .statuses
                    .retain(|s| !matches!(s.kind, StatusKind::Poison | StatusKind::Burn));
                self.duel_heal(idx, player_id, heal)?;
            }
            DuelEffect::SwapShield => {
                let Some(t) = target else {
                    return Err(DomainError::no_such_target("choose a target"));
                };
                let mine = self.require_player_mut(player_id)?.shield_points;
                let theirs = std::mem::replace(&mut self.require_player_mut(t)?.shield_points, mine);
                self.require_player_mut(player_id)?.shield_points = theirs;
            }
            DuelEffect::Draw(n) => {
                let seat = &mut self.card_duel[idx];
                let drawn = seat.draw(n, &mut self.rng);
                seat.turn_flags.draws_this_turn += drawn as u32;
            }
            DuelEffect::DiscardAndDraw(_) => {
                let seat = &mut self.card_duel[idx];
                for card in replace {
                    let pos = seat.hand_index(*card).ok_or_else(|| {
                        DomainError::insufficient_resource(format!(
                            "{} is not in your hand",
                            card.spec().name
                        ))
                    })?;
                    let out = seat.hand.remove(pos);
                    seat.discard.push(out);
                }
                let drawn = seat.draw(replace.len(), &mut self.rng);
                seat.turn_flags.draws_this_turn += drawn as u32;
            }
            DuelEffect::Gamble {
                shield,
                self_damage,
            } => {
                if self.rng.random_bool(0.5) {
                    self.require_player_mut(player_id)?.shield_points += shield;
                } else {
                    let dmg = self.require_player_mut(player_id)?.take_damage(self_damage);
                    if dmg.eliminated {
                        self.record_elimination(player_id);
                    }
                }
            }
            DuelEffect::Damage { amount, then } => {
                let Some(t) = target else {
                    return Err(DomainError::no_such_target("choose a target"));
                };
                let eliminated = self.duel_attack(idx, player_id, t, amount)?;
                if let Some(status) = then.filter(|_| !eliminated) {
                    let holder = self.seat_index(t)?;
                    self.card_duel[holder].add_status(status);
                }
            }
        }
        Ok(())
    }

    /// Heal up to the starting hp, consuming any heal amplifier.
    fn duel_heal(&mut self, idx: usize, player_id: PlayerId, amount: u32) -> Result<(), DomainError> {
        let bonus = self.card_duel[idx]
            .take_status(StatusKind::AmplifyHeal)
            .map_or(0, |s| s.amount);
        let player = self.require_player_mut(player_id)?;
        player.hp = (player.hp + amount + bonus).min(CARD_DUEL_START_HP);
        Ok(())
    }

    /// Resolve an attack card's damage. Returns whether the target was
    /// eliminated.
    fn duel_attack(
        &mut self,
        idx: usize,
        attacker: PlayerId,
        target: PlayerId,
        base: u32,
    ) -> Result<bool, DomainError> {
        let t = self.seat_index(target)?;
        let mut damage = base + self.card_duel[idx].amount(StatusKind::BattleFocus);
        if let Some(weaken) = self.card_duel[idx].take_status(StatusKind::Weaken) {
            damage = damage.saturating_sub(weaken.amount);
        }
        if let Some(curse) = self.card_duel[idx].take_status(StatusKind::WeakenCurse) {
            damage = damage * 100u32.saturating_sub(curse.amount) / 100;
        }
        damage += self.card_duel[t].amount(StatusKind::Vulnerable);

        let hit = self.require_player_mut(target)?.take_damage(damage);
        debug!(game_id = self.id, attacker, target, damage, lost = hit.lost, "duel attack");
        if hit.eliminated {
            self.record_elimination(target);
        }

        if hit.absorbed + hit.lost > 0 {
            if let Some(counter) = self.card_duel[t].take_status(StatusKind::CounterStance) {
                let back = self.require_player_mut(attacker)?.take_damage(counter.amount);
                let (tname, aname) = (self.username(target), self.username(attacker));
                self.push_log(
                    LogKind::StatusTick,
                    Some(target),
                    format!("{tname} reflected {} damage to {aname}", back.absorbed + back.lost),
                );
                if back.eliminated {
                    self.record_elimination(attacker);
                }
            }
        }
        Ok(hit.eliminated)
    }

    /// End the current duel turn. Silence and stun expire with the turn of
    /// the player who held them; the next alive player then starts a turn,
    /// skipping anyone whose status ticks eliminate them.
    pub fn card_duel_end_turn(&mut self, player_id: PlayerId) -> Result<(), DomainError> {
        let idx = self.ensure_duel_turn(player_id)?;
        self.card_duel[idx]
            .statuses
            .retain(|s| !s.kind.ends_with_turn());

        loop {
            let next = self.advance_turn()?;
            if self.begin_duel_turn(next)? {
                break;
            }
            self.settle_survivors();
            if self.status != GameStatus::Active {
                break;
            }
        }
        Ok(())
    }

    /// Turn start for `player_id`: damage ticks, regen, countdowns, draw.
    /// Returns false if the ticks eliminated the player.
    fn begin_duel_turn(&mut self, player_id: PlayerId) -> Result<bool, DomainError> {
        let idx = self.seat_index(player_id)?;
        let name = self.username(player_id);
        let seat = &self.card_duel[idx];
        let ticks = seat.amount(StatusKind::Poison) + seat.amount(StatusKind::Burn);
        let regen = seat.amount(StatusKind::Regen);

        if ticks > 0 {
            // shields do not stop poison or burn
            let player = self.require_player_mut(player_id)?;
            let lost = ticks.min(player.hp);
            player.hp -= lost;
            let eliminated = player.is_alive && player.hp == 0;
            if eliminated {
                player.is_alive = false;
            }
            self.push_log(
                LogKind::StatusTick,
                Some(player_id),
                format!("{name} lost {lost} hp to poison and burn"),
            );
            if eliminated {
                self.record_elimination(player_id);
                return Ok(false);
            }
        }
        if regen > 0 {
            let player = self.require_player_mut(player_id)?;
            player.hp = (player.hp + regen).min(CARD_DUEL_START_HP);
            self.push_log(
                LogKind::StatusTick,
                Some(player_id),
                format!("{name} regenerated {regen} hp"),
            );
        }

        let seat = &mut self.card_duel[idx];
        for status in seat.statuses.iter_mut().filter(|s| s.kind.is_timed()) {
            status.turns = status.turns.saturating_sub(1);
        }
        seat.statuses.retain(|s| !s.kind.is_timed() || s.turns > 0);
        let focus = seat.take_status(StatusKind::Focus).map_or(0, |s| s.amount as usize);
        let drawn = seat.draw(CARD_DUEL_TURN_DRAW + focus, &mut self.rng);
        seat.turn_flags = TurnFlags {
            draws_this_turn: drawn as u32,
            ..TurnFlags::default()
        };
        Ok(true)
    }
}
