//! Card-duel deck: every player starts with one copy of each card.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelCard {
    BattleFocus,
    IronSkin,
    PurifyAura,
    RegenBrew,
    Heal,
    Poison,
    Burn,
    Weaken,
    Vulnerable,
    Silence,
    Stun,
    Adrenaline,
    CardCycle,
    GuardSwap,
    QuickFix,
    WeakenCurse,
    Amplify,
    AntidoteKit,
    CounterStance,
    GambleCoin,
    LuckyDraw,
    VenomStrike,
    FlameJab,
    HolyLight,
    CripplingShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelCardCategory {
    PlusStatus,
    MinusStatus,
    Neutral,
    Bonus,
}

/// Which of the two per-turn plays a card uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaySlot {
    Action,
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// `amount` extra damage on attacks.
    BattleFocus,
    /// Heal `amount` at turn start.
    Regen,
    /// Lose `amount` hp at turn start.
    Poison,
    /// Lose `amount` hp at turn start.
    Burn,
    /// Next attack deals `amount` less.
    Weaken,
    /// Take `amount` extra damage from attacks.
    Vulnerable,
    /// No cards at all next turn.
    Silence,
    /// No action cards next turn.
    Stun,
    /// Draw `amount` extra cards next turn.
    Focus,
    /// Next attack deals half damage.
    WeakenCurse,
    /// Next heal restores `amount` more.
    AmplifyHeal,
    /// Reflect `amount` damage the next time an attack lands.
    CounterStance,
}

impl StatusKind {
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            StatusKind::Poison
                | StatusKind::Burn
                | StatusKind::Weaken
                | StatusKind::Vulnerable
                | StatusKind::Silence
                | StatusKind::Stun
                | StatusKind::WeakenCurse
        )
    }

    /// Counted down at the start of each of the holder's turns.
    pub fn is_timed(self) -> bool {
        matches!(
            self,
            StatusKind::BattleFocus
                | StatusKind::Regen
                | StatusKind::Poison
                | StatusKind::Burn
                | StatusKind::Vulnerable
        )
    }

    /// Lasts through the holder's next turn, then drops.
    pub fn ends_with_turn(self) -> bool {
        matches!(self, StatusKind::Silence | StatusKind::Stun)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: StatusKind,
    pub turns: u8,
    pub amount: u32,
}

const fn status(kind: StatusKind, turns: u8, amount: u32) -> Status {
    Status {
        kind,
        turns,
        amount,
    }
}

/// Lasts until consumed.
const UNTIL_USED: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelEffect {
    /// Put a status on the player (`hostile == false`) or the target.
    ApplyStatus(Status),
    Shield(u32),
    /// Remove every negative status from the player.
    Cleanse,
    Heal { amount: u32, then: Option<Status> },
    HealAndShield { heal: u32, shield: u32 },
    /// Remove poison and burn, then heal.
    Antidote { heal: u32 },
    SwapShield,
    Draw(usize),
    /// Replace up to this many other hand cards with fresh draws.
    DiscardAndDraw(usize),
    /// Even odds: gain `shield`, or take `self_damage`.
    Gamble { shield: u32, self_damage: u32 },
    Damage { amount: u32, then: Option<Status> },
}

#[derive(Debug, Clone, Copy)]
pub struct DuelCardSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub category: DuelCardCategory,
    pub effect: DuelEffect,
}

impl DuelCard {
    pub const ALL: [DuelCard; 25] = [
        DuelCard::BattleFocus,
        DuelCard::IronSkin,
        DuelCard::PurifyAura,
        DuelCard::RegenBrew,
        DuelCard::Heal,
        DuelCard::Poison,
        DuelCard::Burn,
        DuelCard::Weaken,
        DuelCard::Vulnerable,
        DuelCard::Silence,
        DuelCard::Stun,
        DuelCard::Adrenaline,
        DuelCard::CardCycle,
        DuelCard::GuardSwap,
        DuelCard::QuickFix,
        DuelCard::WeakenCurse,
        DuelCard::Amplify,
        DuelCard::AntidoteKit,
        DuelCard::CounterStance,
        DuelCard::GambleCoin,
        DuelCard::LuckyDraw,
        DuelCard::VenomStrike,
        DuelCard::FlameJab,
        DuelCard::HolyLight,
        DuelCard::CripplingShot,
    ];

    pub fn spec(self) -> DuelCardSpec {
        use DuelCardCategory::{Bonus, MinusStatus, Neutral, PlusStatus};
        use StatusKind as S;

        let (name, description, category, effect) = match self {
            DuelCard::BattleFocus => (
                "Battle Focus",
                "Gain Battle Focus: +2 damage for 2 turns.",
                PlusStatus,
                DuelEffect::ApplyStatus(status(S::BattleFocus, 2, 2)),
            ),
            DuelCard::IronSkin => ("Iron Skin", "Gain 6 shield.", PlusStatus, DuelEffect::Shield(6)),
            DuelCard::PurifyAura => (
                "Purify Aura",
                "Remove all negative effects from yourself.",
                PlusStatus,
                DuelEffect::Cleanse,
            ),
            DuelCard::RegenBrew => (
                "Regen Brew",
                "Gain Regen: heal 2 at the start of your next 2 turns.",
                PlusStatus,
                DuelEffect::ApplyStatus(status(S::Regen, 2, 2)),
            ),
            DuelCard::Heal => (
                "Heal",
                "Restore 5 HP.",
                PlusStatus,
                DuelEffect::Heal {
                    amount: 5,
                    then: None,
                },
            ),
            DuelCard::Poison => (
                "Poison",
                "Apply Poison: target takes 1 damage at the start of their next 3 turns.",
                MinusStatus,
                DuelEffect::ApplyStatus(status(S::Poison, 3, 1)),
            ),
            DuelCard::Burn => (
                "Burn",
                "Apply Burn: target takes 2 damage at the start of their next 2 turns.",
                MinusStatus,
                DuelEffect::ApplyStatus(status(S::Burn, 2, 2)),
            ),
            DuelCard::Weaken => (
                "Weaken",
                "Apply Weaken: target deals 2 less damage on their next attack card.",
                MinusStatus,
                DuelEffect::ApplyStatus(status(S::Weaken, UNTIL_USED, 2)),
            ),
            DuelCard::Vulnerable => (
                "Vulnerable",
                "Apply Vulnerable: target takes +1 damage for their next 2 turns.",
                MinusStatus,
                DuelEffect::ApplyStatus(status(S::Vulnerable, 2, 1)),
            ),
            DuelCard::Silence => (
                "Silence Seal",
                "Apply Silence: target cannot play any card on their next turn.",
                MinusStatus,
                DuelEffect::ApplyStatus(status(S::Silence, 1, 0)),
            ),
            DuelCard::Stun => (
                "Stun Shock",
                "Apply Stun: target cannot play an Action card on their next turn.",
                MinusStatus,
                DuelEffect::ApplyStatus(status(S::Stun, 1, 0)),
            ),
            DuelCard::Adrenaline => (
                "Adrenaline",
                "Draw +1 card next turn.",
                Neutral,
                DuelEffect::ApplyStatus(status(S::Focus, 1, 1)),
            ),
            DuelCard::CardCycle => (
                "Card Cycle",
                "Replace up to 2 cards in your hand.",
                Neutral,
                DuelEffect::DiscardAndDraw(2),
            ),
            DuelCard::GuardSwap => (
                "Guard Swap",
                "Swap shields between you and the enemy.",
                Neutral,
                DuelEffect::SwapShield,
            ),
            DuelCard::QuickFix => (
                "Quick Fix",
                "Heal 2 and gain 2 shield.",
                Neutral,
                DuelEffect::HealAndShield { heal: 2, shield: 2 },
            ),
            DuelCard::WeakenCurse => (
                "Weaken Curse",
                "Enemy deals 50% less damage (rounded down) on their next attack.",
                Neutral,
                DuelEffect::ApplyStatus(status(S::WeakenCurse, UNTIL_USED, 50)),
            ),
            DuelCard::Amplify => (
                "Amplify",
                "Your next heal restores +3 additional HP.",
                Bonus,
                DuelEffect::ApplyStatus(status(S::AmplifyHeal, UNTIL_USED, 3)),
            ),
            DuelCard::AntidoteKit => (
                "Antidote Kit",
                "Remove Poison and Burn effects, then heal 1 HP.",
                Bonus,
                DuelEffect::Antidote { heal: 1 },
            ),
            DuelCard::CounterStance => (
                "Counter Stance",
                "Reflect 3 damage once (the next time you take damage).",
                Bonus,
                DuelEffect::ApplyStatus(status(S::CounterStance, UNTIL_USED, 3)),
            ),
            DuelCard::GambleCoin => (
                "Gamble Coin",
                "50% chance to gain 8 shield, 50% chance to take 3 damage.",
                Bonus,
                DuelEffect::Gamble {
                    shield: 8,
                    self_damage: 3,
                },
            ),
            DuelCard::LuckyDraw => ("Lucky Draw", "Draw 2 cards.", Bonus, DuelEffect::Draw(2)),
            DuelCard::VenomStrike => (
                "Venom Strike",
                "Deal 3 damage and apply Poison (1 dmg for 3 turns).",
                Bonus,
                DuelEffect::Damage {
                    amount: 3,
                    then: Some(status(S::Poison, 3, 1)),
                },
            ),
            DuelCard::FlameJab => (
                "Flame Jab",
                "Deal 3 damage and apply Burn (2 dmg for 2 turns).",
                Bonus,
                DuelEffect::Damage {
                    amount: 3,
                    then: Some(status(S::Burn, 2, 2)),
                },
            ),
            DuelCard::HolyLight => (
                "Holy Light",
                "Heal 3 and gain Regen (heal 1 for 3 turns).",
                Bonus,
                DuelEffect::Heal {
                    amount: 3,
                    then: Some(status(S::Regen, 3, 1)),
                },
            ),
            DuelCard::CripplingShot => (
                "Crippling Shot",
                "Deal 4 damage and apply Weaken (-2 on next attack).",
                Bonus,
                DuelEffect::Damage {
                    amount: 4,
                    then: Some(status(S::Weaken, UNTIL_USED, 2)),
                },
            ),
        };
        DuelCardSpec {
            name,
            description,
            category,
            effect,
        }
    }

    pub fn category(self) -> DuelCardCategory {
        self.spec().category
    }

    pub fn slot(self) -> PlaySlot {
        match self.category() {
            DuelCardCategory::Bonus => PlaySlot::Bonus,
            _ => PlaySlot::Action,
        }
    }

    /// Whether the card is aimed at an opponent.
    pub fn is_hostile(self) -> bool {
        match self.spec().effect {
            DuelEffect::ApplyStatus(s) => s.kind.is_negative(),
            DuelEffect::SwapShield | DuelEffect::Damage { .. } => true,
            _ => false,
        }
    }
}
