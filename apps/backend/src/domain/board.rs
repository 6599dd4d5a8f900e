//! Board generation.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::tiles::{Tile, TileKind};

/// Relative weights of the tile types drawn for the middle of the board.
const WEIGHTS: [(TileSlot, u32); 11] = [
    (TileSlot::Empty, 6),
    (TileSlot::Trap, 3),
    (TileSlot::Heal, 3),
    (TileSlot::Bonus, 3),
    (TileSlot::Question, 2),
    (TileSlot::Warp, 1),
    (TileSlot::MassWarp, 1),
    (TileSlot::Duel, 1),
    (TileSlot::Shop, 1),
    (TileSlot::Gun, 1),
    (TileSlot::Portal, 1),
];

const WARP_OFFSETS: [i16; 6] = [-3, -2, -1, 1, 2, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileSlot {
    Empty,
    Trap,
    Heal,
    Bonus,
    Question,
    Warp,
    MassWarp,
    Duel,
    Shop,
    Gun,
    Portal,
}

/// Random board of `length` tiles: start first, finish last, weighted tiles
/// in between. Portals are linked in pairs; an unpaired portal becomes empty.
pub fn generate_board<R: Rng + ?Sized>(rng: &mut R, length: u16) -> Vec<Tile> {
    let last = length.saturating_sub(1);
    let dist = match WeightedIndex::new(WEIGHTS.iter().map(|(_, w)| *w)) {
        Ok(dist) => dist,
        Err(_) => return pattern_board(length),
    };

    let mut kinds = Vec::with_capacity(length as usize);
    let mut portals = Vec::new();
    for position in 0..length {
        let kind = if position == 0 {
            TileKind::Start
        } else if position == last {
            TileKind::Finish
        } else {
            match WEIGHTS[dist.sample(rng)].0 {
                TileSlot::Empty => TileKind::Empty,
                TileSlot::Trap => TileKind::Trap {
                    damage: rng.random_range(1..=3),
                },
                TileSlot::Heal => TileKind::Heal {
                    amount: rng.random_range(1..=3),
                },
                TileSlot::Bonus => TileKind::Bonus {
                    coins: rng.random_range(1..=5),
                },
                TileSlot::Question => TileKind::Question {
                    reward: rng.random_range(1..=4),
                },
                TileSlot::Warp => TileKind::Warp {
                    offset: *WARP_OFFSETS.choose(rng).unwrap_or(&1),
                },
                TileSlot::MassWarp => TileKind::MassWarp {
                    target: rng.random_range(1..=last.saturating_sub(1).max(1)),
                },
                TileSlot::Duel => TileKind::Duel,
                TileSlot::Shop => TileKind::Shop {
                    level: rng.random_range(1..=3),
                },
                TileSlot::Gun => TileKind::Gun {
                    damage: rng.random_range(1..=2),
                },
                TileSlot::Portal => {
                    portals.push(position);
                    TileKind::Portal { target: position }
                }
            }
        };
        kinds.push(kind);
    }

    for pair in portals.chunks(2) {
        match *pair {
            [a, b] => {
                kinds[a as usize] = TileKind::Portal { target: b };
                kinds[b as usize] = TileKind::Portal { target: a };
            }
            [a] => kinds[a as usize] = TileKind::Empty,
            _ => {}
        }
    }

    kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| Tile::new(i as u16, kind))
        .collect()
}

/// Fixed repeating layout shown in the lobby before a game starts.
pub fn pattern_board(length: u16) -> Vec<Tile> {
    let last = length.saturating_sub(1);
    (0..length)
        .map(|position| {
            let kind = if position == 0 {
                TileKind::Start
            } else if position == last {
                TileKind::Finish
            } else {
                match position % 6 {
                    1 => TileKind::Bonus { coins: 2 },
                    2 => TileKind::Trap { damage: 1 },
                    3 => TileKind::Question { reward: 2 },
                    4 => TileKind::Heal { amount: 1 },
                    _ => TileKind::Empty,
                }
            };
            Tile::new(position, kind)
        })
        .collect()
}
