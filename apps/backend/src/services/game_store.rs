//! In-memory store of authoritative game records.
//!
//! One `RwLock<Game>` per game id. Writers hold the game's lock for the whole
//! read-validate-commit cycle, so mutations of one game are serialized while
//! different games proceed independently.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{Game, GameId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

pub type GameSlot = Arc<RwLock<Game>>;

#[derive(Debug, Default)]
pub struct GameStore {
    games: DashMap<GameId, GameSlot>,
    /// Join code -> game id.
    codes: DashMap<String, GameId>,
    last_id: AtomicI64,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next game id.
    pub fn next_id(&self) -> GameId {
        self.last_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Add a new game. Fails if its join code is taken.
    pub fn insert(&self, game: Game) -> Result<GameSlot, DomainError> {
        let id = game.id;
        match self.codes.entry(game.code.clone()) {
            Entry::Occupied(_) => {
                return Err(DomainError::conflict(
                    ConflictKind::JoinCodeConflict,
                    format!("join code {} is already in use", game.code),
                ))
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        let slot = Arc::new(RwLock::new(game));
        self.games.insert(id, slot.clone());
        debug!(game_id = id, "game stored");
        Ok(slot)
    }

    pub fn get(&self, id: GameId) -> Result<GameSlot, DomainError> {
        self.games
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, format!("game {id} not found")))
    }

    pub fn contains(&self, id: GameId) -> bool {
        self.games.contains_key(&id)
    }

    /// Game id for an (already normalized) join code.
    pub fn id_for_code(&self, code: &str) -> Result<GameId, DomainError> {
        self.codes
            .get(code)
            .map(|entry| *entry.value())
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Game, format!("no game with code {code}"))
            })
    }

    /// Drop `game` from the store. Takes the game itself (usually through a
    /// held write guard) rather than locking its slot again.
    pub fn remove(&self, game: &Game) -> Option<GameSlot> {
        let (_, slot) = self.games.remove(&game.id)?;
        self.codes.remove(&game.code);
        debug!(game_id = game.id, "game removed");
        Some(slot)
    }

    /// Every stored game, in id order.
    pub fn all(&self) -> Vec<GameSlot> {
        let mut slots: Vec<(GameId, GameSlot)> = self
            .games
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        slots.sort_by_key(|(id, _)| *id);
        slots.into_iter().map(|(_, slot)| slot).collect()
    }
}
