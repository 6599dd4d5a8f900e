//! Domain-level error type used across the game engine and services.
//!
//! This error type is HTTP-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Input or business rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    NoSuchTarget,
    InsufficientResource,
    NotEnoughPlayers,
    InvalidUsername,
    InvalidPassword,
    InvalidInput,
}

/// Game state conflicts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    ActionAlreadyPending,
    AlreadyResolved,
    GameNotActive,
    GameFull,
    AlreadyJoined,
    PhaseMismatch,
    NoAlivePlayers,
    JoinCodeConflict,
    UsernameTaken,
    CardBlocked,
}

/// Caller is known but may not perform the action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForbiddenKind {
    NotYourTurn,
    NotAMember,
    NotHost,
}

/// Domain-level not found entities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Player,
    User,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict with the current game state
    Conflict(ConflictKind, String),
    /// Caller may not act
    Forbidden(ForbiddenKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::Forbidden(kind, d) => write!(f, "forbidden {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn forbidden(kind: ForbiddenKind, detail: impl Into<String>) -> Self {
        Self::Forbidden(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn not_your_turn(detail: impl Into<String>) -> Self {
        Self::forbidden(ForbiddenKind::NotYourTurn, detail)
    }
    pub fn action_already_pending(detail: impl Into<String>) -> Self {
        Self::conflict(ConflictKind::ActionAlreadyPending, detail)
    }
    pub fn no_such_target(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::NoSuchTarget, detail)
    }
    pub fn insufficient_resource(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::InsufficientResource, detail)
    }
    pub fn already_resolved(detail: impl Into<String>) -> Self {
        Self::conflict(ConflictKind::AlreadyResolved, detail)
    }
    pub fn game_not_active(detail: impl Into<String>) -> Self {
        Self::conflict(ConflictKind::GameNotActive, detail)
    }
    pub fn phase_mismatch(detail: impl Into<String>) -> Self {
        Self::conflict(ConflictKind::PhaseMismatch, detail)
    }
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::InvalidInput, detail)
    }

    /// True for `AlreadyResolved`, i.e. a duplicate submission. The game flow
    /// logs these at a lower level than other rejections.
    pub fn is_already_resolved(&self) -> bool {
        matches!(self, DomainError::Conflict(ConflictKind::AlreadyResolved, _))
    }
}
