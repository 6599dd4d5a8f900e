//! Error codes for the BlitzQuest backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the BlitzQuest backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Unknown username or wrong password
    UnauthorizedInvalidCredentials,
    /// Access denied
    Forbidden,
    /// User not found
    ForbiddenUserNotFound,
    /// Missing or mismatching CSRF token
    CsrfTokenMismatch,
    /// User is not a player in the game
    NotAMember,
    /// Only the host may perform this operation
    NotHost,
    /// Acting out of turn, or someone else's pending action
    NotYourTurn,

    // Request Validation
    /// Invalid game ID provided
    InvalidGameId,
    /// Invalid username
    InvalidUsername,
    /// Password too short or too long
    InvalidPassword,
    /// Target player or card does not exist or is not eligible
    NoSuchTarget,
    /// Not enough coins or cards
    InsufficientResource,
    /// Lobby does not have enough players to start
    NotEnoughPlayers,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// Player not found
    PlayerNotFound,
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Game State Conflicts
    /// A pending action already blocks the game
    ActionAlreadyPending,
    /// The action was already resolved
    AlreadyResolved,
    /// The game is not in a playable status
    GameNotActive,
    /// The lobby is full
    GameFull,
    /// The user already joined this game
    AlreadyJoined,
    /// The pending action is in a different phase
    PhaseMismatch,
    /// No alive players remain
    NoAlivePlayers,
    /// Join code already exists
    JoinCodeConflict,
    /// Another account already uses this username
    UsernameTaken,
    /// A status effect forbids playing the card now
    CardBlocked,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::UnauthorizedInvalidCredentials => "UNAUTHORIZED_INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::CsrfTokenMismatch => "CSRF_TOKEN_MISMATCH",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::NotHost => "NOT_HOST",
            Self::NotYourTurn => "NOT_YOUR_TURN",

            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::NoSuchTarget => "NO_SUCH_TARGET",
            Self::InsufficientResource => "INSUFFICIENT_RESOURCE",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::ActionAlreadyPending => "ACTION_ALREADY_PENDING",
            Self::AlreadyResolved => "ALREADY_RESOLVED",
            Self::GameNotActive => "GAME_NOT_ACTIVE",
            Self::GameFull => "GAME_FULL",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::NoAlivePlayers => "NO_ALIVE_PLAYERS",
            Self::JoinCodeConflict => "JOIN_CODE_CONFLICT",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::CardBlocked => "CARD_BLOCKED",
            Self::Conflict => "CONFLICT",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
