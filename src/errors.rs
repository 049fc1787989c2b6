//! Classified errors returned by the core.
//!
//! Snapshot and illegal-move errors describe rejected caller input. History,
//! cache and search errors describe conditions the caller recovers from.
//! `CoreError` wraps all of them at the snapshot-level contracts and tells a
//! rejected request apart from an engine fault.

use thiserror::Error;

use crate::game_state::coral_types::{Color, PieceKind};
use crate::game_state::terminal_state::TerminalReason;
use crate::move_generation::move_generator::MoveGenerationError;

/// Malformed snapshot string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot must have {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid board layout: {0}")]
    InvalidBoard(String),

    #[error("invalid piece character '{0}' in board layout")]
    InvalidPiece(char),

    #[error("invalid side-to-move field: {0}")]
    InvalidSide(String),

    #[error("invalid {field}: {value}")]
    InvalidCounter { field: &'static str, value: String },

    #[error("invalid square in {field}: {reason}")]
    InvalidSquare { field: &'static str, reason: String },

    #[error("square {0} holds coral of both colors")]
    DuplicateCoral(String),

    #[error("{color} coral does not add up: {on_board} on board + {remaining} remaining != {expected}")]
    CoralAccounting {
        color: Color,
        on_board: u32,
        remaining: u32,
        expected: u32,
    },

    #[error("{color} must have exactly one whale, found {found}")]
    WhaleCount { color: Color, found: u32 },

    #[error("whale squares field '{0}' does not match the board")]
    WhaleSquareMismatch(String),

    #[error("crab on unreachable square {0}")]
    CrabOnBackRank(String),

    #[error("side not to move ({0}) is in check")]
    OpponentInCheck(Color),

    #[error("invalid resignation field: {0}")]
    InvalidResignation(String),

    #[error("invalid move history: {0}")]
    InvalidHistory(String),

    #[error("move history replays to {replayed}, not the stated position")]
    HistoryMismatch { replayed: String },
}

/// Move rejected against a specific state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMoveError {
    #[error("no piece on {square}")]
    NoPieceOnSquare { square: String },

    #[error("piece on {square} belongs to {owner}, but {to_move} is to move")]
    NotSideToMove {
        square: String,
        owner: Color,
        to_move: Color,
    },

    #[error("game is already over ({reason})")]
    GameOver { reason: TerminalReason },

    #[error("crab reaching {square} must name a promotion piece")]
    PromotionRequired { square: String },

    #[error("{kind:?} cannot be promoted to here")]
    InvalidPromotion { kind: PieceKind },

    #[error("{color} has no coral remaining")]
    CoralExhausted { color: Color },

    #[error("no coral on {square} to remove")]
    NoCoralToRemove { square: String },

    #[error("{kind:?} cannot place or remove coral")]
    CoralActionNotAllowed { kind: PieceKind },

    #[error("coral actions must target the destination square")]
    CoralSquareMismatch,

    #[error("coral cannot be placed on {square}")]
    CoralPlacementBlocked { square: String },

    #[error("move {notation} is not legal in this position")]
    NotLegal { notation: String },
}

/// Error returned by validated move application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    Illegal(#[from] IllegalMoveError),

    #[error(transparent)]
    Generation(#[from] MoveGenerationError),
}

/// Undo failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo: move history is empty")]
    EmptyHistory,

    #[error("cannot undo {requested} plies, history holds {available}")]
    NotEnoughHistory { requested: usize, available: usize },

    #[error("history replay failed: {0}")]
    ReplayFailed(String),
}

/// Evaluation table load/save failures.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("evaluation table version {found} does not match engine version {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("evaluation table I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("evaluation table is corrupt: {0}")]
    Corrupt(String),

    #[error("evaluation table serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Read/write/decode failure, as opposed to a version mismatch.
    pub fn is_persistence(&self) -> bool {
        !matches!(self, CacheError::VersionMismatch { .. })
    }
}

/// Search invocation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("max depth must be positive")]
    InvalidDepth,

    #[error("search requested for {requested} but {actual} is to move")]
    SideToMoveMismatch { requested: Color, actual: Color },

    #[error(transparent)]
    Generation(#[from] MoveGenerationError),
}

/// Umbrella error for the snapshot-level contracts in `engines::coral_core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Illegal(#[from] IllegalMoveError),

    #[error("invalid move notation: {0}")]
    InvalidNotation(String),

    #[error(transparent)]
    Generation(#[from] MoveGenerationError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl From<MoveError> for CoreError {
    fn from(value: MoveError) -> Self {
        match value {
            MoveError::Illegal(e) => CoreError::Illegal(e),
            MoveError::Generation(e) => CoreError::Generation(e),
        }
    }
}

impl CoreError {
    /// True when the request should be rejected back to the client rather than
    /// reported as an engine fault.
    pub fn is_client_error(&self) -> bool {
        match self {
            CoreError::Snapshot(_) | CoreError::Illegal(_) | CoreError::InvalidNotation(_) => true,
            CoreError::Search(SearchError::SideToMoveMismatch { .. })
            | CoreError::Search(SearchError::InvalidDepth) => true,
            CoreError::Generation(_) | CoreError::Search(SearchError::Generation(_)) => false,
        }
    }
}
