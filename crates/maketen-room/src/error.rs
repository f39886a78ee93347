//! Error types for the room layer.

use maketen_game::{BoardError, ConflictError, ExprError};
use maketen_protocol::{PlayerId, RoomId};

use crate::state::RoomState;

/// Errors that can occur during room operations.
///
/// Three caller-facing categories:
/// - plain validation failures - the room is unchanged, retry with
///   corrected input;
/// - [`Conflict`](Self::Conflict) - the one retry-after-refetch category:
///   fetch a fresh board snapshot and resubmit;
/// - [`NotFound`](Self::NotFound) - terminal for the request.
///
/// [`Board`](Self::Board) indicates an internal bug (a matcher or conflict
/// detector handed the board an out-of-range cell) and should never reach
/// an end user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room is not accepting new players (closed flag, mid-game, full).
    #[error("room {0} is not accepting players")]
    Closed(RoomId),

    /// The player is already in the room.
    #[error("player {0} already joined room {1}")]
    AlreadyJoined(PlayerId, RoomId),

    /// The player is not a member of the room.
    #[error("player {0} not found in room {1}")]
    PlayerNotFound(PlayerId, RoomId),

    /// Only the first player to have joined may start the game.
    #[error("player {0} is not the first player and cannot start the game")]
    NotFirstPlayer(PlayerId),

    /// A state-machine edge outside the legal transition table.
    #[error("illegal room state transition {from} -> {to}")]
    IllegalTransition { from: RoomState, to: RoomState },

    /// The operation requires a different lifecycle state.
    #[error("room is {actual}, operation requires {expected}")]
    WrongState {
        expected: RoomState,
        actual: RoomState,
    },

    /// No board line/block carries the submitted digit multiset.
    #[error("no board line matches the submitted digits")]
    NoMatch,

    /// The expression failed to parse or evaluate.
    #[error("invalid expression: {0}")]
    InvalidExpression(#[from] ExprError),

    /// The submission was stale: cells it depends on changed after the
    /// submitted version. Refetch the board and retry.
    #[error("{0}")]
    Conflict(#[from] ConflictError),

    /// The expression evaluated to an integer other than 10.
    #[error("expression evaluates to {0}, not 10")]
    WrongResult(i64),

    /// The expression evaluated to a non-integer.
    #[error("expression does not evaluate to an integer")]
    NotInteger,

    /// The room has no board yet - an internal invariant violation.
    #[error("no game board available")]
    NoBoard,

    /// Internal board failure; indicates a bug upstream of the board.
    #[error("board error: {0}")]
    Board(#[from] BoardError),

    /// The room's command channel is closed or full.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}

impl RoomError {
    /// `true` for the conflict category, where the right response is to
    /// refetch the board and retry - as opposed to fixing the input.
    pub fn is_retryable_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
