//! Match error types.

use thiserror::Error;

use super::entities::{GameMode, PlayerId};

/// Errors raised while reading or advancing a match.
///
/// Apart from [`MatchError::WrongMode`], every variant means the match
/// aggregate was built or restored incorrectly. Callers should treat
/// those as fatal rather than carry on with a broken match.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum MatchError {
    /// An accessor for one mode was used on a match of another mode
    #[error("match is not in {expected} mode")]
    WrongMode { expected: GameMode },

    /// A player has no scoreboard entry
    #[error("invalid match state: no player state for {0}")]
    UnknownPlayer(PlayerId),

    /// A turn pointer doesn't point at a player
    #[error("invalid match state: player index {0} out of bounds")]
    InvalidPlayerIndex(usize),

    /// A dart in the history belongs to nobody in the match
    #[error("invalid match state: throw {0} has no matching player")]
    OrphanThrow(String),

    /// The undo stack grew beyond its cap
    #[error("invalid match state: undo stack holds {0} snapshots")]
    UndoOverflow(usize),

    /// Two players share one id
    #[error("invalid match state: duplicate player id {0}")]
    DuplicatePlayer(PlayerId),
}

/// Result type for match operations
pub type MatchResult<T> = Result<T, MatchError>;
