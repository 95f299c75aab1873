//! Fixed limits of the scoring engine.

/// Darts each player throws before the turn passes.
pub const DARTS_PER_TURN: u8 = 3;

/// Most recent snapshots kept on the undo stack.
pub const MAX_UNDO_DEPTH: usize = 50;

/// Value of the bullseye segment. A double bull scores twice this.
pub const BULL: u8 = 25;

/// Highest numbered segment on the board.
pub const MAX_SEGMENT: u8 = 20;

/// Players a match needs before it can start.
pub const MIN_PLAYERS: usize = 2;

/// Player slots offered by the setup screen.
pub const MAX_PLAYERS: usize = 8;

/// Longest accepted player name, in characters.
pub const MAX_NAME_LENGTH: usize = 24;
