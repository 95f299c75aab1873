//! Darts match engine - rules, match state and the action dispatcher.
//!
//! This module provides:
//! - Pure scoring rules (check-in, check-out, bust, value clamping)
//! - The match aggregate with its undo history and leg/set progression
//! - A dispatcher applying one action at a time

pub mod constants;
pub mod dispatcher;
pub mod entities;
pub mod errors;
pub mod functional;
pub mod state_machine;
pub mod undo;

pub use dispatcher::{Action, Dispatcher};
pub use errors::{MatchError, MatchResult};
pub use state_machine::{MatchState, ThrowStamp};
pub use undo::{Snapshot, UndoStack};
