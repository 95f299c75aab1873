//! Bounded snapshot history backing the undo action.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use super::{
    constants::MAX_UNDO_DEPTH,
    entities::{DartIndex, Multiplier, PlayerId, PlayerState, ThrowItem},
};

/// The restorable part of a match: turn pointers, scores, history and
/// the finished flag. Configuration and the player list never change
/// mid-match, so they are not captured.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub current_player_index: usize,
    pub starting_player_index: usize,
    pub darts_thrown: DartIndex,
    pub multiplier: Multiplier,
    pub player_state: BTreeMap<PlayerId, PlayerState>,
    pub history: Vec<ThrowItem>,
    pub is_finished: bool,
}

/// Most-recent-first stack of snapshots, capped at [`MAX_UNDO_DEPTH`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UndoStack(VecDeque<Snapshot>);

impl UndoStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `snapshot` on top, dropping the oldest entries beyond the cap.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.0.push_front(snapshot);
        self.0.truncate(MAX_UNDO_DEPTH);
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.0.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.0.iter()
    }
}
