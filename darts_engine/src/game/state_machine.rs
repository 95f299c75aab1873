//! The match aggregate and every transition it supports.
//!
//! Transitions consume the aggregate and hand back its successor, so a
//! caller never observes a half-applied dart.

use log::{debug, error, info};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{
    constants::MAX_UNDO_DEPTH,
    entities::{
        DartIndex, GameConfig, GameMode, ModeRules, Multiplier, Player, PlayerId, PlayerState,
        ThrowItem, X01Config,
    },
    errors::{MatchError, MatchResult},
    functional::{ThrowOutcome, classify_x01_throw},
    undo::{Snapshot, UndoStack},
};

/// Identity and time of a dart, issued by the caller before the dart
/// is resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThrowStamp {
    pub id: String,
    pub timestamp: i64,
}

impl ThrowStamp {
    pub fn new(id: &str, timestamp: i64) -> Self {
        Self {
            id: id.to_string(),
            timestamp,
        }
    }
}

/// Everything there is to know about the match in progress.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchState {
    pub config: GameConfig,
    pub players: Vec<Player>,
    pub player_state: BTreeMap<PlayerId, PlayerState>,
    pub current_player_index: usize,
    /// Who opened the current leg.
    pub starting_player_index: usize,
    pub darts_thrown: DartIndex,
    /// Multiplier selected for the next dart.
    pub multiplier: Multiplier,
    /// Resolved darts of the current leg, oldest first.
    pub history: Vec<ThrowItem>,
    pub undo_stack: UndoStack,
    pub is_finished: bool,
}

impl MatchState {
    /// Builds a fresh match. Players are shuffled with `rng` when the
    /// configuration asks for a random order.
    pub fn new<R: Rng + ?Sized>(config: GameConfig, players: Vec<Player>, rng: &mut R) -> Self {
        let mut players = players;
        if config.random_order() {
            players.shuffle(rng);
        }

        let start_points = config.start_points();
        let straight_in = config.straight_in();
        let player_state = players
            .iter()
            .map(|p| (p.id.clone(), PlayerState::fresh(start_points, straight_in)))
            .collect();

        info!(
            "New {} match with {} players: {}",
            config.mode(),
            players.len(),
            players
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self {
            config,
            players,
            player_state,
            current_player_index: 0,
            starting_player_index: 0,
            darts_thrown: DartIndex::First,
            multiplier: Multiplier::Single,
            history: Vec::new(),
            undo_stack: UndoStack::new(),
            is_finished: false,
        }
    }

    /// Checks the structural invariants of the aggregate. Used on
    /// anything that didn't come out of [`MatchState::new`], such as a
    /// restored save.
    pub fn validate(&self) -> MatchResult<()> {
        let mut seen = HashSet::with_capacity(self.players.len());
        for player in &self.players {
            if !seen.insert(&player.id) {
                return Err(MatchError::DuplicatePlayer(player.id.clone()));
            }
        }
        self.check_indices(self.current_player_index, self.starting_player_index)?;
        self.check_scoreboard(&self.player_state)?;
        self.check_history(&self.history)?;

        if self.undo_stack.len() > MAX_UNDO_DEPTH {
            return Err(MatchError::UndoOverflow(self.undo_stack.len()));
        }
        for snapshot in self.undo_stack.iter() {
            self.check_indices(
                snapshot.current_player_index,
                snapshot.starting_player_index,
            )?;
            self.check_scoreboard(&snapshot.player_state)?;
            self.check_history(&snapshot.history)?;
        }
        Ok(())
    }

    fn check_indices(&self, current: usize, starting: usize) -> MatchResult<()> {
        if self.players.is_empty() {
            return Ok(());
        }
        for index in [current, starting] {
            if index >= self.players.len() {
                return Err(MatchError::InvalidPlayerIndex(index));
            }
        }
        Ok(())
    }

    fn check_scoreboard(&self, scoreboard: &BTreeMap<PlayerId, PlayerState>) -> MatchResult<()> {
        match self.players.iter().find(|p| !scoreboard.contains_key(&p.id)) {
            Some(player) => Err(MatchError::UnknownPlayer(player.id.clone())),
            None => Ok(()),
        }
    }

    fn check_history(&self, history: &[ThrowItem]) -> MatchResult<()> {
        match history
            .iter()
            .find(|t| !self.players.iter().any(|p| p.id == t.player_id))
        {
            Some(item) => Err(MatchError::OrphanThrow(item.id.clone())),
            None => Ok(()),
        }
    }

    fn player_at(&self, index: usize) -> MatchResult<&Player> {
        self.players.get(index).ok_or_else(|| {
            error!(
                "Player index {index} out of bounds for {} players",
                self.players.len()
            );
            MatchError::InvalidPlayerIndex(index)
        })
    }

    fn state_of_mut(&mut self, id: &PlayerId) -> MatchResult<&mut PlayerState> {
        self.player_state.get_mut(id).ok_or_else(|| {
            error!("Missing player state for {id}");
            MatchError::UnknownPlayer(id.clone())
        })
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_player_index: self.current_player_index,
            starting_player_index: self.starting_player_index,
            darts_thrown: self.darts_thrown,
            multiplier: self.multiplier,
            player_state: self.player_state.clone(),
            history: self.history.clone(),
            is_finished: self.is_finished,
        }
    }

    fn push_undo(mut self) -> Self {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self
    }

    /// Restores the most recent snapshot. Does nothing when there is
    /// nothing to undo.
    #[must_use]
    pub fn undo(mut self) -> Self {
        let Some(top) = self.undo_stack.pop() else {
            return self;
        };
        self.current_player_index = top.current_player_index;
        self.starting_player_index = top.starting_player_index;
        self.darts_thrown = top.darts_thrown;
        self.multiplier = top.multiplier;
        self.player_state = top.player_state;
        self.history = top.history;
        self.is_finished = top.is_finished;
        self
    }

    /// Passes the turn to the next player, forfeiting any darts left.
    #[must_use]
    pub fn advance_turn(mut self) -> Self {
        if self.players.is_empty() {
            return self;
        }
        self.current_player_index = (self.current_player_index + 1) % self.players.len();
        self.darts_thrown = DartIndex::First;
        self.multiplier = Multiplier::Single;
        self
    }

    /// Selects the multiplier for the next dart. Selecting the active
    /// one again switches back to single.
    #[must_use]
    pub fn select_multiplier(mut self, selected: Multiplier) -> Self {
        self.multiplier = self.multiplier.toggle(selected);
        self
    }

    /// Resolves one dart for the current player.
    pub fn throw_dart(self, raw: i32, stamp: ThrowStamp) -> MatchResult<Self> {
        if self.is_finished || self.players.is_empty() {
            return Ok(self);
        }
        match &self.config {
            GameConfig::X01(cfg) => {
                let cfg = cfg.clone();
                self.throw_x01(&cfg, raw, stamp)
            }
            GameConfig::Practice(_) => self.throw_practice(raw, stamp),
        }
    }

    fn throw_x01(self, cfg: &X01Config, raw: i32, stamp: ThrowStamp) -> MatchResult<Self> {
        let value = cfg.clamp_value(raw);
        let player_id = self.player_at(self.current_player_index)?.id.clone();
        let before = self.player_state(&player_id)?.clone();
        let m = self.multiplier;

        let outcome = classify_x01_throw(
            before.remaining,
            before.has_checked_in,
            value,
            m,
            cfg.check_in,
            cfg.check_out,
        );
        let counts = match outcome {
            ThrowOutcome::Normal { counts, .. } => counts,
            ThrowOutcome::Checkout | ThrowOutcome::Bust => true,
        };
        let points = if counts {
            u32::from(value) * m.factor()
        } else {
            0
        };

        let mut next = self.push_undo();
        let item = ThrowItem {
            id: stamp.id,
            player_id: player_id.clone(),
            dart_index: next.darts_thrown,
            value,
            multiplier: m,
            points,
            timestamp: stamp.timestamp,
        };

        match outcome {
            ThrowOutcome::Checkout => {
                debug!("{player_id} checks out with {item}");
                next.history.push(item);
                let state = next.state_of_mut(&player_id)?;
                state.remaining = 0;
                state.has_checked_in = true;
                next.multiplier = Multiplier::Single;
                next.end_leg(cfg, &player_id)
            }
            ThrowOutcome::Bust => {
                debug!(
                    "{player_id} busts with {item} on {} remaining",
                    before.remaining
                );
                // Only this dart is taken back; earlier darts of the turn stand.
                Ok(next.undo().advance_turn())
            }
            ThrowOutcome::Normal { counts, remaining } => {
                debug!("{player_id} throws {item} ({points} points, {remaining} left)");
                next.history.push(item);
                let state = next.state_of_mut(&player_id)?;
                state.remaining = remaining;
                state.has_checked_in |= counts;
                next.multiplier = Multiplier::Single;
                Ok(next.finish_dart())
            }
        }
    }

    fn throw_practice(self, raw: i32, stamp: ThrowStamp) -> MatchResult<Self> {
        let value = self.config.clamp_value(raw);
        let player_id = self.player_at(self.current_player_index)?.id.clone();
        let m = self.multiplier;

        let mut next = self.push_undo();
        let item = ThrowItem {
            id: stamp.id,
            player_id,
            dart_index: next.darts_thrown,
            value,
            multiplier: m,
            points: u32::from(value) * m.factor(),
            timestamp: stamp.timestamp,
        };
        debug!("{} throws {item} in practice", item.player_id);
        next.history.push(item);
        next.multiplier = Multiplier::Single;
        Ok(next.finish_dart())
    }

    /// Moves to the next dart slot, or to the next player after the third dart.
    fn finish_dart(mut self) -> Self {
        match self.darts_thrown.next() {
            Some(slot) => {
                self.darts_thrown = slot;
                self
            }
            None => self.advance_turn(),
        }
    }

    /// Credits a leg to `winner` and either finishes the match or sets up
    /// the next leg.
    fn end_leg(mut self, cfg: &X01Config, winner: &PlayerId) -> MatchResult<Self> {
        let state = self.state_of_mut(winner)?;
        state.legs_won += 1;

        if cfg.plays_sets() && state.legs_won >= cfg.legs_per_set {
            state.legs_won = 0;
            state.sets_won += 1;
            info!("{winner} wins a set ({} sets)", state.sets_won);
            for (id, other) in self.player_state.iter_mut() {
                if id != winner {
                    other.legs_won = 0;
                }
            }
        } else {
            info!("{winner} wins a leg ({} legs)", state.legs_won);
        }

        let target = cfg.format.target();
        let state = self.player_state(winner)?;
        let won = if cfg.plays_sets() {
            state.sets_won
        } else {
            state.legs_won
        };

        if won >= target {
            info!("{winner} wins the match");
            self.is_finished = true;
            return Ok(self);
        }

        let next_starter = (self.starting_player_index + 1) % self.players.len();
        Ok(self.reset_leg(cfg, next_starter))
    }

    fn reset_leg(mut self, cfg: &X01Config, starter: usize) -> Self {
        let start_points = cfg.start_points();
        let straight_in = cfg.straight_in();
        for state in self.player_state.values_mut() {
            state.remaining = start_points;
            state.has_checked_in = straight_in;
        }
        self.current_player_index = starter;
        self.starting_player_index = starter;
        self.darts_thrown = DartIndex::First;
        self.multiplier = Multiplier::Single;
        self.history.clear();
        self.undo_stack.clear();
        self.is_finished = false;
        self
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> MatchResult<&Player> {
        self.player_at(self.current_player_index)
    }

    #[must_use]
    pub fn is_x01(&self) -> bool {
        matches!(self.config, GameConfig::X01(_))
    }

    pub fn x01_config(&self) -> MatchResult<&X01Config> {
        match &self.config {
            GameConfig::X01(cfg) => Ok(cfg),
            GameConfig::Practice(_) => Err(MatchError::WrongMode {
                expected: GameMode::X01,
            }),
        }
    }

    /// Wins needed to take the match; zero for practice.
    #[must_use]
    pub fn match_win_target(&self) -> u32 {
        match &self.config {
            GameConfig::X01(cfg) => cfg.format.target(),
            GameConfig::Practice(_) => 0,
        }
    }

    pub fn player_state(&self, id: &PlayerId) -> MatchResult<&PlayerState> {
        self.player_state.get(id).ok_or_else(|| {
            error!("Missing player state for {id}");
            MatchError::UnknownPlayer(id.clone())
        })
    }

    /// Darts `id` has thrown in the current leg.
    #[must_use]
    pub fn darts_thrown_by(&self, id: &PlayerId) -> usize {
        self.history.iter().filter(|t| &t.player_id == id).count()
    }

    /// Points `id` has scored in the current leg.
    #[must_use]
    pub fn points_scored_by(&self, id: &PlayerId) -> u32 {
        self.history
            .iter()
            .filter(|t| &t.player_id == id)
            .map(|t| t.points)
            .sum()
    }

    /// The match winner, once the match is over.
    #[must_use]
    pub fn winner(&self) -> Option<&Player> {
        if !self.is_finished {
            return None;
        }
        let GameConfig::X01(cfg) = &self.config else {
            return None;
        };
        let target = cfg.format.target();
        self.players.iter().find(|p| {
            self.player_state.get(&p.id).is_some_and(|s| {
                let won = if cfg.plays_sets() {
                    s.sets_won
                } else {
                    s.legs_won
                };
                won >= target
            })
        })
    }
}
