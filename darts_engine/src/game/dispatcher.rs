//! Single entry point that maps `(match, action)` to the next match.

use log::debug;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    entities::{GameConfig, Multiplier, Player},
    errors::MatchResult,
    state_machine::{MatchState, ThrowStamp},
};
use crate::capabilities::{Clock, Entropy, IdGenerator, SystemClock, probe};

/// Everything a player can ask the scoreboard to do.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    NewGame {
        config: GameConfig,
        players: Vec<Player>,
    },
    /// Continue a match restored from storage, as-is.
    Resume { state: Box<MatchState> },
    /// Drop the active match and go back to setup.
    ResetToSetup,
    SetMultiplier { value: Multiplier },
    /// Throw a dart. Out-of-range values count as a miss.
    Throw { value: i32 },
    Undo,
    /// End the current turn early.
    NextPlayer,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewGame { config, players } => {
                write!(f, "new game ({config}, {} players)", players.len())
            }
            Self::Resume { .. } => write!(f, "resume"),
            Self::ResetToSetup => write!(f, "reset to setup"),
            Self::SetMultiplier { value } => write!(f, "set multiplier {value}"),
            Self::Throw { value } => write!(f, "throw {value}"),
            Self::Undo => write!(f, "undo"),
            Self::NextPlayer => write!(f, "next player"),
        }
    }
}

/// Owns the capabilities a match needs from the outside world (ids,
/// time, randomness) and applies actions one at a time.
pub struct Dispatcher {
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Probes the platform for ids and randomness, falling back to a
    /// deterministic source when the OS has none.
    #[must_use]
    pub fn new() -> Self {
        Self::from_entropy(probe(), Box::new(SystemClock))
    }

    pub fn from_entropy(entropy: Entropy, clock: Box<dyn Clock>) -> Self {
        Self::with_capabilities(entropy.ids, clock, entropy.rng)
    }

    pub fn with_capabilities(
        ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self { ids, clock, rng }
    }

    /// Applies `action` to the active match, if any, and returns what
    /// replaces it. `None` means no match is active.
    ///
    /// Errors only when the aggregate itself is corrupt.
    pub fn dispatch(
        &mut self,
        state: Option<MatchState>,
        action: Action,
    ) -> MatchResult<Option<MatchState>> {
        debug!("Dispatching {action}");
        let next = match action {
            Action::NewGame { config, players } => {
                Some(MatchState::new(config, players, &mut self.rng))
            }
            Action::Resume { state } => Some(*state),
            Action::ResetToSetup => None,
            Action::SetMultiplier { value } => {
                state.map(|s| if s.is_finished { s } else { s.select_multiplier(value) })
            }
            Action::Throw { value } => match state {
                Some(s) => {
                    let stamp = ThrowStamp {
                        id: self.ids.next_id(),
                        timestamp: self.clock.now_millis(),
                    };
                    Some(s.throw_dart(value, stamp)?)
                }
                None => None,
            },
            Action::Undo => state.map(MatchState::undo),
            Action::NextPlayer => {
                state.map(|s| if s.is_finished { s } else { s.advance_turn() })
            }
        };
        Ok(next)
    }

    /// The id source, for setup code that creates players.
    pub fn ids_mut(&mut self) -> &mut dyn IdGenerator {
        self.ids.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{FixedClock, SequentialIds};
    use crate::game::entities::{PlayerId, PracticeConfig, X01Config};
    use rand::SeedableRng;

    fn dispatcher() -> Dispatcher {
        Dispatcher::with_capabilities(
            Box::new(SequentialIds::new("t")),
            Box::new(FixedClock(1_000)),
            StdRng::seed_from_u64(3),
        )
    }

    fn players() -> Vec<Player> {
        vec![
            Player::new(PlayerId::new("a"), "Alice"),
            Player::new(PlayerId::new("b"), "Bob"),
        ]
    }

    fn new_game(d: &mut Dispatcher) -> Option<MatchState> {
        d.dispatch(
            None,
            Action::NewGame {
                config: GameConfig::X01(X01Config::default()),
                players: players(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_actions_without_match_are_noops() {
        let mut d = dispatcher();
        for action in [
            Action::SetMultiplier {
                value: Multiplier::Double,
            },
            Action::Throw { value: 20 },
            Action::Undo,
            Action::NextPlayer,
            Action::ResetToSetup,
        ] {
            assert_eq!(d.dispatch(None, action).unwrap(), None);
        }
    }

    #[test]
    fn test_throw_uses_injected_capabilities() {
        let mut d = dispatcher();
        let state = new_game(&mut d);
        let state = d.dispatch(state, Action::Throw { value: 20 }).unwrap().unwrap();

        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].id, "t-1");
        assert_eq!(state.history[0].timestamp, 1_000);
    }

    #[test]
    fn test_fallback_entropy_drives_matches() {
        let shuffled = |started| {
            let mut d = Dispatcher::from_entropy(Entropy::fallback(started), Box::new(FixedClock(0)));
            let players = (1..=6)
                .map(|n| Player::new(PlayerId::new(&n.to_string()), &format!("P{n}")))
                .collect();
            let config = GameConfig::X01(X01Config {
                random_order: true,
                ..X01Config::default()
            });
            let state = d.dispatch(None, Action::NewGame { config, players }).unwrap();
            let state = d.dispatch(state, Action::Throw { value: 20 }).unwrap().unwrap();
            assert_eq!(state.history[0].id, format!("id_{started:x}-1"));
            state.players
        };

        assert_eq!(shuffled(1_700_000_000_000), shuffled(1_700_000_000_000));
    }

    #[test]
    fn test_set_multiplier_toggles() {
        let mut d = dispatcher();
        let state = new_game(&mut d);
        let double = Action::SetMultiplier {
            value: Multiplier::Double,
        };
        let state = d.dispatch(state, double.clone()).unwrap();
        assert_eq!(state.as_ref().map(|s| s.multiplier), Some(Multiplier::Double));
        let state = d.dispatch(state, double).unwrap();
        assert_eq!(state.as_ref().map(|s| s.multiplier), Some(Multiplier::Single));
        let state = d
            .dispatch(
                state,
                Action::SetMultiplier {
                    value: Multiplier::Triple,
                },
            )
            .unwrap();
        assert_eq!(state.map(|s| s.multiplier), Some(Multiplier::Triple));
    }

    #[test]
    fn test_new_game_replaces_running_match() {
        let mut d = dispatcher();
        let mut state = new_game(&mut d);
        for _ in 0..4 {
            state = d.dispatch(state, Action::Throw { value: 19 }).unwrap();
        }
        let state = d
            .dispatch(
                state,
                Action::NewGame {
                    config: GameConfig::Practice(PracticeConfig::default()),
                    players: players(),
                },
            )
            .unwrap()
            .unwrap();

        assert!(!state.is_x01());
        assert_eq!(state.current_player_index, 0);
        assert!(state.history.is_empty());
        assert!(state.undo_stack.is_empty());
    }

    #[test]
    fn test_resume_and_reset() {
        let mut d = dispatcher();
        let saved = new_game(&mut d).unwrap();
        let resumed = d
            .dispatch(
                None,
                Action::Resume {
                    state: Box::new(saved.clone()),
                },
            )
            .unwrap();
        assert_eq!(resumed.as_ref(), Some(&saved));

        assert_eq!(d.dispatch(resumed, Action::ResetToSetup).unwrap(), None);
    }

    #[test]
    fn test_next_player() {
        let mut d = dispatcher();
        let state = new_game(&mut d);
        let state = d.dispatch(state, Action::NextPlayer).unwrap().unwrap();
        assert_eq!(state.current_player_index, 1);
    }

    #[test]
    fn test_action_json_shape() {
        let json = serde_json::to_value(Action::Throw { value: 20 }).unwrap();
        assert_eq!(json["type"], "THROW");
        assert_eq!(json["value"], 20);

        let json = serde_json::to_value(Action::SetMultiplier {
            value: Multiplier::Triple,
        })
        .unwrap();
        assert_eq!(json["type"], "SET_MULTIPLIER");
        assert_eq!(json["value"], 3);
    }
}
