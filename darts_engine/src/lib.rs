//! # Darts Engine
//!
//! A turn-based scoring engine for darts, built as a pure state machine.
//!
//! A match is a single aggregate value, [`MatchState`]. The
//! [`Dispatcher`] takes the current aggregate and one [`Action`] and
//! returns the aggregate that replaces it. Nothing is mutated behind the
//! caller's back, which keeps undo and persistence trivial.
//!
//! ## Modes
//!
//! - **X01**: count down from 301, 501 or 701 with straight, double or
//!   master check-in and check-out, played over legs and optionally sets
//! - **Practice**: every dart is recorded, nothing is counted down
//!
//! ## Core Modules
//!
//! - [`game`]: rules, match aggregate, undo history and dispatcher
//! - [`capabilities`]: injected id and clock sources
//! - [`setup`]: validated match options from the setup screen
//! - [`storage`]: versioned persistence of the active match
//!
//! ## Example
//!
//! ```
//! use darts_engine::{Action, Dispatcher, MatchSetup};
//!
//! let mut dispatcher = Dispatcher::new();
//! let new_game = MatchSetup::default().new_game(dispatcher.ids_mut()).unwrap();
//!
//! let state = dispatcher.dispatch(None, new_game).unwrap();
//! let state = dispatcher.dispatch(state, Action::Throw { value: 20 }).unwrap();
//!
//! let state = state.unwrap();
//! assert_eq!(state.history.len(), 1);
//! ```

/// Injected id and clock sources.
pub mod capabilities;

/// Core match logic, aggregate and dispatcher.
pub mod game;
pub use game::{
    Action, Dispatcher, MatchError, MatchResult, MatchState, ThrowStamp,
    constants::{self, DARTS_PER_TURN, MAX_PLAYERS, MAX_UNDO_DEPTH},
    entities::{self, GameConfig, Multiplier, Player, PlayerId},
    functional,
};

/// Match options chosen before a match starts.
pub mod setup;
pub use setup::{MatchSetup, SetupError, SetupResult};

/// Persistence collaborator.
pub mod storage;
