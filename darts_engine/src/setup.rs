//! Match setup: the options chosen before a match starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::IdGenerator;
use crate::game::{
    Action,
    constants::{MAX_NAME_LENGTH, MAX_PLAYERS, MIN_PLAYERS},
    entities::{
        CheckRule, GameConfig, GameMode, MatchFormat, PracticeConfig, Player, PlayerId,
        StartPoints, X01Config,
    },
};

/// Errors that keep a match from starting
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SetupError {
    #[error("need at least {min} players")]
    NotEnoughPlayers { min: usize },

    #[error("at most {max} players can play")]
    TooManyPlayers { max: usize },

    #[error("player {0} needs a name")]
    BlankName(usize),

    #[error("name of player {player} is longer than {max} characters")]
    NameTooLong { player: usize, max: usize },
}

/// Result type for setup operations
pub type SetupResult<T> = Result<T, SetupError>;

/// Options on the setup screen. Numeric fields may hold anything the
/// user typed; they are raised to at least one when the configuration
/// is built.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchSetup {
    pub mode: GameMode,
    pub player_names: Vec<String>,
    pub start_points: StartPoints,
    pub check_in: CheckRule,
    pub check_out: CheckRule,
    pub legs_per_set: u32,
    pub sets: u32,
    pub format: MatchFormat,
    pub random_order: bool,
}

impl Default for MatchSetup {
    fn default() -> Self {
        let x01 = X01Config::default();
        Self {
            mode: GameMode::X01,
            player_names: (1..=MIN_PLAYERS).map(default_name).collect(),
            start_points: x01.start_points,
            check_in: x01.check_in,
            check_out: x01.check_out,
            legs_per_set: x01.legs_per_set,
            sets: x01.sets,
            format: x01.format,
            random_order: x01.random_order,
        }
    }
}

/// Display name offered for the player in slot `n` (1-based).
#[must_use]
pub fn default_name(n: usize) -> String {
    format!("Player {n}")
}

impl MatchSetup {
    /// Validate setup
    pub fn validate(&self) -> SetupResult<()> {
        if self.player_names.len() < MIN_PLAYERS {
            return Err(SetupError::NotEnoughPlayers { min: MIN_PLAYERS });
        }

        if self.player_names.len() > MAX_PLAYERS {
            return Err(SetupError::TooManyPlayers { max: MAX_PLAYERS });
        }

        for (i, name) in self.player_names.iter().enumerate() {
            let name = name.trim();
            if name.is_empty() {
                return Err(SetupError::BlankName(i + 1));
            }
            if name.chars().count() > MAX_NAME_LENGTH {
                return Err(SetupError::NameTooLong {
                    player: i + 1,
                    max: MAX_NAME_LENGTH,
                });
            }
        }

        Ok(())
    }

    /// Adds a player with a default name. Returns false when all slots are taken.
    pub fn add_player(&mut self) -> bool {
        if self.player_names.len() >= MAX_PLAYERS {
            return false;
        }
        self.player_names
            .push(default_name(self.player_names.len() + 1));
        true
    }

    /// Removes the player at `index`, keeping at least two.
    pub fn remove_player(&mut self, index: usize) -> bool {
        if self.player_names.len() <= MIN_PLAYERS || index >= self.player_names.len() {
            return false;
        }
        self.player_names.remove(index);
        true
    }

    /// The match configuration these options describe.
    #[must_use]
    pub fn config(&self) -> GameConfig {
        match self.mode {
            GameMode::X01 => GameConfig::X01(X01Config {
                start_points: self.start_points,
                check_in: self.check_in,
                check_out: self.check_out,
                legs_per_set: self.legs_per_set.max(1),
                sets: self.sets.max(1),
                format: match self.format {
                    MatchFormat::FirstTo(n) => MatchFormat::FirstTo(n.max(1)),
                    MatchFormat::BestOf(n) => MatchFormat::BestOf(n.max(1)),
                },
                random_order: self.random_order,
            }),
            GameMode::Practice => GameConfig::Practice(PracticeConfig {
                random_order: self.random_order,
            }),
        }
    }

    /// Validates the setup and turns it into the action that starts the match.
    pub fn new_game(&self, ids: &mut dyn IdGenerator) -> SetupResult<Action> {
        self.validate()?;
        let players = self
            .player_names
            .iter()
            .map(|name| Player::new(PlayerId::from(ids.next_id()), name))
            .collect();
        Ok(Action::NewGame {
            config: self.config(),
            players,
        })
    }
}
