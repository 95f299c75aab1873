//! Scoreboard configuration.
//!
//! Consolidates command-line flags and environment variable reads into
//! a validated match setup and save location.

use darts_engine::{
    MatchSetup, SetupError,
    entities::{CheckRule, GameMode, MatchFormat, StartPoints},
    storage::DEFAULT_SAVE_FILE,
};
use pico_args::Arguments;
use std::{ffi::OsString, path::PathBuf};

/// Environment variable naming the save file.
pub const SAVE_PATH_VAR: &str = "DARTS_SAVE_PATH";

/// Environment variable with comma-separated player names.
pub const PLAYERS_VAR: &str = "DARTS_PLAYERS";

/// Complete scoreboard configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Options for every match started with `new`
    pub setup: MatchSetup,
    /// Where the active match is saved
    pub save_path: PathBuf,
    /// Start at setup even if a saved match exists
    pub fresh: bool,
}

impl CliConfig {
    /// Load configuration from the process arguments and environment
    ///
    /// # Errors
    ///
    /// Returns error if a flag can't be parsed or the resulting setup is invalid
    pub fn from_env(pargs: Arguments) -> Result<Self, ConfigError> {
        Self::load(pargs, |key| std::env::var(key).ok())
    }

    /// Load configuration from `pargs`, falling back to `env` for
    /// values not given as flags.
    ///
    /// # Errors
    ///
    /// Returns error if a flag can't be parsed, flags contradict each
    /// other, unknown arguments remain, or the resulting setup is invalid
    pub fn load<F>(mut pargs: Arguments, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = MatchSetup::default();

        let mode = pargs
            .opt_value_from_fn("--mode", parse_mode)?
            .unwrap_or(defaults.mode);
        let start_points = pargs
            .opt_value_from_fn("--points", parse_points)?
            .unwrap_or(defaults.start_points);
        let check_in = pargs
            .opt_value_from_fn("--check-in", parse_check_rule)?
            .unwrap_or(defaults.check_in);
        let check_out = pargs
            .opt_value_from_fn("--check-out", parse_check_rule)?
            .unwrap_or(defaults.check_out);
        let legs_per_set = pargs
            .opt_value_from_str("--legs")?
            .unwrap_or(defaults.legs_per_set);
        let sets = pargs.opt_value_from_str("--sets")?.unwrap_or(defaults.sets);

        let first_to: Option<u32> = pargs.opt_value_from_str("--first-to")?;
        let best_of: Option<u32> = pargs.opt_value_from_str("--best-of")?;
        let format = match (first_to, best_of) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingFormat),
            (Some(n), None) => MatchFormat::FirstTo(n),
            (None, Some(n)) => MatchFormat::BestOf(n),
            (None, None) => defaults.format,
        };

        let random_order = pargs.contains("--random");
        let fresh = pargs.contains("--fresh");

        let player_names = pargs
            .opt_value_from_str::<_, String>("--players")?
            .or_else(|| env(PLAYERS_VAR))
            .map(|list| split_names(&list))
            .unwrap_or(defaults.player_names);

        let save_path = pargs
            .opt_value_from_str::<_, PathBuf>("--save")?
            .or_else(|| env(SAVE_PATH_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_FILE));

        let rest = pargs.finish();
        if !rest.is_empty() {
            return Err(ConfigError::UnexpectedArguments(rest));
        }

        let setup = MatchSetup {
            mode,
            player_names,
            start_points,
            check_in,
            check_out,
            legs_per_set,
            sets,
            format,
            random_order,
        };
        setup.validate()?;

        Ok(Self {
            setup,
            save_path,
            fresh,
        })
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid arguments: {0}")]
    Args(#[from] pico_args::Error),

    #[error("Use either --first-to or --best-of, not both")]
    ConflictingFormat,

    #[error("Unexpected arguments: {0:?}")]
    UnexpectedArguments(Vec<OsString>),

    #[error("Invalid players: {0}")]
    Setup(#[from] SetupError),
}

fn split_names(list: &str) -> Vec<String> {
    list.split(',').map(|name| name.trim().to_string()).collect()
}

fn parse_mode(s: &str) -> Result<GameMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "x01" => Ok(GameMode::X01),
        "practice" => Ok(GameMode::Practice),
        _ => Err(format!("'{s}' is not a mode (x01, practice)")),
    }
}

fn parse_points(s: &str) -> Result<StartPoints, String> {
    s.parse::<u32>()
        .map_err(|e| e.to_string())
        .and_then(StartPoints::try_from)
}

fn parse_check_rule(s: &str) -> Result<CheckRule, String> {
    match s.to_ascii_lowercase().as_str() {
        "straight" => Ok(CheckRule::Straight),
        "double" => Ok(CheckRule::Double),
        "master" => Ok(CheckRule::Master),
        _ => Err(format!("'{s}' is not a check rule (straight, double, master)")),
    }
}
