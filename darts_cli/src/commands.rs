use darts_engine::{Multiplier, constants::BULL};
use std::{fmt, num::IntErrorKind};

/// In-game command reference shown by `help`.
pub const COMMANDS: &str = "\
DARTS:
  0-20, 25        Throw a dart with the selected multiplier (out-of-range is a miss)
  bull, miss      Same as 25 and 0
  s20 d20 t20     Select single/double/triple and throw in one go
  db              Double bull

TURN:
  d, double       Toggle double for the next dart
  t, triple       Toggle triple for the next dart
  u, undo         Take back the last dart
  n, next         End the turn early

MATCH:
  new             Start a new match with the configured players
  resume          Continue the saved match
  setup           Leave the match (the save is kept)
  clear           Delete the saved match
  help            Show this help
  q, quit         Exit
";

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A dart shorthand whose number can't be read.
    InvalidDart(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDart(value) => write!(
                f,
                "Invalid dart '{value}'. Use a number such as '20', 't20' or 'd25'"
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// A line of scoreboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Throw a dart. `multiplier` is set first when given, otherwise
    /// whatever is selected applies.
    Throw {
        value: i32,
        multiplier: Option<Multiplier>,
    },
    ToggleMultiplier(Multiplier),
    Undo,
    NextPlayer,
    NewMatch,
    Resume,
    Setup,
    ClearSave,
    Help,
    Quit,
}

/// Parse a line of input into a [`Command`]. Matching ignores case and
/// surrounding whitespace.
///
/// # Examples
///
/// ```
/// use darts_cli::commands::{Command, parse_command};
/// use darts_engine::Multiplier;
///
/// assert_eq!(parse_command("u"), Ok(Command::Undo));
/// assert_eq!(
///     parse_command("T20"),
///     Ok(Command::Throw { value: 20, multiplier: Some(Multiplier::Triple) })
/// );
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let lowered = input.trim().to_ascii_lowercase();
    let trimmed = lowered.as_str();

    let command = match trimmed {
        "d" | "double" => Command::ToggleMultiplier(Multiplier::Double),
        "t" | "triple" => Command::ToggleMultiplier(Multiplier::Triple),
        "u" | "undo" => Command::Undo,
        "n" | "next" => Command::NextPlayer,
        "new" => Command::NewMatch,
        "resume" => Command::Resume,
        "setup" => Command::Setup,
        "clear" => Command::ClearSave,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "bull" => throw(i32::from(BULL), None),
        "miss" => throw(0, None),
        "db" => throw(i32::from(BULL), Some(Multiplier::Double)),
        _ => return parse_dart(trimmed),
    };
    Ok(command)
}

fn throw(value: i32, multiplier: Option<Multiplier>) -> Command {
    Command::Throw { value, multiplier }
}

/// Parse a plain number or an `s`/`d`/`t` prefixed one.
fn parse_dart(input: &str) -> Result<Command, ParseError> {
    let (multiplier, rest) = [
        ('s', Multiplier::Single),
        ('d', Multiplier::Double),
        ('t', Multiplier::Triple),
    ]
    .into_iter()
    .find_map(|(prefix, m)| input.strip_prefix(prefix).map(|rest| (Some(m), rest)))
    .unwrap_or((None, input));

    if multiplier.is_some() && rest == "bull" {
        return Ok(throw(i32::from(BULL), multiplier));
    }

    let numeric = rest
        .trim_start_matches('-')
        .starts_with(|c: char| c.is_ascii_digit());
    if !numeric {
        return Err(ParseError::UnrecognizedCommand(input.to_string()));
    }

    // Out-of-range numbers saturate; the engine clamps them to a miss.
    let value = match rest.parse::<i32>() {
        Ok(value) => value,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i32::MAX,
            IntErrorKind::NegOverflow => i32::MIN,
            _ => return Err(ParseError::InvalidDart(input.to_string())),
        },
    };
    Ok(throw(value, multiplier))
}
