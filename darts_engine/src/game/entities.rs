use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{constants::DARTS_PER_TURN, functional};

/// Opaque, unique identifier of a player. Issued by an
/// [`IdGenerator`](crate::capabilities::IdGenerator) at setup.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Dart value scaling factor: single, double or triple.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Multiplier {
    #[default]
    Single,
    Double,
    Triple,
}

impl Multiplier {
    #[must_use]
    pub const fn factor(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// Selecting the active multiplier again switches back to single.
    #[must_use]
    pub fn toggle(self, selected: Self) -> Self {
        if self == selected {
            Self::Single
        } else {
            selected
        }
    }
}

impl TryFrom<u8> for Multiplier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Single),
            2 => Ok(Self::Double),
            3 => Ok(Self::Triple),
            other => Err(format!("multiplier must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Multiplier> for u8 {
    fn from(value: Multiplier) -> Self {
        match value {
            Multiplier::Single => 1,
            Multiplier::Double => 2,
            Multiplier::Triple => 3,
        }
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Single => "S",
            Self::Double => "D",
            Self::Triple => "T",
        };
        write!(f, "{repr}")
    }
}

/// Position of a dart within the current turn.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DartIndex {
    #[default]
    First,
    Second,
    Third,
}

impl DartIndex {
    /// The following slot, or `None` once the turn's last dart is used.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::First => Some(Self::Second),
            Self::Second => Some(Self::Third),
            Self::Third => None,
        }
    }
}

impl TryFrom<u8> for DartIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::First),
            1 => Ok(Self::Second),
            2 => Ok(Self::Third),
            other => Err(format!(
                "dart index must be below {DARTS_PER_TURN}, got {other}"
            )),
        }
    }
}

impl From<DartIndex> for u8 {
    fn from(value: DartIndex) -> Self {
        match value {
            DartIndex::First => 0,
            DartIndex::Second => 1,
            DartIndex::Third => 2,
        }
    }
}

/// Multiplier a dart needs to open (check in) or close (check out) a leg.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckRule {
    /// Any dart.
    #[default]
    Straight,
    /// Doubles only.
    Double,
    /// Doubles or trebles.
    Master,
}

impl fmt::Display for CheckRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Straight => "straight",
            Self::Double => "double",
            Self::Master => "master",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum StartPoints {
    P301,
    #[default]
    P501,
    P701,
}

impl StartPoints {
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::P301 => 301,
            Self::P501 => 501,
            Self::P701 => 701,
        }
    }
}

impl TryFrom<u32> for StartPoints {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            301 => Ok(Self::P301),
            501 => Ok(Self::P501),
            701 => Ok(Self::P701),
            other => Err(format!("start points must be 301, 501 or 701, got {other}")),
        }
    }
}

impl From<StartPoints> for u32 {
    fn from(value: StartPoints) -> Self {
        value.points()
    }
}

impl fmt::Display for StartPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.points())
    }
}

/// Match length. Applies to sets when a match has more than one set,
/// otherwise to legs.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchFormat {
    FirstTo(u32),
    BestOf(u32),
}

impl MatchFormat {
    /// Wins needed to take the match.
    #[must_use]
    pub fn target(&self) -> u32 {
        functional::format_target(self)
    }
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self::FirstTo(3)
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstTo(n) => write!(f, "first to {n}"),
            Self::BestOf(n) => write!(f, "best of {n}"),
        }
    }
}

/// Per-mode behaviour shared by every configuration variant.
#[enum_dispatch]
pub trait ModeRules {
    /// Whether the Initializer shuffles the player order.
    fn random_order(&self) -> bool;

    /// Score every player starts a leg from; zero for modes without a countdown.
    fn start_points(&self) -> u32;

    /// Whether players count from their first dart without checking in.
    fn straight_in(&self) -> bool;

    /// Maps a raw keypad value into the mode's accepted dart domain.
    fn clamp_value(&self, raw: i32) -> u8;
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct X01Config {
    pub start_points: StartPoints,
    pub check_in: CheckRule,
    pub check_out: CheckRule,
    /// Legs needed to win a set.
    pub legs_per_set: u32,
    /// Sets in the match. A single set means the format counts legs.
    pub sets: u32,
    pub format: MatchFormat,
    pub random_order: bool,
}

impl Default for X01Config {
    fn default() -> Self {
        Self {
            start_points: StartPoints::default(),
            check_in: CheckRule::Straight,
            check_out: CheckRule::Double,
            legs_per_set: 3,
            sets: 1,
            format: MatchFormat::default(),
            random_order: false,
        }
    }
}

impl X01Config {
    #[must_use]
    pub fn plays_sets(&self) -> bool {
        self.sets > 1
    }
}

impl ModeRules for X01Config {
    fn random_order(&self) -> bool {
        self.random_order
    }

    fn start_points(&self) -> u32 {
        self.start_points.points()
    }

    fn straight_in(&self) -> bool {
        self.check_in == CheckRule::Straight
    }

    fn clamp_value(&self, raw: i32) -> u8 {
        functional::clamp_value(raw)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PracticeConfig {
    pub random_order: bool,
}

impl ModeRules for PracticeConfig {
    fn random_order(&self) -> bool {
        self.random_order
    }

    fn start_points(&self) -> u32 {
        0
    }

    fn straight_in(&self) -> bool {
        false
    }

    fn clamp_value(&self, raw: i32) -> u8 {
        functional::clamp_value(raw)
    }
}

/// Match configuration, fixed for the lifetime of a match.
#[enum_dispatch(ModeRules)]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "mode")]
pub enum GameConfig {
    #[serde(rename = "X01")]
    X01(X01Config),
    #[serde(rename = "PRACTICE")]
    Practice(PracticeConfig),
}

impl GameConfig {
    #[must_use]
    pub fn mode(&self) -> GameMode {
        match self {
            Self::X01(_) => GameMode::X01,
            Self::Practice(_) => GameMode::Practice,
        }
    }
}

impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X01(cfg) => {
                let domain = if cfg.plays_sets() { "Sets" } else { "Legs" };
                write!(
                    f,
                    "X01 • {} • {domain} ({}) • Legs/Set {}",
                    cfg.start_points, cfg.format, cfg.legs_per_set
                )
            }
            Self::Practice(_) => write!(f, "PRACTICE"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    X01,
    Practice,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::X01 => "X01",
            Self::Practice => "practice",
        };
        write!(f, "{repr}")
    }
}

/// Scoreboard line of a single player.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerState {
    /// Points left in the current leg. Always zero in practice.
    pub remaining: u32,
    pub legs_won: u32,
    pub sets_won: u32,
    pub has_checked_in: bool,
}

impl PlayerState {
    #[must_use]
    pub fn fresh(start_points: u32, straight_in: bool) -> Self {
        Self {
            remaining: start_points,
            legs_won: 0,
            sets_won: 0,
            has_checked_in: straight_in,
        }
    }
}

/// A resolved dart. The history of the current leg is an
/// append-only list of these.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ThrowItem {
    pub id: String,
    pub player_id: PlayerId,
    pub dart_index: DartIndex,
    /// 0, 1..=20 or 25.
    pub value: u8,
    pub multiplier: Multiplier,
    /// `value * multiplier`, or zero when the dart didn't count.
    pub points: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl fmt::Display for ThrowItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.value, self.multiplier) {
            (0, _) => write!(f, "miss"),
            (v, Multiplier::Single) => write!(f, "{v}"),
            (v, m) => write!(f, "{m}{v}"),
        }
    }
}
