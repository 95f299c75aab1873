//! Saved match envelope.

use serde::{Deserialize, Serialize};

use crate::game::MatchState;

/// Version of the save format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum SchemaVersion {
    #[default]
    V1,
}

impl SchemaVersion {
    /// Get the current schema version
    pub fn current() -> Self {
        SchemaVersion::V1
    }
}

impl TryFrom<u64> for SchemaVersion {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SchemaVersion::V1),
            other => Err(format!("unknown schema version {other}")),
        }
    }
}

impl From<SchemaVersion> for u64 {
    fn from(value: SchemaVersion) -> Self {
        match value {
            SchemaVersion::V1 => 1,
        }
    }
}

/// What gets written to storage: the match plus the format version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedMatch {
    pub schema: SchemaVersion,
    pub state: MatchState,
}

impl PersistedMatch {
    pub fn new(state: MatchState) -> Self {
        Self {
            schema: SchemaVersion::current(),
            state,
        }
    }
}
