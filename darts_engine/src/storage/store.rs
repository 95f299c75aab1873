use log::{debug, warn};
use serde_json::Value;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use super::{
    errors::{StorageError, StorageResult},
    models::{PersistedMatch, SchemaVersion},
};

/// File name used when no save location is configured.
pub const DEFAULT_SAVE_FILE: &str = "darts_scoreboard_v1.json";

/// Somewhere to keep the active match between sessions.
///
/// None of these methods fail from the caller's point of view: a save
/// that can't be read is reported as absent, and writes that fail are
/// logged and dropped.
pub trait MatchStore {
    fn load(&self) -> Option<PersistedMatch>;

    fn save(&self, data: &PersistedMatch);

    fn clear(&self);

    fn has_saved(&self) -> bool {
        self.load().is_some()
    }
}

/// Keeps the match as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_FILE)
    }
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> StorageResult<Option<PersistedMatch>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&raw)?;
        let found = value.get("schema").and_then(Value::as_u64);
        if found != Some(u64::from(SchemaVersion::current())) {
            return Err(StorageError::SchemaMismatch { found });
        }

        let persisted: PersistedMatch = serde_json::from_value(value)?;
        persisted.state.validate()?;
        Ok(Some(persisted))
    }

    fn try_save(&self, data: &PersistedMatch) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(data)?;

        // Write aside and rename so a crash never leaves half a save behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn try_clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl MatchStore for JsonFileStore {
    fn load(&self) -> Option<PersistedMatch> {
        match self.try_load() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Ignoring saved match at {}: {e}", self.path.display());
                None
            }
        }
    }

    fn save(&self, data: &PersistedMatch) {
        match self.try_save(data) {
            Ok(()) => debug!("Saved match to {}", self.path.display()),
            Err(e) => warn!("Failed to save match to {}: {e}", self.path.display()),
        }
    }

    fn clear(&self) {
        if let Err(e) = self.try_clear() {
            warn!("Failed to clear saved match at {}: {e}", self.path.display());
        }
    }
}

/// Keeps the match in memory for the lifetime of the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<PersistedMatch>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryStore {
    fn load(&self) -> Option<PersistedMatch> {
        let slot = self.slot.lock().ok()?;
        slot.as_ref()
            .filter(|saved| saved.state.validate().is_ok())
            .cloned()
    }

    fn save(&self, data: &PersistedMatch) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(data.clone()),
            Err(e) => warn!("Failed to save match in memory: {e}"),
        }
    }

    fn clear(&self) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = None,
            Err(e) => warn!("Failed to clear match in memory: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::game::{
        MatchState,
        entities::{GameConfig, Player, PlayerId, X01Config},
    };

    fn state() -> MatchState {
        let mut rng = StdRng::seed_from_u64(9);
        MatchState::new(
            GameConfig::X01(X01Config::default()),
            vec![
                Player::new(PlayerId::new("a"), "Alice"),
                Player::new(PlayerId::new("b"), "Bob"),
            ],
            &mut rng,
        )
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(!store.has_saved());

        let saved = PersistedMatch::new(state());
        store.save(&saved);
        assert_eq!(store.load(), Some(saved));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_memory_store_hides_corrupted_match() {
        let store = MemoryStore::new();
        let mut broken = state();
        broken.current_player_index = 9;
        store.save(&PersistedMatch::new(broken));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let store = JsonFileStore::new("/nonexistent/dir/save.json");
        assert!(store.load().is_none());
        store.clear();
    }
}
