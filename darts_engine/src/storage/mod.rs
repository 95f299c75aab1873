//! Persistence of the active match between sessions.
//!
//! The engine never depends on storage succeeding. A store hands back
//! either a well-formed match or nothing, and swallows write failures
//! after logging them, so a full disk or a hand-edited save file can
//! never interrupt the match in memory.
//!
//! ## Example
//!
//! ```no_run
//! use darts_engine::storage::{JsonFileStore, MatchStore, PersistedMatch};
//!
//! let store = JsonFileStore::new("darts_scoreboard_v1.json");
//! if let Some(saved) = store.load() {
//!     println!("Resuming a {} match", saved.state.config.mode());
//!     store.save(&PersistedMatch::new(saved.state));
//! }
//! ```

pub mod errors;
pub mod models;
pub mod store;

pub use errors::{StorageError, StorageResult};
pub use models::{PersistedMatch, SchemaVersion};
pub use store::{DEFAULT_SAVE_FILE, JsonFileStore, MatchStore, MemoryStore};
