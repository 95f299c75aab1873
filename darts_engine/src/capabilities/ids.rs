use chrono::Utc;
use log::{debug, warn};
use rand::{SeedableRng, rngs::StdRng};
use uuid::Uuid;

/// Issues ids for players and throws. Ids must not repeat within a session.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs. Needs a working OS random source.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-N` ids from a counter.
#[derive(Clone, Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: 0,
        }
    }

    /// Prefix built from the session start time, so separate sessions
    /// don't clash.
    #[must_use]
    pub fn for_session(started_millis: i64) -> Self {
        Self::new(&format!("id_{started_millis:x}"))
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("{}-{}", self.prefix, self.counter)
    }
}

/// Id source and match randomness, chosen together so they fall back
/// together.
pub struct Entropy {
    pub ids: Box<dyn IdGenerator>,
    pub rng: StdRng,
}

impl Entropy {
    /// Deterministic capabilities for hosts without an OS random source,
    /// derived from the session start time.
    #[must_use]
    pub fn fallback(started_millis: i64) -> Self {
        Self {
            ids: Box::new(SequentialIds::for_session(started_millis)),
            rng: StdRng::seed_from_u64(started_millis.unsigned_abs()),
        }
    }
}

/// Picks ids and randomness for this process: UUIDs and an OS-seeded rng
/// when the OS random source answers, [`Entropy::fallback`] otherwise.
#[must_use]
pub fn probe() -> Entropy {
    match StdRng::try_from_os_rng() {
        Ok(rng) => {
            debug!("Using random UUIDs for ids");
            Entropy {
                ids: Box::new(UuidIds),
                rng,
            }
        }
        Err(e) => {
            warn!("OS random source unavailable ({e}), falling back to sequential ids");
            Entropy::fallback(Utc::now().timestamp_millis())
        }
    }
}
