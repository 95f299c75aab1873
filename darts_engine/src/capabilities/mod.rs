//! Capabilities the engine borrows from its host: unique ids, randomness
//! and wall-clock time.
//!
//! Both are injected into the [`Dispatcher`](crate::Dispatcher) once at
//! startup so that the state transitions themselves stay deterministic
//! under test.

pub mod clock;
pub mod ids;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{Entropy, IdGenerator, SequentialIds, UuidIds, probe};
