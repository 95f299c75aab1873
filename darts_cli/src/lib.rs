//! Internal modules for the darts scoreboard.
//!
//! This library provides command parsing, configuration, rendering and
//! the session loop used by the `darts` binary.

pub mod commands;
pub mod config;
pub mod render;
pub mod session;
