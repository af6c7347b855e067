//! Interactive fiction engine for Umbra.
//!
//! Parses player commands, runs them against a session's private copy of the
//! world, and re-evaluates puzzles after every change. Content-specific
//! reactions come from the script table and puzzle effects in the world data,
//! not from the verb handlers.

/// Verb handlers and the command dispatcher.
pub mod actions;
/// Engine configuration.
pub mod config;
/// Read-only snapshot for narrative collaborators.
pub mod constraints;
mod context;
/// The engine façade.
pub mod engine;
/// Error types for the engine.
pub mod error;
/// Command parsing and object resolution.
pub mod parser;
/// Session state.
pub mod player;
mod puzzle;
/// Save data and restore.
pub mod save;

pub use actions::ActionResult;
pub use config::{ContentSource, EngineConfig};
pub use constraints::{AiConstraints, RoomSummary};
pub use engine::Engine;
pub use error::{ActionError, EngineError, EngineResult};
pub use parser::{Command, parse_command};
pub use player::SessionState;
pub use save::{SAVE_VERSION, SaveGame};
