//! Core types for Umbra: rooms, objects, puzzles, and the world store.
//!
//! This crate holds the data model the engine plays on. It knows nothing
//! about commands or sessions: you can build a [`World`] programmatically,
//! load one from a content directory, or use the embedded dataset.

/// World content loading, layer filtering, and validation.
pub mod content;
/// Exit directions.
pub mod direction;
/// Error types used throughout the crate.
pub mod error;
/// Player narrative states and the content rules driving them.
pub mod narrative;
/// Objects and their single placement.
pub mod object;
/// Puzzles, conditions, and solve effects.
pub mod puzzle;
/// Rooms and exits.
pub mod room;
/// Declarative `(object, verb)` side effects.
pub mod script;
/// Loosely typed values for flags and custom state.
pub mod value;
/// Canonical verbs and their aliases.
pub mod verb;
/// The mutable entity store.
pub mod world;

/// Re-export content types.
pub use content::WorldData;
/// Re-export direction type.
pub use direction::Direction;
/// Re-export error types.
pub use error::{WorldError, WorldResult};
/// Re-export narrative types.
pub use narrative::{DreamRule, NarrativeRules, NarrativeState, VoidRule};
/// Re-export object types.
pub use object::{GameObject, ObjectOverride, Placement};
/// Re-export puzzle types.
pub use puzzle::{Condition, ConditionKind, Effect, Puzzle};
/// Re-export room types.
pub use room::{Exit, Room, exit_key, parse_exit_key};
/// Re-export script type.
pub use script::ScriptRule;
/// Re-export value type.
pub use value::Value;
/// Re-export verb type.
pub use verb::Verb;
/// Re-export world store types.
pub use world::{MergeReport, World};
