//! Save data: the session state plus a version stamp.
//!
//! Saves hold only mutable state. Restoring loads the static world fresh and
//! overlays the saved object states, solved puzzles, and opened exits, so
//! room and object text can change between releases without breaking saves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use umbra_core::{Placement, World};

use crate::error::{EngineError, EngineResult};
use crate::player::SessionState;

/// Current save format.
pub const SAVE_VERSION: u32 = 1;

/// A serialized session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    /// Save format version.
    pub version: u32,
    /// When the save was written.
    pub saved_at: DateTime<Utc>,
    /// The session.
    pub state: SessionState,
}

impl SaveGame {
    /// Wrap a session state, stamped now.
    pub fn new(state: SessionState) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            state,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and version-check a save blob.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let save: Self = serde_json::from_str(json)?;
        if save.version != SAVE_VERSION {
            return Err(EngineError::UnsupportedSaveVersion(save.version));
        }
        Ok(save)
    }
}

/// Overlay saved progress onto a freshly loaded world.
///
/// Unknown ids are logged and skipped; only a missing current room is fatal.
/// The inventory and worn lists are rebuilt from the restored placements.
pub(crate) fn restore(world: &mut World, state: &mut SessionState) -> EngineResult<()> {
    if world.room(&state.current_room).is_none() {
        return Err(EngineError::InvalidSave(format!(
            "unknown current room '{}'",
            state.current_room
        )));
    }

    let known: Vec<_> = state
        .object_states
        .iter()
        .filter(|(id, _)| {
            let exists = world.object(id).is_some();
            if !exists {
                tracing::warn!(object = %id, "save refers to an unknown object");
            }
            exists
        })
        .collect();

    // Lift everything out first so intermediate moves can't form a cycle.
    for (id, _) in &known {
        world.relocate(id, Placement::Nowhere)?;
    }
    for (id, saved) in &known {
        if let Err(e) = world.relocate(id, saved.placement.clone()) {
            tracing::warn!(object = %id, error = %e, "saved placement no longer valid");
        }
        if let Some(object) = world.object_mut(id) {
            saved.apply_flags(object);
        }
    }

    for id in &state.solved_puzzles {
        match world.puzzle_mut(id) {
            Some(puzzle) => puzzle.solved = true,
            None => tracing::warn!(puzzle = %id, "save refers to an unknown puzzle"),
        }
    }
    for key in &state.opened_exits {
        if let Err(e) = world.unblock_exit(key) {
            tracing::warn!(exit = %key, error = %e, "saved exit no longer exists");
        }
    }
    for room in &state.visited_rooms {
        world.visit(room);
    }
    reconcile_inventory(world, state);
    world.take_dirty();
    Ok(())
}

/// Make `inventory` and `worn` agree with the world, keeping saved order.
fn reconcile_inventory(world: &mut World, state: &mut SessionState) {
    let stray: Vec<String> = world
        .objects()
        .iter()
        .filter(|o| o.is_worn && !o.placement.is_carried())
        .map(|o| o.id.clone())
        .collect();
    for id in &stray {
        tracing::warn!(object = %id, "saved as worn but not carried");
        if let Some(object) = world.object_mut(id) {
            object.is_worn = false;
        }
    }

    let carried = |id: &str| world.object(id).is_some_and(|o| o.placement.is_carried());
    let mut inventory: Vec<String> = Vec::new();
    for id in &state.inventory {
        if !carried(id) {
            tracing::warn!(object = %id, "dropping inventory entry the world doesn't carry");
        } else if !inventory.contains(id) {
            inventory.push(id.clone());
        }
    }
    for object in world.objects().iter().filter(|o| o.placement.is_carried()) {
        if !inventory.contains(&object.id) {
            tracing::warn!(object = %object.id, "adding carried object missing from inventory");
            inventory.push(object.id.clone());
        }
    }

    let wearing = |id: &str| world.object(id).is_some_and(|o| o.is_worn);
    let mut worn: Vec<String> = Vec::new();
    for id in state.worn.iter().chain(&inventory) {
        if inventory.contains(id) && wearing(id) && !worn.contains(id) {
            worn.push(id.clone());
        }
    }

    state.inventory = inventory;
    state.worn = worn;
}
