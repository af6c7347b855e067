//! Read-only snapshot for narrative collaborators.

use serde::{Deserialize, Serialize};
use umbra_core::{NarrativeState, World};

use crate::player::SessionState;

/// The room the player is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// Room id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Region tag.
    pub region: String,
}

/// What a text generator needs to stay consistent with the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConstraints {
    /// Where the player is.
    pub current_room: RoomSummary,
    /// Narrative state.
    pub player_state: NarrativeState,
    /// Names of carried objects.
    pub inventory: Vec<String>,
    /// Hints of unsolved puzzles, in content order.
    pub unsolved_hints: Vec<String>,
    /// Commands executed so far.
    pub turn: u64,
}

impl AiConstraints {
    /// Build the snapshot.
    pub fn capture(world: &World, state: &SessionState) -> Self {
        let current_room = world.room(&state.current_room).map_or_else(
            || RoomSummary {
                id: state.current_room.clone(),
                name: String::new(),
                region: String::new(),
            },
            |room| RoomSummary {
                id: room.id.clone(),
                name: room.name.clone(),
                region: room.region.clone(),
            },
        );
        Self {
            current_room,
            player_state: state.player_state,
            inventory: state
                .inventory
                .iter()
                .filter_map(|id| world.object(id))
                .map(|o| o.name.clone())
                .collect(),
            unsolved_hints: world
                .puzzles()
                .iter()
                .filter(|p| !p.solved)
                .filter_map(|p| p.hint.clone())
                .collect(),
            turn: state.turn,
        }
    }
}
