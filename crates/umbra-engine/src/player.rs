//! Session state: the serializable progress of one play-through.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use umbra_core::{NarrativeState, ObjectOverride, Value};
use uuid::Uuid;

/// The player's progress.
///
/// Together with the static world content this is everything needed to
/// resume a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Identifies the play-through across saves.
    pub session_id: Uuid,
    /// Room the player is in.
    pub current_room: String,
    /// Room the player came from.
    #[serde(default)]
    pub previous_room: Option<String>,
    /// Carried object ids, in pickup order.
    #[serde(default)]
    pub inventory: Vec<String>,
    /// Worn object ids; always a subset of `inventory`.
    #[serde(default)]
    pub worn: Vec<String>,
    /// Narrative state.
    #[serde(default)]
    pub player_state: NarrativeState,
    /// State to return to when leaving the void.
    #[serde(default)]
    pub suspended_state: Option<NarrativeState>,
    /// Session flags set by puzzles, scripts, and events.
    #[serde(default)]
    pub flags: BTreeMap<String, Value>,
    /// Solved puzzle ids, in solve order.
    #[serde(default)]
    pub solved_puzzles: Vec<String>,
    /// Commands executed so far.
    #[serde(default)]
    pub turn: u64,
    /// Rooms entered at least once, in first-visit order.
    #[serde(default)]
    pub visited_rooms: Vec<String>,
    /// Mutable state of every object changed this session.
    #[serde(default)]
    pub object_states: BTreeMap<String, ObjectOverride>,
    /// Exit keys (`room:direction`) unblocked this session.
    #[serde(default)]
    pub opened_exits: Vec<String>,
}

impl SessionState {
    /// A fresh session starting in `room`.
    pub fn new(room: impl Into<String>) -> Self {
        let room = room.into();
        Self {
            session_id: Uuid::new_v4(),
            current_room: room.clone(),
            previous_room: None,
            inventory: Vec::new(),
            worn: Vec::new(),
            player_state: NarrativeState::Normal,
            suspended_state: None,
            flags: BTreeMap::new(),
            solved_puzzles: Vec::new(),
            turn: 0,
            visited_rooms: vec![room],
            object_states: BTreeMap::new(),
            opened_exits: Vec::new(),
        }
    }

    /// Whether the player carries an object.
    pub fn has_item(&self, id: &str) -> bool {
        self.inventory.iter().any(|i| i == id)
    }

    /// Whether the player wears an object.
    pub fn is_wearing(&self, id: &str) -> bool {
        self.worn.iter().any(|i| i == id)
    }

    /// Whether a puzzle is solved.
    pub fn is_solved(&self, puzzle: &str) -> bool {
        self.solved_puzzles.iter().any(|p| p == puzzle)
    }

    /// Get a flag value.
    pub fn flag(&self, key: &str) -> Option<&Value> {
        self.flags.get(key)
    }

    /// Whether a flag is set to a truthy value.
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.get(key).is_some_and(Value::is_truthy)
    }

    /// Set a flag value.
    pub fn set_flag(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.flags.insert(key.into(), value.into());
    }

    pub(crate) fn add_item(&mut self, id: &str) {
        if !self.has_item(id) {
            self.inventory.push(id.to_string());
        }
    }

    pub(crate) fn remove_item(&mut self, id: &str) {
        self.inventory.retain(|i| i != id);
        self.worn.retain(|i| i != id);
    }

    pub(crate) fn record_visit(&mut self, room: &str) {
        if !self.visited_rooms.iter().any(|r| r == room) {
            self.visited_rooms.push(room.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_in_room() {
        let state = SessionState::new("forest");
        assert_eq!(state.current_room, "forest");
        assert_eq!(state.visited_rooms, vec!["forest".to_string()]);
        assert_eq!(state.player_state, NarrativeState::Normal);
        assert_eq!(state.turn, 0);
    }

    #[test]
    fn inventory_helpers() {
        let mut state = SessionState::new("forest");
        state.add_item("lighter");
        state.add_item("lighter");
        state.worn.push("lighter".into());
        assert_eq!(state.inventory.len(), 1);
        assert!(state.is_wearing("lighter"));
        state.remove_item("lighter");
        assert!(!state.has_item("lighter"));
        assert!(state.worn.is_empty());
    }

    #[test]
    fn flags() {
        let mut state = SessionState::new("forest");
        state.set_flag("dreamed", true);
        state.set_flag("count", 0i64);
        assert!(state.has_flag("dreamed"));
        assert!(!state.has_flag("count"));
        assert!(!state.has_flag("missing"));
    }

    #[test]
    fn serializes_camel_case() {
        let state = SessionState::new("forest");
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("currentRoom").is_some());
        assert!(json.get("playerState").is_some());
        assert!(json.get("objectStates").is_some());
        assert!(json.get("solvedPuzzles").is_some());
    }
}
