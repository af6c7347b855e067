use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{WorldError, WorldResult};

/// A location node with exits and contained objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Region tag, used for grouping and by narrative collaborators.
    #[serde(default)]
    pub region: String,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Shown instead of `description` when the room is dark and unlit.
    #[serde(default)]
    pub dark_description: Option<String>,
    /// Whether the room needs a light source to be seen.
    #[serde(default)]
    pub is_dark: bool,
    /// Whether the player has been here.
    #[serde(default)]
    pub visited: bool,
    /// Outbound exits, in display order.
    #[serde(default)]
    pub exits: Vec<Exit>,
    /// Ids of objects placed directly in this room.
    #[serde(default)]
    pub objects: Vec<String>,
    /// Progression layer; rooms above the engine's maximum are dropped.
    #[serde(default)]
    pub layer: u32,
}

impl Room {
    /// Create an empty room.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            region: String::new(),
            description: String::new(),
            dark_description: None,
            is_dark: false,
            visited: false,
            exits: Vec::new(),
            objects: Vec::new(),
            layer: 0,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the region tag.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Add an exit.
    pub fn with_exit(mut self, exit: Exit) -> Self {
        self.exits.push(exit);
        self
    }

    /// Mark the room dark, with an optional alternate description.
    pub fn dark(mut self, dark_description: Option<&str>) -> Self {
        self.is_dark = true;
        self.dark_description = dark_description.map(str::to_string);
        self
    }

    /// Find the exit leading in a direction.
    pub fn exit(&self, direction: Direction) -> Option<&Exit> {
        self.exits.iter().find(|e| e.direction == direction)
    }

    /// Find the exit leading in a direction, mutably.
    pub fn exit_mut(&mut self, direction: Direction) -> Option<&mut Exit> {
        self.exits.iter_mut().find(|e| e.direction == direction)
    }
}

/// A directed connection from one room to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exit {
    /// Direction of travel.
    pub direction: Direction,
    /// Destination room id.
    pub destination: String,
    /// Door object gating the exit.
    #[serde(default)]
    pub door: Option<String>,
    /// Whether the exit is currently impassable.
    #[serde(default)]
    pub blocked: bool,
    /// Shown when the player tries a blocked exit.
    #[serde(default)]
    pub blocked_message: Option<String>,
}

impl Exit {
    /// Create an open exit.
    pub fn new(direction: Direction, destination: impl Into<String>) -> Self {
        Self {
            direction,
            destination: destination.into(),
            door: None,
            blocked: false,
            blocked_message: None,
        }
    }

    /// Gate the exit behind a door object.
    pub fn with_door(mut self, door: impl Into<String>) -> Self {
        self.door = Some(door.into());
        self
    }

    /// Block the exit with a message.
    pub fn blocked(mut self, message: impl Into<String>) -> Self {
        self.blocked = true;
        self.blocked_message = Some(message.into());
        self
    }
}

/// Parse an exit key of the form `room:direction`.
///
/// The room part may itself contain colons; the direction is taken after the
/// last one.
pub fn parse_exit_key(key: &str) -> WorldResult<(&str, Direction)> {
    let (room, dir) = key
        .rsplit_once(':')
        .ok_or_else(|| WorldError::InvalidExitKey(key.to_string()))?;
    let direction =
        Direction::parse(dir).ok_or_else(|| WorldError::InvalidExitKey(key.to_string()))?;
    if room.is_empty() {
        return Err(WorldError::InvalidExitKey(key.to_string()));
    }
    Ok((room, direction))
}

/// Build the key [`parse_exit_key`] understands.
pub fn exit_key(room: &str, direction: Direction) -> String {
    format!("{room}:{direction}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_key_parsing() {
        let (room, dir) = parse_exit_key("clearing:east").unwrap();
        assert_eq!(room, "clearing");
        assert_eq!(dir, Direction::East);

        let (room, dir) = parse_exit_key("zone:a:north").unwrap();
        assert_eq!(room, "zone:a");
        assert_eq!(dir, Direction::North);
    }

    #[test]
    fn exit_key_rejects_garbage() {
        assert!(parse_exit_key("clearing").is_err());
        assert!(parse_exit_key("clearing:sideways").is_err());
        assert!(parse_exit_key(":east").is_err());
    }

    #[test]
    fn room_defaults_from_minimal_json() {
        let room: Room = serde_json::from_str(r#"{"id": "cell", "name": "Cell"}"#).unwrap();
        assert!(room.exits.is_empty());
        assert!(!room.is_dark);
        assert_eq!(room.layer, 0);
    }

    #[test]
    fn exit_lookup() {
        let room = Room::new("a", "A")
            .with_exit(Exit::new(Direction::North, "b"))
            .with_exit(Exit::new(Direction::East, "c").blocked("Thorns."));
        assert_eq!(room.exit(Direction::North).unwrap().destination, "b");
        assert!(room.exit(Direction::East).unwrap().blocked);
        assert!(room.exit(Direction::West).is_none());
    }
}
