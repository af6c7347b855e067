//! World content: the immutable template a session is built from.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};
use crate::narrative::NarrativeRules;
use crate::object::{GameObject, Placement};
use crate::puzzle::Puzzle;
use crate::room::Room;
use crate::script::ScriptRule;

/// The built-in dataset, used when no content directory is configured or the
/// configured one cannot be loaded.
const EMBEDDED_WORLD: &str = include_str!("../data/world.json");

/// Static definitions of rooms, objects, puzzles, and scripts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldData {
    /// Start room and narrative transitions.
    #[serde(default)]
    pub rules: NarrativeRules,
    /// Room definitions.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Object definitions.
    #[serde(default)]
    pub objects: Vec<GameObject>,
    /// Puzzle definitions, in evaluation order.
    #[serde(default)]
    pub puzzles: Vec<Puzzle>,
    /// `(object, verb)` side-effect table.
    #[serde(default)]
    pub scripts: Vec<ScriptRule>,
}

impl WorldData {
    /// Parse and validate the embedded dataset.
    pub fn embedded() -> WorldResult<Self> {
        let data: Self =
            serde_json::from_str(EMBEDDED_WORLD).map_err(|source| WorldError::Parse {
                path: PathBuf::from("<embedded>/world.json"),
                source,
            })?;
        data.validate()?;
        Ok(data)
    }

    /// Load content from a directory.
    ///
    /// `rooms.json`, `objects.json` and `puzzles.json` are required and must
    /// be non-empty; `scripts.json` and `rules.json` are optional. Without a
    /// start room in `rules.json`, the first room is used.
    pub fn from_dir(dir: &Path) -> WorldResult<Self> {
        let rooms: Vec<Room> = read_section(&dir.join("rooms.json"))?;
        let objects: Vec<GameObject> = read_section(&dir.join("objects.json"))?;
        let puzzles: Vec<Puzzle> = read_section(&dir.join("puzzles.json"))?;
        if rooms.is_empty() || objects.is_empty() || puzzles.is_empty() {
            return Err(WorldError::EmptyContent(dir.to_path_buf()));
        }

        let scripts = read_optional_section(&dir.join("scripts.json"))?.unwrap_or_default();
        let mut rules: NarrativeRules =
            read_optional_section(&dir.join("rules.json"))?.unwrap_or_default();
        if rules.start_room.is_empty() {
            rules.start_room = rooms[0].id.clone();
        }

        let data = Self {
            rules,
            rooms,
            objects,
            puzzles,
            scripts,
        };
        data.validate()?;
        tracing::info!(
            dir = %dir.display(),
            rooms = data.rooms.len(),
            objects = data.objects.len(),
            puzzles = data.puzzles.len(),
            "loaded world content"
        );
        Ok(data)
    }

    /// Whether there is nothing to play.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Drop rooms and puzzles above `max_layer`, together with exits into
    /// dropped rooms, objects placed in them, and scripts on dropped objects.
    pub fn filter_layer(mut self, max_layer: u32) -> Self {
        self.rooms.retain(|r| r.layer <= max_layer);
        let kept_rooms: HashSet<String> = self.rooms.iter().map(|r| r.id.clone()).collect();

        let by_id: HashMap<&str, &GameObject> =
            self.objects.iter().map(|o| (o.id.as_str(), o)).collect();
        let kept_objects: HashSet<String> = self
            .objects
            .iter()
            .filter(|o| match root_room(&by_id, o) {
                RootPlacement::Room(room) => kept_rooms.contains(room),
                RootPlacement::Player => true,
                RootPlacement::Lost => false,
            })
            .map(|o| o.id.clone())
            .collect();

        self.objects.retain(|o| kept_objects.contains(&o.id));
        for room in &mut self.rooms {
            room.exits.retain(|e| kept_rooms.contains(&e.destination));
            room.objects.retain(|id| kept_objects.contains(id));
        }
        self.puzzles.retain(|p| p.layer <= max_layer);
        self.scripts.retain(|s| kept_objects.contains(&s.object));

        if let Some(dream) = &self.rules.dream
            && !(kept_rooms.contains(&dream.waking_room)
                && kept_rooms.contains(&dream.dreaming_room))
        {
            self.rules.dream = None;
        }
        if let Some(void) = &self.rules.void
            && !(kept_rooms.contains(&void.room) && kept_objects.contains(&void.object))
        {
            self.rules.void = None;
        }
        self
    }

    /// Check referential integrity.
    ///
    /// Duplicate ids, a missing start room, placements naming missing rooms or
    /// containers, and containment cycles are errors. Dangling exits, doors,
    /// prerequisites, and script targets are only logged: dynamic content may
    /// fill them in later.
    pub fn validate(&self) -> WorldResult<()> {
        let rooms = unique_ids("room", self.rooms.iter().map(|r| r.id.as_str()))?;
        let objects = unique_ids("object", self.objects.iter().map(|o| o.id.as_str()))?;
        let puzzles = unique_ids("puzzle", self.puzzles.iter().map(|p| p.id.as_str()))?;

        if !self.rooms.is_empty() && !rooms.contains(self.rules.start_room.as_str()) {
            return Err(WorldError::UnknownRoom(self.rules.start_room.clone()));
        }

        for object in &self.objects {
            match &object.placement {
                Placement::Room(room) if !rooms.contains(room.as_str()) => {
                    return Err(WorldError::UnknownRoom(room.clone()));
                }
                Placement::Container(container) if !objects.contains(container.as_str()) => {
                    return Err(WorldError::UnknownObject(container.clone()));
                }
                _ => {}
            }
        }
        self.check_containment_acyclic()?;

        for room in &self.rooms {
            for listed in &room.objects {
                if !objects.contains(listed.as_str()) {
                    return Err(WorldError::UnknownObject(listed.clone()));
                }
            }
            for exit in &room.exits {
                if !rooms.contains(exit.destination.as_str()) {
                    tracing::warn!(room = %room.id, exit = %exit.direction, destination = %exit.destination, "exit leads to an unknown room");
                }
                if let Some(door) = &exit.door
                    && !objects.contains(door.as_str())
                {
                    tracing::warn!(room = %room.id, door = %door, "exit door is not a known object");
                }
            }
        }

        for puzzle in &self.puzzles {
            for dep in &puzzle.depends_on {
                if !puzzles.contains(dep.as_str()) {
                    tracing::warn!(puzzle = %puzzle.id, dependency = %dep, "puzzle depends on an unknown puzzle");
                }
            }
        }
        for script in &self.scripts {
            if !objects.contains(script.object.as_str()) {
                tracing::warn!(object = %script.object, verb = %script.verb, "script targets an unknown object");
            }
        }
        Ok(())
    }

    fn check_containment_acyclic(&self) -> WorldResult<()> {
        let parent: HashMap<&str, &str> = self
            .objects
            .iter()
            .filter_map(|o| o.placement.contained_in().map(|c| (o.id.as_str(), c)))
            .collect();

        for start in parent.keys() {
            let mut seen = HashSet::new();
            let mut current = *start;
            while let Some(next) = parent.get(current) {
                if !seen.insert(current) || *next == *start {
                    return Err(WorldError::ContainmentCycle((*start).to_string()));
                }
                current = next;
            }
        }
        Ok(())
    }

    /// Give unplaced objects the room that lists them.
    pub(crate) fn place_listed_objects(&mut self) {
        let mut listed: HashMap<String, String> = HashMap::new();
        for room in &self.rooms {
            for id in &room.objects {
                listed.entry(id.clone()).or_insert_with(|| room.id.clone());
            }
        }
        for object in &mut self.objects {
            if object.placement == Placement::Nowhere
                && let Some(room) = listed.get(&object.id)
            {
                object.placement = Placement::Room(room.clone());
            }
        }
    }
}

enum RootPlacement<'a> {
    Room(&'a str),
    Player,
    Lost,
}

/// Follow containers up to the room (or inventory) holding an object.
fn root_room<'a>(by_id: &HashMap<&str, &'a GameObject>, object: &'a GameObject) -> RootPlacement<'a> {
    let mut current = object;
    for _ in 0..=by_id.len() {
        match &current.placement {
            Placement::Room(room) => return RootPlacement::Room(room),
            Placement::Carried | Placement::Nowhere => return RootPlacement::Player,
            Placement::Container(parent) => match by_id.get(parent.as_str()) {
                Some(next) => current = next,
                None => return RootPlacement::Lost,
            },
        }
    }
    RootPlacement::Lost
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> WorldResult<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(WorldError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(seen)
}

fn read_section<T: DeserializeOwned>(path: &Path) -> WorldResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| WorldError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_section<T: DeserializeOwned>(path: &Path) -> WorldResult<Option<T>> {
    if path.exists() {
        read_section(path).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::room::Exit;
    use std::fs;
    use tempfile::TempDir;

    fn write_minimal(dir: &Path) {
        fs::write(
            dir.join("rooms.json"),
            r#"[{"id": "cell", "name": "Cell", "exits": [{"direction": "north", "destination": "yard"}]},
                {"id": "yard", "name": "Yard"}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("objects.json"),
            r#"[{"id": "spoon", "name": "spoon", "placement": {"room": "cell"}}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("puzzles.json"),
            r#"[{"id": "escape", "name": "Escape", "conditions": [{"kind": "room", "target": "yard"}]}]"#,
        )
        .unwrap();
    }

    #[test]
    fn embedded_dataset_is_valid() {
        let data = WorldData::embedded().unwrap();
        assert!(!data.rooms.is_empty());
        assert!(!data.objects.is_empty());
        assert!(!data.puzzles.is_empty());
        assert_eq!(data.rules.start_room, "forest");
    }

    #[test]
    fn load_from_directory() {
        let dir = TempDir::new().unwrap();
        write_minimal(dir.path());
        let data = WorldData::from_dir(dir.path()).unwrap();
        assert_eq!(data.rooms.len(), 2);
        assert_eq!(data.rules.start_room, "cell");
        assert!(data.scripts.is_empty());
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = WorldData::from_dir(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, WorldError::Io { .. }));
    }

    #[test]
    fn empty_sections_are_rejected() {
        let dir = TempDir::new().unwrap();
        write_minimal(dir.path());
        fs::write(dir.path().join("puzzles.json"), "[]").unwrap();
        let err = WorldData::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, WorldError::EmptyContent(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        write_minimal(dir.path());
        fs::write(dir.path().join("objects.json"), "[{").unwrap();
        let err = WorldData::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, WorldError::Parse { .. }));
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let data = WorldData {
            rules: NarrativeRules {
                start_room: "a".into(),
                ..Default::default()
            },
            rooms: vec![Room::new("a", "A"), Room::new("a", "A again")],
            ..Default::default()
        };
        assert!(matches!(
            data.validate(),
            Err(WorldError::DuplicateId { kind: "room", .. })
        ));
    }

    #[test]
    fn containment_cycles_fail_validation() {
        let data = WorldData {
            rules: NarrativeRules {
                start_room: "a".into(),
                ..Default::default()
            },
            rooms: vec![Room::new("a", "A")],
            objects: vec![
                GameObject::new("box", "box").at(Placement::Container("bag".into())),
                GameObject::new("bag", "bag").at(Placement::Container("box".into())),
            ],
            ..Default::default()
        };
        assert!(matches!(
            data.validate(),
            Err(WorldError::ContainmentCycle(_))
        ));
    }

    #[test]
    fn self_containment_is_a_cycle() {
        let data = WorldData {
            rules: NarrativeRules {
                start_room: "a".into(),
                ..Default::default()
            },
            rooms: vec![Room::new("a", "A")],
            objects: vec![GameObject::new("box", "box").at(Placement::Container("box".into()))],
            ..Default::default()
        };
        assert!(matches!(
            data.validate(),
            Err(WorldError::ContainmentCycle(_))
        ));
    }

    #[test]
    fn dangling_exit_is_only_a_warning() {
        let data = WorldData {
            rules: NarrativeRules {
                start_room: "a".into(),
                ..Default::default()
            },
            rooms: vec![Room::new("a", "A").with_exit(Exit::new(Direction::North, "later"))],
            ..Default::default()
        };
        assert!(data.validate().is_ok());
    }

    #[test]
    fn layer_filter_drops_rooms_exits_and_contents() {
        let mut upper = Room::new("attic", "Attic");
        upper.layer = 1;
        let data = WorldData {
            rules: NarrativeRules {
                start_room: "hall".into(),
                ..Default::default()
            },
            rooms: vec![
                Room::new("hall", "Hall").with_exit(Exit::new(Direction::Up, "attic")),
                upper,
            ],
            objects: vec![
                GameObject::new("trunk", "trunk").at(Placement::Room("attic".into())),
                GameObject::new("letter", "letter").at(Placement::Container("trunk".into())),
                GameObject::new("rug", "rug").at(Placement::Room("hall".into())),
            ],
            ..Default::default()
        };

        let filtered = data.filter_layer(0);
        assert_eq!(filtered.rooms.len(), 1);
        assert!(filtered.rooms[0].exits.is_empty());
        let ids: Vec<_> = filtered.objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["rug"]);
    }

    #[test]
    fn listed_objects_get_placed() {
        let mut room = Room::new("hall", "Hall");
        room.objects.push("rug".into());
        let mut data = WorldData {
            rooms: vec![room],
            objects: vec![GameObject::new("rug", "rug")],
            ..Default::default()
        };
        data.place_listed_objects();
        assert_eq!(data.objects[0].placement, Placement::Room("hall".into()));
    }
}
