use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::content::WorldData;
use crate::direction::Direction;
use crate::error::{WorldError, WorldResult};
use crate::narrative::NarrativeRules;
use crate::object::{GameObject, Placement};
use crate::puzzle::Puzzle;
use crate::room::{Exit, Room, parse_exit_key};
use crate::script::ScriptRule;
use crate::verb::Verb;

/// What a dynamic-content merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Rooms that were new.
    pub rooms_added: Vec<String>,
    /// Objects that were new.
    pub objects_added: Vec<String>,
    /// Puzzles that were new.
    pub puzzles_added: Vec<String>,
    /// Number of script rules added.
    pub scripts_added: usize,
    /// Ids left untouched because they already existed or referenced
    /// something missing.
    pub skipped: Vec<String>,
}

impl MergeReport {
    /// Whether the merge added nothing.
    pub fn is_empty(&self) -> bool {
        self.rooms_added.is_empty()
            && self.objects_added.is_empty()
            && self.puzzles_added.is_empty()
            && self.scripts_added == 0
    }
}

/// The mutable entity store of one play session.
///
/// Rooms, objects and puzzles keep their content order (lookups and the
/// puzzle scan depend on it) and are indexed by id.
#[derive(Debug, Clone, Default)]
pub struct World {
    rules: NarrativeRules,
    rooms: Vec<Room>,
    objects: Vec<GameObject>,
    puzzles: Vec<Puzzle>,
    scripts: Vec<ScriptRule>,

    // Indexes
    room_index: HashMap<String, usize>,
    object_index: HashMap<String, usize>,
    puzzle_index: HashMap<String, usize>,

    /// Objects mutated since the last `take_dirty`.
    dirty: BTreeSet<String>,
}

impl World {
    /// Create an empty world.
    pub fn new(rules: NarrativeRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Build a world from (already validated) content.
    ///
    /// Objects without a placement are put in the room that lists them, and
    /// each room's object list is rebuilt from the placements.
    pub fn from_data(mut data: WorldData) -> Self {
        data.place_listed_objects();
        let mut world = Self::new(data.rules);
        for room in data.rooms {
            world.room_index.insert(room.id.clone(), world.rooms.len());
            world.rooms.push(room);
        }
        for object in data.objects {
            world.object_index.insert(object.id.clone(), world.objects.len());
            world.objects.push(object);
        }
        for puzzle in data.puzzles {
            world.puzzle_index.insert(puzzle.id.clone(), world.puzzles.len());
            world.puzzles.push(puzzle);
        }
        world.scripts = data.scripts;
        world.rebuild_room_listings();
        world
    }

    fn rebuild_room_listings(&mut self) {
        let mut placed: HashMap<&str, Vec<String>> = HashMap::new();
        for object in &self.objects {
            if let Some(room) = object.placement.location() {
                placed.entry(room).or_default().push(object.id.clone());
            }
        }
        for room in &mut self.rooms {
            let here = placed.remove(room.id.as_str()).unwrap_or_default();
            room.objects.retain(|id| here.contains(id));
            for id in here {
                if !room.objects.contains(&id) {
                    room.objects.push(id);
                }
            }
        }
    }

    /// Narrative rules from content.
    pub fn rules(&self) -> &NarrativeRules {
        &self.rules
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Get a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.room_index.get(id).map(|&i| &self.rooms[i])
    }

    /// Get a room by id, mutably.
    pub fn room_mut(&mut self, id: &str) -> Option<&mut Room> {
        self.room_index.get(id).map(|&i| &mut self.rooms[i])
    }

    /// All rooms, in content order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Get an object by id.
    pub fn object(&self, id: &str) -> Option<&GameObject> {
        self.object_index.get(id).map(|&i| &self.objects[i])
    }

    /// Get an object by id for a flag or state change.
    ///
    /// The object is remembered as changed for save data. Use
    /// [`World::relocate`] to move it.
    pub fn object_mut(&mut self, id: &str) -> Option<&mut GameObject> {
        let &i = self.object_index.get(id)?;
        self.dirty.insert(id.to_string());
        Some(&mut self.objects[i])
    }

    /// All objects, in content order.
    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// Get a puzzle by id.
    pub fn puzzle(&self, id: &str) -> Option<&Puzzle> {
        self.puzzle_index.get(id).map(|&i| &self.puzzles[i])
    }

    /// Get a puzzle by id, mutably.
    pub fn puzzle_mut(&mut self, id: &str) -> Option<&mut Puzzle> {
        self.puzzle_index.get(id).map(|&i| &mut self.puzzles[i])
    }

    /// All puzzles, in evaluation order.
    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    /// All script rules.
    pub fn scripts(&self) -> &[ScriptRule] {
        &self.scripts
    }

    /// Script rules triggered by `verb` on `object`, in content order.
    pub fn scripts_for<'a>(
        &'a self,
        object: &'a str,
        verb: Verb,
    ) -> impl Iterator<Item = &'a ScriptRule> + 'a {
        self.scripts
            .iter()
            .filter(move |s| s.object == object && s.verb == verb)
    }

    /// Find an object by name, alias, or id, case-insensitively.
    ///
    /// An exact match anywhere beats a partial one, so "lantern" never
    /// resolves to "lanternstand" while a real "lantern" exists.
    pub fn find_object(&self, name: &str) -> Option<&GameObject> {
        self.find_object_where(name, |_| true)
    }

    /// [`World::find_object`] restricted to objects accepted by `filter`.
    pub fn find_object_where(
        &self,
        name: &str,
        filter: impl Fn(&GameObject) -> bool,
    ) -> Option<&GameObject> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        self.objects
            .iter()
            .find(|o| filter(o) && o.matches_exactly(&name))
            .or_else(|| {
                self.objects
                    .iter()
                    .find(|o| filter(o) && o.matches_partially(&name))
            })
    }

    // -----------------------------------------------------------------------
    // Accessibility & visibility
    // -----------------------------------------------------------------------

    /// Whether the player, standing in `room`, can reach the object.
    ///
    /// Carried objects are always reachable. Otherwise the object must be
    /// visible and either lie in `room` or inside an open container that is
    /// itself reachable.
    pub fn is_accessible(&self, id: &str, room: &str) -> bool {
        self.accessible_within(id, room, 0)
    }

    fn accessible_within(&self, id: &str, room: &str, depth: usize) -> bool {
        if depth > self.objects.len() {
            return false;
        }
        let Some(object) = self.object(id) else {
            return false;
        };
        match &object.placement {
            Placement::Carried => true,
            Placement::Room(here) => here == room && !object.hidden,
            Placement::Container(parent) => {
                !object.hidden
                    && self.object(parent).is_some_and(GameObject::is_open_container)
                    && self.accessible_within(parent, room, depth + 1)
            }
            Placement::Nowhere => false,
        }
    }

    /// Whether the object is carried, directly or inside something carried.
    pub fn is_held(&self, id: &str) -> bool {
        let mut current = id;
        for _ in 0..=self.objects.len() {
            match self.object(current).map(|o| &o.placement) {
                Some(Placement::Carried) => return true,
                Some(Placement::Container(parent)) => current = parent,
                _ => return false,
            }
        }
        false
    }

    /// Whether anything carried or lying in `room` gives light.
    pub fn has_light(&self, room: &str) -> bool {
        self.objects.iter().any(|o| {
            o.gives_light()
                && (o.placement.is_carried() || o.placement.location() == Some(room))
        })
    }

    /// Objects lying directly in a room, in listing order.
    pub fn objects_in_room<'a>(&'a self, room: &str) -> impl Iterator<Item = &'a GameObject> + 'a {
        self.room(room)
            .map(|r| r.objects.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.object(id))
    }

    /// Objects directly inside a container.
    pub fn contents_of<'a>(
        &'a self,
        container: &'a str,
    ) -> impl Iterator<Item = &'a GameObject> + 'a {
        self.objects
            .iter()
            .filter(move |o| o.placement.contained_in() == Some(container))
    }

    /// Whether putting `object` into `container` would make containment cyclic.
    pub fn would_contain_cycle(&self, object: &str, container: &str) -> bool {
        let mut current = container;
        for _ in 0..=self.objects.len() {
            if current == object {
                return true;
            }
            match self.object(current).and_then(|o| o.placement.contained_in()) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Move an object, returning where it was.
    ///
    /// This is the only way placement changes: it keeps room listings in
    /// step and takes the object off the player's body when it leaves the
    /// inventory.
    pub fn relocate(&mut self, id: &str, to: Placement) -> WorldResult<Placement> {
        let &index = self
            .object_index
            .get(id)
            .ok_or_else(|| WorldError::UnknownObject(id.to_string()))?;
        match &to {
            Placement::Room(room) if !self.room_index.contains_key(room) => {
                return Err(WorldError::UnknownRoom(room.clone()));
            }
            Placement::Container(container) => {
                if !self.object_index.contains_key(container) {
                    return Err(WorldError::UnknownObject(container.clone()));
                }
                if self.would_contain_cycle(id, container) {
                    return Err(WorldError::ContainmentCycle(id.to_string()));
                }
            }
            _ => {}
        }

        let object = &mut self.objects[index];
        let previous = std::mem::replace(&mut object.placement, to.clone());
        if !to.is_carried() {
            object.is_worn = false;
        }

        if let Placement::Room(old) = &previous
            && let Some(room) = self.room_mut(old)
        {
            room.objects.retain(|o| o != id);
        }
        if let Placement::Room(new) = &to
            && let Some(room) = self.room_mut(new)
            && !room.objects.iter().any(|o| o == id)
        {
            room.objects.push(id.to_string());
        }
        self.dirty.insert(id.to_string());
        Ok(previous)
    }

    /// Clear the blocked flag of the exit named by a `room:direction` key.
    /// Returns whether it was blocked.
    pub fn unblock_exit(&mut self, key: &str) -> WorldResult<bool> {
        let (room_id, direction) = parse_exit_key(key)?;
        let room = self
            .room_mut(room_id)
            .ok_or_else(|| WorldError::UnknownRoom(room_id.to_string()))?;
        let exit = room
            .exit_mut(direction)
            .ok_or_else(|| WorldError::InvalidExitKey(key.to_string()))?;
        let was_blocked = exit.blocked;
        exit.blocked = false;
        Ok(was_blocked)
    }

    /// Mark a room visited. Returns whether this was the first visit.
    pub fn visit(&mut self, room: &str) -> bool {
        match self.room_mut(room) {
            Some(r) => !std::mem::replace(&mut r.visited, true),
            None => false,
        }
    }

    /// Ids of objects changed since the last call.
    pub fn take_dirty(&mut self) -> BTreeSet<String> {
        std::mem::take(&mut self.dirty)
    }

    // -----------------------------------------------------------------------
    // Dynamic content
    // -----------------------------------------------------------------------

    /// Add a room unless one with the same id exists. Returns whether it was
    /// added.
    pub fn add_room(&mut self, mut room: Room) -> bool {
        if self.room_index.contains_key(&room.id) {
            return false;
        }
        let id = room.id.clone();
        let placed_here = |oid: &String| {
            self.object(oid)
                .is_some_and(|o| o.placement.location() == Some(id.as_str()))
        };
        room.objects.retain(placed_here);
        self.room_index.insert(room.id.clone(), self.rooms.len());
        self.rooms.push(room);
        true
    }

    /// Add an object unless one with the same id exists. Returns whether it
    /// was added; fails if its placement names a missing room or container.
    pub fn add_object(&mut self, object: GameObject) -> WorldResult<bool> {
        if self.object_index.contains_key(&object.id) {
            return Ok(false);
        }
        match &object.placement {
            Placement::Room(room) if !self.room_index.contains_key(room) => {
                return Err(WorldError::UnknownRoom(room.clone()));
            }
            Placement::Container(c) if !self.object_index.contains_key(c) || *c == object.id => {
                return Err(WorldError::UnknownObject(c.clone()));
            }
            _ => {}
        }
        if let Some(room) = object.placement.location().map(str::to_string)
            && let Some(r) = self.room_mut(&room)
        {
            r.objects.push(object.id.clone());
        }
        self.object_index.insert(object.id.clone(), self.objects.len());
        self.objects.push(object);
        Ok(true)
    }

    /// Add a puzzle unless one with the same id exists. Returns whether it
    /// was added.
    pub fn add_puzzle(&mut self, puzzle: Puzzle) -> bool {
        if self.puzzle_index.contains_key(&puzzle.id) {
            return false;
        }
        self.puzzle_index.insert(puzzle.id.clone(), self.puzzles.len());
        self.puzzles.push(puzzle);
        true
    }

    /// Add a script rule unless one for the same `(object, verb)` exists.
    pub fn add_script(&mut self, script: ScriptRule) -> bool {
        if self.scripts_for(&script.object, script.verb).next().is_some() {
            return false;
        }
        self.scripts.push(script);
        true
    }

    /// Connect two rooms both ways.
    ///
    /// Existing exits are kept: the forward exit is added only if `from` has
    /// nothing in `direction`, the reverse one only if `to` has nothing in the
    /// opposite direction.
    pub fn connect_rooms(&mut self, from: &str, direction: Direction, to: &str) -> WorldResult<()> {
        if self.room(to).is_none() {
            return Err(WorldError::UnknownRoom(to.to_string()));
        }
        let source = self
            .room_mut(from)
            .ok_or_else(|| WorldError::UnknownRoom(from.to_string()))?;
        if source.exit(direction).is_none() {
            source.exits.push(Exit::new(direction, to));
        }
        let back = direction.opposite();
        if let Some(target) = self.room_mut(to)
            && target.exit(back).is_none()
        {
            target.exits.push(Exit::new(back, from));
        }
        Ok(())
    }

    /// Merge incoming content by id. Whatever already exists wins; objects
    /// whose placement cannot be resolved are skipped.
    pub fn merge(&mut self, mut incoming: WorldData) -> MergeReport {
        incoming.place_listed_objects();
        let mut report = MergeReport::default();

        for room in incoming.rooms {
            let id = room.id.clone();
            if self.add_room(room) {
                report.rooms_added.push(id);
            } else {
                report.skipped.push(id);
            }
        }

        // Containers may come after their contents in the incoming list.
        let mut pending = incoming.objects;
        loop {
            let before = pending.len();
            let mut deferred = Vec::new();
            for object in pending {
                let id = object.id.clone();
                match self.add_object(object.clone()) {
                    Ok(true) => report.objects_added.push(id),
                    Ok(false) => report.skipped.push(id),
                    Err(_) => deferred.push(object),
                }
            }
            if deferred.is_empty() || deferred.len() == before {
                for object in deferred {
                    tracing::warn!(object = %object.id, "skipping dynamic object with unresolved placement");
                    report.skipped.push(object.id);
                }
                break;
            }
            pending = deferred;
        }

        for puzzle in incoming.puzzles {
            let id = puzzle.id.clone();
            if self.add_puzzle(puzzle) {
                report.puzzles_added.push(id);
            } else {
                report.skipped.push(id);
            }
        }
        for script in incoming.scripts {
            if self.add_script(script) {
                report.scripts_added += 1;
            }
        }

        tracing::info!(
            rooms = report.rooms_added.len(),
            objects = report.objects_added.len(),
            puzzles = report.puzzles_added.len(),
            skipped = report.skipped.len(),
            "merged dynamic content"
        );
        report
    }

    /// Pure form of [`World::merge`].
    pub fn merged(mut self, incoming: WorldData) -> (Self, MergeReport) {
        let report = self.merge(incoming);
        (self, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> World {
        let data = WorldData {
            rules: NarrativeRules {
                start_room: "hall".into(),
                ..Default::default()
            },
            rooms: vec![
                Room::new("hall", "Hall").with_exit(Exit::new(Direction::North, "study")),
                Room::new("study", "Study").dark(Some("Pitch black.")),
            ],
            objects: vec![
                GameObject::new("lantern", "lantern").at(Placement::Room("hall".into())),
                GameObject::new("lanternstand", "lanternstand")
                    .at(Placement::Room("hall".into())),
                GameObject {
                    is_container: true,
                    is_openable: true,
                    ..GameObject::new("chest", "wooden chest").at(Placement::Room("hall".into()))
                },
                GameObject::new("ring", "ring").at(Placement::Container("chest".into())),
                GameObject {
                    hidden: true,
                    ..GameObject::new("key", "key").at(Placement::Room("hall".into()))
                },
            ],
            ..Default::default()
        };
        World::from_data(data)
    }

    #[test]
    fn exact_match_beats_partial() {
        let world = sample();
        assert_eq!(world.find_object("lantern").unwrap().id, "lantern");
        assert_eq!(world.find_object("LANTERNSTAND").unwrap().id, "lanternstand");
    }

    #[test]
    fn partial_match_as_fallback() {
        let world = sample();
        assert_eq!(world.find_object("chest").unwrap().id, "chest");
        assert_eq!(world.find_object("wooden").unwrap().id, "chest");
        assert!(world.find_object("piano").is_none());
        assert!(world.find_object("  ").is_none());
    }

    #[test]
    fn room_listings_follow_placement() {
        let world = sample();
        let ids: Vec<_> = world.objects_in_room("hall").map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["lantern", "lanternstand", "chest", "key"]);
        assert_eq!(world.contents_of("chest").count(), 1);
    }

    #[test]
    fn closed_container_hides_contents() {
        let mut world = sample();
        assert!(!world.is_accessible("ring", "hall"));
        world.object_mut("chest").unwrap().is_open = true;
        assert!(world.is_accessible("ring", "hall"));
        assert!(!world.is_accessible("ring", "study"));
    }

    #[test]
    fn hidden_objects_are_inaccessible() {
        let mut world = sample();
        assert!(!world.is_accessible("key", "hall"));
        world.object_mut("key").unwrap().hidden = false;
        assert!(world.is_accessible("key", "hall"));
    }

    #[test]
    fn relocate_keeps_single_location() {
        let mut world = sample();
        let previous = world.relocate("lantern", Placement::Carried).unwrap();
        assert_eq!(previous, Placement::Room("hall".into()));
        assert!(world.room("hall").unwrap().objects.iter().all(|o| o != "lantern"));
        assert!(world.is_accessible("lantern", "study"));

        world.object_mut("lantern").unwrap().is_worn = true;
        world
            .relocate("lantern", Placement::Room("study".into()))
            .unwrap();
        let lantern = world.object("lantern").unwrap();
        assert!(!lantern.is_worn);
        assert_eq!(world.room("study").unwrap().objects, vec!["lantern".to_string()]);
    }

    #[test]
    fn relocate_rejects_cycles() {
        let mut world = sample();
        let err = world
            .relocate("chest", Placement::Container("chest".into()))
            .unwrap_err();
        assert!(matches!(err, WorldError::ContainmentCycle(_)));
        world
            .relocate("lantern", Placement::Container("chest".into()))
            .unwrap();
        assert!(world.would_contain_cycle("chest", "lantern"));
    }

    #[test]
    fn light_comes_from_room_or_inventory() {
        let mut world = sample();
        assert!(!world.has_light("study"));
        world.object_mut("lantern").unwrap().is_lit = true;
        world.relocate("lantern", Placement::Carried).unwrap();
        assert!(world.has_light("study"));
    }

    #[test]
    fn dirty_tracking() {
        let mut world = sample();
        world.object_mut("chest").unwrap().is_open = true;
        world.relocate("lantern", Placement::Carried).unwrap();
        let dirty: Vec<_> = world.take_dirty().into_iter().collect();
        assert_eq!(dirty, vec!["chest".to_string(), "lantern".to_string()]);
        assert!(world.take_dirty().is_empty());
    }

    #[test]
    fn unblock_exit_by_key() {
        let mut world = sample();
        world.room_mut("hall").unwrap().exits[0].blocked = true;
        assert!(world.unblock_exit("hall:north").unwrap());
        assert!(!world.unblock_exit("hall:north").unwrap());
        assert!(world.unblock_exit("hall:south").is_err());
        assert!(world.unblock_exit("nowhere").is_err());
    }

    #[test]
    fn connect_rooms_adds_reverse_exit() {
        let mut world = sample();
        world.add_room(Room::new("cellar", "Cellar"));
        world.connect_rooms("hall", Direction::Down, "cellar").unwrap();
        assert_eq!(
            world.room("cellar").unwrap().exit(Direction::Up).unwrap().destination,
            "hall"
        );
        // existing exits win
        world.connect_rooms("hall", Direction::North, "cellar").unwrap();
        assert_eq!(
            world.room("hall").unwrap().exit(Direction::North).unwrap().destination,
            "study"
        );
        assert_eq!(
            world.room("cellar").unwrap().exit(Direction::South).unwrap().destination,
            "hall"
        );
        assert!(world.connect_rooms("hall", Direction::Up, "attic").is_err());
    }

    #[test]
    fn merge_is_first_writer_wins() {
        let world = sample();
        let incoming = WorldData {
            rooms: vec![
                Room::new("hall", "Another Hall"),
                Room::new("garden", "Garden"),
            ],
            objects: vec![
                GameObject::new("seed", "seed").at(Placement::Container("pot".into())),
                GameObject::new("pot", "pot").at(Placement::Room("garden".into())),
                GameObject::new("lantern", "impostor"),
                GameObject::new("ghost", "ghost").at(Placement::Room("limbo".into())),
            ],
            ..Default::default()
        };
        let (world, report) = world.merged(incoming);
        assert_eq!(report.rooms_added, vec!["garden".to_string()]);
        assert_eq!(report.objects_added, vec!["pot".to_string(), "seed".to_string()]);
        assert!(report.skipped.contains(&"hall".to_string()));
        assert!(report.skipped.contains(&"ghost".to_string()));
        assert_eq!(world.room("hall").unwrap().name, "Hall");
        assert_eq!(world.object("lantern").unwrap().name, "lantern");
        assert_eq!(world.room("garden").unwrap().objects, vec!["pot".to_string()]);
    }

    #[test]
    fn scripts_dedupe_by_object_and_verb() {
        let mut world = sample();
        assert!(world.add_script(ScriptRule::new("chest", Verb::Open)));
        assert!(!world.add_script(ScriptRule::new("chest", Verb::Open).once()));
        assert!(world.add_script(ScriptRule::new("chest", Verb::Close)));
        assert_eq!(world.scripts_for("chest", Verb::Open).count(), 1);
    }

    mod relocation {
        use proptest::prelude::*;

        use super::*;

        const IDS: &[&str] = &["lantern", "lanternstand", "chest", "ring", "key"];

        fn placement() -> impl Strategy<Value = Placement> {
            prop_oneof![
                Just(Placement::Carried),
                Just(Placement::Nowhere),
                prop::sample::select(&["hall", "study"][..])
                    .prop_map(|r| Placement::Room(r.to_string())),
                prop::sample::select(IDS).prop_map(|c| Placement::Container(c.to_string())),
            ]
        }

        proptest! {
            #[test]
            fn listings_follow_placements(
                moves in prop::collection::vec((prop::sample::select(IDS), placement()), 0..40)
            ) {
                let mut world = sample();
                for (id, to) in moves {
                    let _ = world.relocate(id, to);
                }
                for object in world.objects() {
                    for room in world.rooms() {
                        let listed = room.objects.contains(&object.id);
                        prop_assert_eq!(listed, object.placement.location() == Some(room.id.as_str()));
                    }
                    if let Some(container) = object.placement.contained_in() {
                        prop_assert!(!world.would_contain_cycle(&object.id, container));
                    }
                }
            }
        }
    }
}
