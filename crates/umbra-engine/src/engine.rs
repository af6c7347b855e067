//! The engine: one single-player session over its own copy of the world.

use umbra_core::{
    Direction, GameObject, MergeReport, ObjectOverride, Puzzle, Room, ScriptRule, World,
    WorldData,
};

use crate::actions::ActionResult;
use crate::config::{ContentSource, EngineConfig};
use crate::constraints::AiConstraints;
use crate::context::GameContext;
use crate::error::EngineResult;
use crate::parser::parse_command;
use crate::player::SessionState;
use crate::save::{self, SaveGame};

/// An interactive fiction session.
///
/// Owns its world and state exclusively; callers only ever get copies or
/// serialized snapshots.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    world: World,
    state: SessionState,
}

impl Engine {
    /// Start a session, or resume one from `prior` state.
    ///
    /// Content that fails to load from a directory is replaced by the
    /// embedded dataset. Only an unusable `prior` state is an error.
    pub fn new(config: EngineConfig, prior: Option<SessionState>) -> EngineResult<Self> {
        let mut world = World::from_data(load_content(&config)?);
        let state = match prior {
            Some(mut state) => {
                save::restore(&mut world, &mut state)?;
                tracing::info!(session = %state.session_id, turn = state.turn, "session restored");
                state
            }
            None => {
                let start = world.rules().start_room.clone();
                world.visit(&start);
                let state = SessionState::new(start);
                tracing::info!(session = %state.session_id, room = %state.current_room, "session started");
                state
            }
        };
        Ok(Self {
            config,
            world,
            state,
        })
    }

    /// Restore a session from [`Engine::serialize`] output.
    pub fn deserialize(json: &str, config: EngineConfig) -> EngineResult<Self> {
        let save = SaveGame::from_json(json)?;
        Self::new(config, Some(save.state))
    }

    /// Serialize the session for storage.
    pub fn serialize(&self) -> EngineResult<String> {
        SaveGame::new(self.state.clone()).to_json()
    }

    /// Run one line of player input. Always counts as a turn.
    pub fn execute(&mut self, input: &str) -> ActionResult {
        self.state.turn += 1;
        let command = parse_command(input);
        tracing::debug!(
            turn = self.state.turn,
            verb = %command.verb,
            noun = ?command.noun,
            "executing command"
        );
        let result = GameContext::new(&mut self.world, &mut self.state, &self.config)
            .dispatch(&command);
        self.record_changes();
        result
    }

    /// Copy changed objects into the session's save overrides.
    fn record_changes(&mut self) {
        for id in self.world.take_dirty() {
            if let Some(object) = self.world.object(&id) {
                self.state
                    .object_states
                    .insert(id, ObjectOverride::capture(object));
            }
        }
    }

    /// A copy of the session state.
    pub fn state(&self) -> SessionState {
        self.state.clone()
    }

    /// Read-only view of the world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot for narrative collaborators.
    pub fn constraints(&self) -> AiConstraints {
        AiConstraints::capture(&self.world, &self.state)
    }

    // -----------------------------------------------------------------------
    // Dynamic content
    // -----------------------------------------------------------------------

    /// Merge generated content. Existing ids always win.
    pub fn load_dynamic_world(&mut self, data: WorldData) -> MergeReport {
        self.world.merge(data)
    }

    /// Add a room. Returns whether it was new.
    pub fn add_room(&mut self, room: Room) -> bool {
        self.world.add_room(room)
    }

    /// Add an object. Returns whether it was new.
    pub fn add_object(&mut self, object: GameObject) -> EngineResult<bool> {
        Ok(self.world.add_object(object)?)
    }

    /// Add a puzzle. Returns whether it was new.
    pub fn add_puzzle(&mut self, puzzle: Puzzle) -> bool {
        self.world.add_puzzle(puzzle)
    }

    /// Add a script rule. Returns whether it was new.
    pub fn add_script(&mut self, script: ScriptRule) -> bool {
        self.world.add_script(script)
    }

    /// Connect two rooms, adding the reverse exit too.
    pub fn connect_rooms(&mut self, from: &str, direction: Direction, to: &str) -> EngineResult<()> {
        Ok(self.world.connect_rooms(from, direction, to)?)
    }
}

/// Load the configured content, falling back to the embedded dataset.
fn load_content(config: &EngineConfig) -> EngineResult<WorldData> {
    let data = match &config.content {
        ContentSource::Embedded => WorldData::embedded()?,
        ContentSource::Directory(dir) => match WorldData::from_dir(dir) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "falling back to embedded content");
                WorldData::embedded()?
            }
        },
    };
    let data = match config.max_layer {
        Some(max) => data.filter_layer(max),
        None => data,
    };
    data.validate()?;
    Ok(data)
}
