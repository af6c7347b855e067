//! The game context: the one place commands read and change the world.

use umbra_core::{Effect, GameObject, NarrativeState, Placement, Room, World};

use crate::config::EngineConfig;
use crate::error::ActionError;
use crate::parser::{Command, strip_fillers, suggest_object};
use crate::player::SessionState;

/// Custom-state keys the generic verbs understand.
pub(crate) mod keys {
    pub const SEARCHED: &str = "searched";
    pub const BURNED: &str = "burned";
    pub const FLAMMABLE: &str = "flammable";
    pub const FIRE_SOURCE: &str = "fireSource";
    pub const SCREWED: &str = "screwed";
    pub const TOOL: &str = "tool";
    pub const FOCUSED: &str = "focused";
}

/// What a successful handler reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reply {
    pub message: String,
    /// The object acted on, for script lookup.
    pub target: Option<String>,
}

impl Reply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            target: None,
        }
    }

    pub fn on(message: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            target: Some(target.into()),
        }
    }
}

/// Outcome of a verb handler.
pub(crate) type Handled = Result<Reply, ActionError>;

/// Borrowed view over one session's world and state.
///
/// Placement changes go through [`GameContext::place_object`] so the world's
/// placements and the session's inventory never disagree.
pub(crate) struct GameContext<'a> {
    pub world: &'a mut World,
    pub state: &'a mut SessionState,
    pub config: &'a EngineConfig,
}

impl<'a> GameContext<'a> {
    pub fn new(world: &'a mut World, state: &'a mut SessionState, config: &'a EngineConfig) -> Self {
        Self {
            world,
            state,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn current_room(&self) -> Result<&Room, ActionError> {
        self.world
            .room(&self.state.current_room)
            .ok_or(ActionError::Nowhere)
    }

    /// Whether the player can see in the current room.
    pub fn is_lit(&self) -> bool {
        let room = &self.state.current_room;
        self.world
            .room(room)
            .is_none_or(|r| !r.is_dark || self.world.has_light(room))
    }

    pub fn object(&self, id: &str) -> Result<&GameObject, ActionError> {
        self.world
            .object(id)
            .ok_or_else(|| ActionError::NotHere(id.to_string()))
    }

    pub fn is_carried(&self, id: &str) -> bool {
        self.world
            .object(id)
            .is_some_and(|o| o.placement.is_carried())
    }

    /// Resolve a noun to an object the player can act on.
    ///
    /// Only accessible objects match. In the dark only held objects do, and
    /// a miss is reported as darkness rather than absence.
    pub fn resolve(&self, noun: &str) -> Result<String, ActionError> {
        let noun = strip_fillers(noun);
        let room = self.state.current_room.as_str();
        let lit = self.is_lit();
        let reachable = |o: &GameObject| {
            self.world.is_accessible(&o.id, room) && (lit || self.world.is_held(&o.id))
        };
        if let Some(object) = self.world.find_object_where(noun, reachable) {
            return Ok(object.id.clone());
        }
        if !lit {
            return Err(ActionError::TooDark);
        }

        let visible = self
            .world
            .objects()
            .iter()
            .filter(|o| self.world.is_accessible(&o.id, room));
        match suggest_object(noun, visible) {
            Some(suggestion) => Err(ActionError::NotHereSuggest {
                noun: noun.to_string(),
                suggestion,
            }),
            None => Err(ActionError::NotHere(noun.to_string())),
        }
    }

    /// Resolve the command's direct object, asking for one if missing.
    pub fn target(&self, command: &Command, verb: umbra_core::Verb) -> Result<String, ActionError> {
        let noun = command
            .noun
            .as_deref()
            .ok_or(ActionError::MissingNoun(verb))?;
        self.resolve(noun)
    }

    /// Visible objects lying in the current room, excluding scenery.
    pub fn listed_objects(&self) -> Vec<&GameObject> {
        self.world
            .objects_in_room(&self.state.current_room)
            .filter(|o| !o.hidden && !o.is_scenery)
            .collect()
    }

    /// Names of the visible contents of an open container.
    pub fn visible_contents(&self, container: &str) -> Vec<String> {
        match self.world.object(container) {
            Some(c) if c.is_open_container() => self
                .world
                .contents_of(container)
                .filter(|o| !o.hidden)
                .map(|o| o.name.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Move an object and keep the inventory in step.
    pub fn place_object(&mut self, id: &str, to: Placement) -> Result<Placement, ActionError> {
        let was_worn = self.world.object(id).is_some_and(|o| o.is_worn);
        let previous = self.world.relocate(id, to.clone()).map_err(|e| {
            tracing::warn!(object = %id, error = %e, "relocation refused");
            ActionError::Impossible
        })?;
        if to.is_carried() {
            self.state.add_item(id);
        } else {
            self.state.remove_item(id);
            if was_worn {
                self.after_unworn(id);
            }
        }
        Ok(previous)
    }

    /// Worn state from content effects goes through `set_worn`, and only
    /// for objects the player carries.
    fn set_worn_by_effect(&mut self, id: &str, worn: bool) {
        let Some(object) = self.world.object(id) else {
            tracing::warn!(object = %id, "cannot set worn state of unknown object");
            return;
        };
        if worn && !object.placement.is_carried() {
            tracing::warn!(object = %id, "cannot wear an object that isn't carried");
        } else if worn != object.is_worn {
            self.set_worn(id, worn);
        }
    }

    pub fn set_worn(&mut self, id: &str, worn: bool) {
        if let Some(object) = self.world.object_mut(id) {
            object.is_worn = worn;
        }
        if worn {
            if !self.state.is_wearing(id) {
                self.state.worn.push(id.to_string());
            }
        } else {
            self.state.worn.retain(|w| w != id);
            self.after_unworn(id);
        }
    }

    /// Taking off the void object returns the player to the state they
    /// were in before.
    fn after_unworn(&mut self, id: &str) {
        let is_void = self.world.rules().void.as_ref().is_some_and(|v| v.object == id);
        if is_void && self.state.player_state == NarrativeState::Void {
            self.state.player_state = self
                .state
                .suspended_state
                .take()
                .unwrap_or(NarrativeState::Normal);
            tracing::debug!(state = %self.state.player_state, "left the void");
        }
    }

    /// Move the player. Returns whether this was the first visit.
    pub fn enter_room(&mut self, room: &str) -> bool {
        let previous = std::mem::replace(&mut self.state.current_room, room.to_string());
        self.state.previous_room = Some(previous);
        self.state.record_visit(room);
        self.world.visit(room)
    }

    /// Apply a puzzle or script effect.
    ///
    /// Effects come from content, so a reference to something missing is
    /// logged and skipped instead of failing the command.
    pub fn apply_effect(&mut self, effect: &Effect) {
        match effect {
            Effect::UnlockExit { exit } => match self.world.unblock_exit(exit) {
                Ok(_) => {
                    if !self.state.opened_exits.contains(exit) {
                        self.state.opened_exits.push(exit.clone());
                    }
                }
                Err(e) => tracing::warn!(exit = %exit, error = %e, "cannot unlock exit"),
            },
            Effect::RevealObject { object } => match self.world.object_mut(object) {
                Some(o) => o.hidden = false,
                None => tracing::warn!(object = %object, "cannot reveal unknown object"),
            },
            Effect::SetFlag { flag, value } => {
                self.state.flags.insert(flag.clone(), value.clone());
            }
            Effect::MoveObject { object, room } => {
                if self.place_object(object, Placement::Room(room.clone())).is_err() {
                    tracing::warn!(object = %object, room = %room, "cannot move object");
                }
            }
            Effect::TriggerEvent { event } => {
                self.state.set_flag(format!("event_{event}"), true);
            }
            Effect::SetProperty {
                object,
                property,
                value,
            } if property.replace('_', "").eq_ignore_ascii_case("isworn") => {
                self.set_worn_by_effect(object, value.is_truthy());
            }
            Effect::SetProperty {
                object,
                property,
                value,
            } => {
                let applied = self
                    .world
                    .object_mut(object)
                    .is_some_and(|o| o.set_property(property, value.clone()));
                if !applied {
                    tracing::warn!(object = %object, property = %property, "cannot set property");
                }
            }
            Effect::SetPlayerState { state } => {
                tracing::info!(from = %self.state.player_state, to = %state, "player state forced");
                self.state.player_state = *state;
            }
        }
    }
}

/// Join message parts one per line, skipping empty ones.
pub(crate) fn join_messages<'s>(parts: impl IntoIterator<Item = &'s str>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// "a, b and c".
pub(crate) fn list_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_lists() {
        assert_eq!(list_names(&[]), "");
        assert_eq!(list_names(&["coin".into()]), "coin");
        assert_eq!(
            list_names(&["coin".into(), "lamp".into(), "key".into()]),
            "coin, lamp and key"
        );
    }

    #[test]
    fn joining_skips_empty_parts() {
        assert_eq!(join_messages(["a", "", "b"]), "a\nb");
    }
}
