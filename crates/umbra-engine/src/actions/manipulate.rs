//! Changing objects: open, close, switch, burn, search, focus, become,
//! unscrew, screw.

use umbra_core::{Value, Verb};

use crate::context::{GameContext, Handled, Reply, join_messages, keys, list_names};
use crate::error::ActionError;
use crate::parser::Command;

impl GameContext<'_> {
    pub(super) fn do_open(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Open)?;
        let object = self.object(&id)?;
        let name = object.name.clone();
        if !object.is_openable {
            return Err(ActionError::NotOpenable(name));
        }
        if object.is_open {
            return Err(ActionError::AlreadyOpen(name));
        }
        if object.is_locked {
            return Err(ActionError::Locked(name));
        }
        if let Some(object) = self.world.object_mut(&id) {
            object.is_open = true;
        }

        let mut message = format!("You open the {name}.");
        let contents = self.visible_contents(&id);
        if !contents.is_empty() {
            message.push_str(&format!(" Inside you see: {}.", list_names(&contents)));
        }
        Ok(Reply::on(message, id))
    }

    pub(super) fn do_close(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Close)?;
        let object = self.object(&id)?;
        let name = object.name.clone();
        if !object.is_openable {
            return Err(ActionError::NotOpenable(name));
        }
        if !object.is_open {
            return Err(ActionError::AlreadyClosed(name));
        }
        if let Some(object) = self.world.object_mut(&id) {
            object.is_open = false;
        }
        Ok(Reply::on(format!("You close the {name}."), id))
    }

    pub(super) fn do_switch(&mut self, command: &Command, on: bool) -> Handled {
        let verb = if on { Verb::SwitchOn } else { Verb::SwitchOff };
        let id = self.target(command, verb)?;
        let object = self.object(&id)?;
        let name = object.name.clone();
        if !object.is_switchable {
            return Err(ActionError::NotSwitchable(name));
        }
        match (on, object.is_switched_on) {
            (true, true) => return Err(ActionError::AlreadyOn(name)),
            (false, false) => return Err(ActionError::AlreadyOff(name)),
            _ => {}
        }

        let was_lit = self.is_lit();
        if let Some(object) = self.world.object_mut(&id) {
            object.is_switched_on = on;
        }
        let switched = format!("You switch {} the {name}.", if on { "on" } else { "off" });

        // Light changes what the player sees.
        let surroundings = if was_lit == self.is_lit() {
            String::new()
        } else {
            self.describe_room()?
        };
        Ok(Reply::on(
            join_messages([switched.as_str(), surroundings.as_str()]),
            id,
        ))
    }

    pub(super) fn do_burn(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Burn)?;
        let object = self.object(&id)?;
        let name = object.name.clone();
        if !object.state_flag(keys::FLAMMABLE) {
            return Err(ActionError::NotFlammable(name));
        }
        if object.state_flag(keys::BURNED) {
            return Err(ActionError::AlreadyBurned(name));
        }
        let source = self.fire_source(command.second_noun.as_deref())?;

        if let Some(object) = self.world.object_mut(&id) {
            object.custom_state.insert(keys::BURNED.into(), Value::Boolean(true));
        }
        Ok(Reply::on(
            format!("You hold the {source} to the {name}. It catches at once."),
            id,
        ))
    }

    /// Name of the carried fire source to use, honouring an explicit
    /// "with <tool>".
    fn fire_source(&self, tool: Option<&str>) -> Result<String, ActionError> {
        if let Some(tool) = tool {
            let tool_id = self.resolve(tool)?;
            let tool = self.object(&tool_id)?;
            if !tool.placement.is_carried() {
                return Err(ActionError::NotCarried(tool.name.clone()));
            }
            if !tool.state_flag(keys::FIRE_SOURCE) {
                return Err(ActionError::NotAFireSource(tool.name.clone()));
            }
            return Ok(tool.name.clone());
        }
        self.state
            .inventory
            .iter()
            .filter_map(|id| self.world.object(id))
            .find(|o| o.state_flag(keys::FIRE_SOURCE))
            .map(|o| o.name.clone())
            .ok_or(ActionError::NoFireSource)
    }

    pub(super) fn do_search(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Search)?;
        let object = self.object(&id)?;
        let name = object.name.clone();
        let again = object.state_flag(keys::SEARCHED);
        if let Some(object) = self.world.object_mut(&id) {
            object
                .custom_state
                .insert(keys::SEARCHED.into(), Value::Boolean(true));
        }

        let contents = self.visible_contents(&id);
        let message = if !contents.is_empty() {
            format!("You search the {name} and find: {}.", list_names(&contents))
        } else if again {
            format!("You search the {name} again, but find nothing new.")
        } else {
            format!("You search the {name}.")
        };
        Ok(Reply::on(message, id))
    }

    pub(super) fn do_focus(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Focus)?;
        let name = self.object(&id)?.name.clone();
        if let Some(object) = self.world.object_mut(&id) {
            object
                .custom_state
                .insert(keys::FOCUSED.into(), Value::Boolean(true));
        }
        Ok(Reply::on(
            format!("You focus all your attention on the {name}."),
            id,
        ))
    }

    /// Becoming something works through the void rule or a script.
    pub(super) fn do_become(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Become)?;
        let is_void = self
            .world
            .rules()
            .void
            .as_ref()
            .is_some_and(|rule| rule.object == id);
        if is_void {
            return self.wear_object(&id);
        }
        if !self.pending_scripts(&id, Verb::Become).is_empty() {
            return Ok(Reply::on(String::new(), id));
        }
        Err(ActionError::CannotBecome(self.object(&id)?.name.clone()))
    }

    pub(super) fn do_unscrew(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Unscrew)?;
        let (name, tool) = self.screw_check(&id, command, true)?;
        if let Some(object) = self.world.object_mut(&id) {
            object
                .custom_state
                .insert(keys::SCREWED.into(), Value::Boolean(false));
        }
        let message = match tool {
            Some(tool) => format!("You unscrew the {name} with the {tool}."),
            None => format!("You unscrew the {name}."),
        };
        Ok(Reply::on(message, id))
    }

    pub(super) fn do_screw(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Screw)?;
        let (name, _) = self.screw_check(&id, command, false)?;
        if let Some(object) = self.world.object_mut(&id) {
            object
                .custom_state
                .insert(keys::SCREWED.into(), Value::Boolean(true));
        }
        Ok(Reply::on(format!("You screw the {name} back in place."), id))
    }

    /// Check that the object has screws in the expected state and that the
    /// required tool, if any, is carried. Returns the object and tool names.
    fn screw_check(
        &self,
        id: &str,
        command: &Command,
        unscrewing: bool,
    ) -> Result<(String, Option<String>), ActionError> {
        let object = self.object(id)?;
        let name = object.name.clone();
        let screwed = match object.custom_state.get(keys::SCREWED) {
            Some(value) => value.is_truthy(),
            None => return Err(ActionError::NoScrews(name)),
        };
        match (unscrewing, screwed) {
            (true, false) => return Err(ActionError::AlreadyUnscrewed(name)),
            (false, true) => return Err(ActionError::AlreadyScrewed(name)),
            _ => {}
        }

        let Some(tool_id) = object.custom_state.get(keys::TOOL).and_then(Value::as_str) else {
            return Ok((name, None));
        };
        let tool_name = self
            .world
            .object(tool_id)
            .map_or_else(|| tool_id.to_string(), |t| t.name.clone());
        if let Some(named) = command.second_noun.as_deref()
            && self.resolve(named)? != tool_id
        {
            return Err(ActionError::NeedTool(tool_name));
        }
        if !self.is_carried(tool_id) {
            return Err(ActionError::NeedTool(tool_name));
        }
        Ok((name, Some(tool_name)))
    }
}
