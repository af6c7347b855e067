//! Looking around: look, examine, read, inventory, help.

use umbra_core::Verb;

use super::HELP_TEXT;
use crate::context::{GameContext, Handled, Reply, list_names};
use crate::error::ActionError;
use crate::parser::Command;

impl GameContext<'_> {
    pub(super) fn do_look(&mut self, command: &Command) -> Handled {
        if command.noun.is_some() {
            return self.do_examine(command);
        }
        Ok(Reply::new(self.describe_room()?))
    }

    /// Room text as shown on arrival and by `look`.
    pub(crate) fn describe_room(&self) -> Result<String, ActionError> {
        let room = self.current_room()?;
        if !self.is_lit() {
            let dark = room
                .dark_description
                .clone()
                .unwrap_or_else(|| "It is pitch dark. You can't see a thing.".to_string());
            return Ok(format!("{}\n{dark}", room.name));
        }

        let mut output = room.name.clone();
        if !room.description.is_empty() {
            output.push('\n');
            output.push_str(&room.description);
        }

        let listed = self.listed_objects();
        if !listed.is_empty() {
            let names: Vec<String> = listed.iter().map(|o| o.name.clone()).collect();
            output.push_str(&format!("\nYou can see: {}.", list_names(&names)));
        }
        for container in &listed {
            let contents = self.visible_contents(&container.id);
            if !contents.is_empty() {
                output.push_str(&format!(
                    "\nThe {} contains: {}.",
                    container.name,
                    list_names(&contents)
                ));
            }
        }

        if !room.exits.is_empty() {
            let exits: Vec<&str> = room.exits.iter().map(|e| e.direction.name()).collect();
            output.push_str(&format!("\nExits: {}.", exits.join(", ")));
        }
        Ok(output)
    }

    pub(super) fn do_examine(&mut self, command: &Command) -> Handled {
        if command.noun.is_none() {
            return Ok(Reply::new(self.describe_room()?));
        }
        let id = self.target(command, Verb::Examine)?;
        let object = self.object(&id)?;

        let mut lines = Vec::new();
        lines.push(if object.description.is_empty() {
            format!("You see nothing special about the {}.", object.name)
        } else {
            object.description.clone()
        });
        if object.is_openable {
            let state = if object.is_open { "open" } else { "closed" };
            lines.push(format!("It is {state}."));
        }
        if object.is_switchable {
            let state = if object.is_switched_on { "on" } else { "off" };
            lines.push(format!("It is switched {state}."));
        }
        if object.is_worn {
            lines.push("You are wearing it.".to_string());
        }
        if object.text.is_some() {
            lines.push("There is something written on it.".to_string());
        }
        let contents = self.visible_contents(&id);
        if !contents.is_empty() {
            lines.push(format!("Inside you see: {}.", list_names(&contents)));
        }
        Ok(Reply::on(lines.join(" "), id))
    }

    pub(super) fn do_read(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Read)?;
        let object = self.object(&id)?;
        match &object.text {
            Some(text) => Ok(Reply::on(text.clone(), id.clone())),
            None => Err(ActionError::NothingToRead(object.name.clone())),
        }
    }

    pub(super) fn do_inventory(&mut self) -> Handled {
        let names: Vec<String> = self
            .state
            .inventory
            .iter()
            .filter_map(|id| self.world.object(id))
            .map(|o| {
                if o.is_worn {
                    format!("{} (worn)", o.name)
                } else {
                    o.name.clone()
                }
            })
            .collect();
        if names.is_empty() {
            Ok(Reply::new("You are empty-handed."))
        } else {
            Ok(Reply::new(format!("You are carrying: {}.", list_names(&names))))
        }
    }

    pub(super) fn do_help(&mut self) -> Handled {
        Ok(Reply::new(HELP_TEXT))
    }
}
