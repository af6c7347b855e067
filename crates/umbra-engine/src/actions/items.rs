//! Carrying things: take, drop, put, wear, remove.

use umbra_core::{NarrativeState, Placement, Verb};

use crate::context::{GameContext, Handled, Reply, join_messages};
use crate::error::ActionError;
use crate::parser::Command;

impl GameContext<'_> {
    pub(super) fn do_take(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Take)?;
        let name = self.take_object(&id)?;
        Ok(Reply::on(format!("You take the {name}."), id))
    }

    /// Move an accessible object into the inventory. Returns its name.
    fn take_object(&mut self, id: &str) -> Result<String, ActionError> {
        let object = self.object(id)?;
        let name = object.name.clone();
        if object.placement.is_carried() {
            return Err(ActionError::AlreadyCarried(name));
        }
        if !object.is_portable() {
            return Err(ActionError::CannotTake(name));
        }
        self.place_object(id, Placement::Carried)?;
        Ok(name)
    }

    pub(super) fn do_drop(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Drop)?;
        let name = self.object(&id)?.name.clone();
        if !self.is_carried(&id) {
            return Err(ActionError::NotCarried(name));
        }
        let room = self.state.current_room.clone();
        self.place_object(&id, Placement::Room(room))?;
        Ok(Reply::on(format!("You drop the {name}."), id))
    }

    pub(super) fn do_put(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Put)?;
        let name = self.object(&id)?.name.clone();
        let destination = command
            .second_noun
            .as_deref()
            .ok_or_else(|| ActionError::MissingDestination(name.clone()))?;
        if !self.is_carried(&id) {
            return Err(ActionError::NotCarried(name));
        }

        let container_id = self.resolve(destination)?;
        let container = self.object(&container_id)?;
        let container_name = container.name.clone();
        if container_id == id || self.world.would_contain_cycle(&id, &container_id) {
            return Err(ActionError::InsideItself(name));
        }
        if !container.is_container {
            return Err(ActionError::NotAContainer(container_name));
        }
        if !container.is_open_container() {
            return Err(ActionError::ContainerClosed(container_name));
        }

        self.place_object(&id, Placement::Container(container_id))?;
        let preposition = match command.preposition.as_deref() {
            Some("on") => "on",
            _ => "in",
        };
        Ok(Reply::on(
            format!("You put the {name} {preposition} the {container_name}."),
            id,
        ))
    }

    pub(super) fn do_wear(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Wear)?;
        self.wear_object(&id)
    }

    /// Put on an object, picking it up first if needed. Wearing the void
    /// object in its room turns the player into the void.
    pub(super) fn wear_object(&mut self, id: &str) -> Handled {
        let object = self.object(id)?;
        let name = object.name.clone();
        if !object.is_wearable {
            return Err(ActionError::NotWearable(name));
        }
        if object.is_worn {
            return Err(ActionError::AlreadyWorn(name));
        }
        let void_rule = self
            .world
            .rules()
            .void
            .clone()
            .filter(|rule| rule.object == id);
        if let Some(rule) = &void_rule
            && rule.room != self.state.current_room
        {
            return Err(ActionError::NoHoldHere(name));
        }

        let mut taken = String::new();
        if !self.is_carried(id) {
            self.take_object(id)?;
            taken = format!("(first taking the {name})");
        }
        self.set_worn(id, true);

        let mut transformed = String::new();
        if void_rule.is_some() && self.state.player_state != NarrativeState::Void {
            self.state.suspended_state = Some(self.state.player_state);
            self.state.player_state = NarrativeState::Void;
            transformed = "The darkness closes over you. You are the void.".to_string();
            tracing::debug!("player became the void");
        }

        let worn = format!("You put on the {name}.");
        Ok(Reply::on(
            join_messages([taken.as_str(), worn.as_str(), transformed.as_str()]),
            id,
        ))
    }

    pub(super) fn do_remove(&mut self, command: &Command) -> Handled {
        let id = self.target(command, Verb::Remove)?;
        let object = self.object(&id)?;
        let name = object.name.clone();
        if !object.is_worn {
            return Err(ActionError::NotWorn(name));
        }
        let was_void = self.state.player_state == NarrativeState::Void;
        self.set_worn(&id, false);

        let mut message = format!("You take off the {name}.");
        if was_void && self.state.player_state != NarrativeState::Void {
            message.push_str(" You are yourself again.");
        }
        Ok(Reply::on(message, id))
    }
}
