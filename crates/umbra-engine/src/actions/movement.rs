//! Moving the player: go, sleep, wake.

use umbra_core::{Direction, NarrativeState, Verb};

use crate::context::{GameContext, Handled, Reply, join_messages};
use crate::error::ActionError;
use crate::parser::Command;

impl GameContext<'_> {
    pub(super) fn do_go(&mut self, command: &Command) -> Handled {
        let noun = command
            .noun
            .as_deref()
            .ok_or(ActionError::MissingNoun(Verb::Go))?;
        let direction =
            Direction::parse(noun).ok_or_else(|| ActionError::NotADirection(noun.to_string()))?;

        let exit = self
            .current_room()?
            .exit(direction)
            .cloned()
            .ok_or_else(|| ActionError::NoExit(direction.name().to_string()))?;
        if exit.blocked {
            return Err(ActionError::Blocked(exit.blocked_message.unwrap_or_else(
                || format!("The way {direction} is blocked."),
            )));
        }
        if self.world.room(&exit.destination).is_none() {
            tracing::warn!(destination = %exit.destination, "exit leads nowhere");
            return Err(ActionError::NoExit(direction.name().to_string()));
        }

        let mut opened = String::new();
        if let Some(door_id) = &exit.door
            && let Some(door) = self.world.object(door_id)
        {
            if door.is_locked {
                return Err(ActionError::Locked(door.name.clone()));
            }
            if door.is_openable && !door.is_open {
                opened = format!("(first opening the {})", door.name);
                if let Some(door) = self.world.object_mut(door_id) {
                    door.is_open = true;
                }
            }
        }

        self.enter_room(&exit.destination);
        tracing::debug!(room = %exit.destination, "player moved");
        let room = self.describe_room()?;
        Ok(Reply::new(join_messages([opened.as_str(), room.as_str()])))
    }

    pub(super) fn do_sleep(&mut self) -> Handled {
        let rule = self
            .world
            .rules()
            .dream
            .clone()
            .ok_or(ActionError::CannotSleep)?;
        match self.state.player_state {
            NarrativeState::Dreaming => return Err(ActionError::AlreadyDreaming),
            NarrativeState::Normal if self.state.current_room == rule.waking_room => {}
            _ => return Err(ActionError::CannotSleep),
        }
        if self.world.room(&rule.dreaming_room).is_none() {
            return Err(ActionError::CannotSleep);
        }

        self.state.player_state = NarrativeState::Dreaming;
        self.enter_room(&rule.dreaming_room);
        let room = self.describe_room()?;
        Ok(Reply::new(format!(
            "You lie down and close your eyes. Sleep takes you quickly.\n\n{room}"
        )))
    }

    pub(super) fn do_wake(&mut self) -> Handled {
        if self.state.player_state != NarrativeState::Dreaming {
            return Err(ActionError::NotDreaming);
        }
        let rule = self
            .world
            .rules()
            .dream
            .clone()
            .ok_or(ActionError::NotDreaming)?;

        self.state.player_state = NarrativeState::Normal;
        self.enter_room(&rule.waking_room);
        let room = self.describe_room()?;
        Ok(Reply::new(format!("You wake with a start.\n\n{room}")))
    }
}
