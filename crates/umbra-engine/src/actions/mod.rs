//! Verb handlers and the dispatcher that runs them.

mod describe;
mod items;
mod manipulate;
mod movement;

use serde::{Deserialize, Serialize};
use umbra_core::{NarrativeState, ScriptRule, Verb};

use crate::context::{GameContext, Handled, join_messages};
use crate::error::ActionError;
use crate::parser::Command;

/// The outcome of one command, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// Whether the command did what it asked.
    pub success: bool,
    /// Text for the player.
    pub message: String,
    /// First puzzle solved by this command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle_solved_id: Option<String>,
}

impl ActionResult {
    /// A failed command.
    pub fn failure(error: &ActionError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            puzzle_solved_id: None,
        }
    }

    /// A successful command.
    pub fn success(message: impl Into<String>, puzzle_solved_id: Option<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            puzzle_solved_id,
        }
    }
}

impl GameContext<'_> {
    /// Run one parsed command: handler, then scripts, then puzzles.
    pub(crate) fn dispatch(&mut self, command: &Command) -> ActionResult {
        let Some(verb) = Verb::parse(&command.verb) else {
            return ActionResult::failure(&ActionError::UnknownVerb(command.verb.clone()));
        };
        if self.state.player_state == NarrativeState::Dead && !verb.is_query() {
            return ActionResult::failure(&ActionError::Dead);
        }

        let reply = match self.handle(verb, command) {
            Ok(reply) => reply,
            Err(error) => {
                tracing::debug!(verb = %verb, %error, "command refused");
                return ActionResult::failure(&error);
            }
        };

        let mut parts = vec![reply.message];
        if let Some(target) = &reply.target {
            parts.extend(self.run_scripts(target, verb));
        }

        // Every successful turn rechecks the puzzles, queries included, so
        // puzzles added or restored in an already-satisfied state still fire.
        let evaluation = self.evaluate_puzzles();
        parts.extend(evaluation.messages);
        let solved = evaluation.solved.into_iter().next();
        ActionResult::success(join_messages(parts.iter().map(String::as_str)), solved)
    }

    fn handle(&mut self, verb: Verb, command: &Command) -> Handled {
        match verb {
            Verb::Look => self.do_look(command),
            Verb::Examine => self.do_examine(command),
            Verb::Inventory => self.do_inventory(),
            Verb::Go => self.do_go(command),
            Verb::Take => self.do_take(command),
            Verb::Drop => self.do_drop(command),
            Verb::Put => self.do_put(command),
            Verb::Open => self.do_open(command),
            Verb::Close => self.do_close(command),
            Verb::Wear => self.do_wear(command),
            Verb::Remove => self.do_remove(command),
            Verb::SwitchOn => self.do_switch(command, true),
            Verb::SwitchOff => self.do_switch(command, false),
            Verb::Burn => self.do_burn(command),
            Verb::Search => self.do_search(command),
            Verb::Focus => self.do_focus(command),
            Verb::Become => self.do_become(command),
            Verb::Wait => Ok(crate::context::Reply::new("Time passes.")),
            Verb::Sleep => self.do_sleep(),
            Verb::Wake => self.do_wake(),
            Verb::Unscrew => self.do_unscrew(command),
            Verb::Screw => self.do_screw(command),
            Verb::Read => self.do_read(command),
            Verb::Help => self.do_help(),
        }
    }

    /// Script rules for `(target, verb)` that may still fire.
    pub(crate) fn pending_scripts(&self, target: &str, verb: Verb) -> Vec<ScriptRule> {
        self.world
            .scripts_for(target, verb)
            .filter(|rule| !(rule.once && self.state.has_flag(&rule.fired_flag())))
            .cloned()
            .collect()
    }

    /// Run pending script rules and collect their messages.
    fn run_scripts(&mut self, target: &str, verb: Verb) -> Vec<String> {
        let mut messages = Vec::new();
        for rule in self.pending_scripts(target, verb) {
            tracing::debug!(object = %rule.object, verb = %rule.verb, "script fired");
            for effect in &rule.effects {
                self.apply_effect(effect);
            }
            if rule.once {
                self.state.set_flag(rule.fired_flag(), true);
            }
            messages.extend(rule.message);
        }
        messages
    }
}

const HELP_TEXT: &str = "\
Movement:  go <direction>, or just n/s/e/w/ne/nw/se/sw/u/d/in/out
Looking:   look, examine <thing>, read <thing>, search <thing>, inventory
Objects:   take, drop, put <thing> in <container>, open, close
Wearing:   wear, remove
Devices:   switch on <thing>, switch off <thing>, unscrew, screw
Other:     burn <thing>, focus on <thing>, become <thing>, sleep, wake, wait, help";
