use serde::{Deserialize, Serialize};

use crate::puzzle::Effect;
use crate::verb::Verb;

/// A content-specific side effect of a verb applied to one object.
///
/// The dispatcher looks these up by `(object, verb)` after a handler succeeds,
/// so narrative special cases live in data rather than in verb handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRule {
    /// Object id the rule is attached to.
    pub object: String,
    /// Verb that triggers it.
    pub verb: Verb,
    /// Fire only the first time.
    #[serde(default)]
    pub once: bool,
    /// Appended to the handler's message.
    #[serde(default)]
    pub message: Option<String>,
    /// Applied in order.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl ScriptRule {
    /// Create a rule with no effects.
    pub fn new(object: impl Into<String>, verb: Verb) -> Self {
        Self {
            object: object.into(),
            verb,
            once: false,
            message: None,
            effects: Vec::new(),
        }
    }

    /// Fire only once per session.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Session flag that records a `once` rule has fired.
    pub fn fired_flag(&self) -> String {
        format!("script:{}:{}", self.object, self.verb.as_str())
    }
}
