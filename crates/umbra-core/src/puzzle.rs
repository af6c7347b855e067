use serde::{Deserialize, Serialize};

use crate::narrative::NarrativeState;
use crate::value::Value;

/// A condition-effect rule that fires once when its conditions and
/// prerequisites hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    /// Unique key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Set once, never cleared.
    #[serde(default)]
    pub solved: bool,
    /// All must hold.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Applied in order when the puzzle is solved.
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// Nudge offered to narrative collaborators while unsolved.
    #[serde(default)]
    pub hint: Option<String>,
    /// Shown to the player when the puzzle is solved.
    #[serde(default)]
    pub message: Option<String>,
    /// Puzzles that must be solved first.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Progression layer.
    #[serde(default)]
    pub layer: u32,
}

impl Puzzle {
    /// Create a puzzle with no conditions or effects.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            solved: false,
            conditions: Vec::new(),
            effects: Vec::new(),
            hint: None,
            message: None,
            depends_on: Vec::new(),
            layer: 0,
        }
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add a prerequisite puzzle.
    pub fn requires(mut self, puzzle: impl Into<String>) -> Self {
        self.depends_on.push(puzzle.into());
        self
    }

    /// Set the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Set the solve message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// What a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// A property of the target object.
    ObjectState,
    /// Whether the target object is carried.
    Inventory,
    /// A session flag named by the target.
    Flag,
    /// Whether the player is in the target room.
    Room,
}

/// A single check against world or session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// What to inspect.
    pub kind: ConditionKind,
    /// Object id, flag name, or room id.
    pub target: String,
    /// Property path, for `object_state` only.
    #[serde(default)]
    pub property: Option<String>,
    /// Expected value; defaults to `true`.
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    /// Require an object property to equal a value.
    pub fn object_state(
        object: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            kind: ConditionKind::ObjectState,
            target: object.into(),
            property: Some(property.into()),
            value: value.into(),
        }
    }

    /// Require the player to carry an object.
    pub fn carrying(object: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::Inventory,
            target: object.into(),
            property: None,
            value: Value::Boolean(true),
        }
    }

    /// Require a session flag to equal a value.
    pub fn flag(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            kind: ConditionKind::Flag,
            target: name.into(),
            property: None,
            value: value.into(),
        }
    }

    /// Require the player to be in a room.
    pub fn in_room(room: impl Into<String>) -> Self {
        Self {
            kind: ConditionKind::Room,
            target: room.into(),
            property: None,
            value: Value::Boolean(true),
        }
    }
}

/// A state change applied when a puzzle is solved or a script fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Clear the blocked flag of the exit named `room:direction`.
    UnlockExit {
        /// Exit key.
        exit: String,
    },
    /// Make a hidden object visible.
    RevealObject {
        /// Object id.
        object: String,
    },
    /// Set a session flag.
    SetFlag {
        /// Flag name.
        flag: String,
        /// Value to store.
        #[serde(default)]
        value: Value,
    },
    /// Put an object directly into a room.
    MoveObject {
        /// Object id.
        object: String,
        /// Destination room id.
        room: String,
    },
    /// Raise the synthetic flag `event_<event>` for downstream consumers.
    TriggerEvent {
        /// Event id.
        event: String,
    },
    /// Set a capability flag or custom state entry on an object.
    SetProperty {
        /// Object id.
        object: String,
        /// Property path, as understood by `GameObject::set_property`.
        property: String,
        /// Value to store.
        #[serde(default)]
        value: Value,
    },
    /// Force the player's narrative state.
    SetPlayerState {
        /// The new state.
        state: NarrativeState,
    },
}
