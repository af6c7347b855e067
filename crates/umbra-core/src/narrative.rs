use std::fmt;

use serde::{Deserialize, Serialize};

/// The player's narrative state. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeState {
    /// Awake in the ordinary world.
    #[default]
    Normal,
    /// Asleep, wandering the dream.
    Dreaming,
    /// Dissolved into the void.
    Void,
    /// Game over.
    Dead,
}

impl fmt::Display for NarrativeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Dreaming => "dreaming",
            Self::Void => "void",
            Self::Dead => "dead",
        })
    }
}

/// The pair of rooms `sleep` and `wake` move between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamRule {
    /// Where the player falls asleep.
    pub waking_room: String,
    /// Where the dream begins.
    pub dreaming_room: String,
}

/// Wearing `object` inside `room` turns the player into the void.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidRule {
    /// The object to wear.
    pub object: String,
    /// The only room where it takes effect.
    pub room: String,
}

/// Content-level rules for narrative transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRules {
    /// Room a new session starts in.
    #[serde(default)]
    pub start_room: String,
    /// Sleep/wake room pair.
    #[serde(default)]
    pub dream: Option<DreamRule>,
    /// Void transformation.
    #[serde(default)]
    pub void: Option<VoidRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&NarrativeState::Dreaming).unwrap(),
            "\"dreaming\""
        );
        assert_eq!(NarrativeState::default(), NarrativeState::Normal);
    }

    #[test]
    fn rules_from_json() {
        let rules: NarrativeRules = serde_json::from_str(
            r#"{
                "startRoom": "forest",
                "dream": {"wakingRoom": "caravan", "dreamingRoom": "dream-caravan"}
            }"#,
        )
        .unwrap();
        assert_eq!(rules.start_room, "forest");
        assert_eq!(rules.dream.unwrap().dreaming_room, "dream-caravan");
        assert!(rules.void.is_none());
    }
}
