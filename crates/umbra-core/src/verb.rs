use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical player verb.
///
/// The parser canonicalizes aliases to [`Verb::as_str`]; the dispatcher maps
/// that string back with [`Verb::parse`]. Script rules in content are keyed by
/// this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// Describe the current room.
    Look,
    /// Describe an object.
    Examine,
    /// List carried objects.
    Inventory,
    /// Move through an exit.
    Go,
    /// Pick up an object.
    Take,
    /// Put down a carried object.
    Drop,
    /// Place a carried object inside a container.
    Put,
    /// Open an object.
    Open,
    /// Close an object.
    Close,
    /// Wear a carried object.
    Wear,
    /// Take off a worn object.
    Remove,
    /// Switch a device on.
    SwitchOn,
    /// Switch a device off.
    SwitchOff,
    /// Set fire to an object.
    Burn,
    /// Search an object.
    Search,
    /// Concentrate on an object.
    Focus,
    /// Transform into something.
    Become,
    /// Let a turn pass.
    Wait,
    /// Fall asleep and dream.
    Sleep,
    /// Wake from a dream.
    Wake,
    /// Loosen screws.
    Unscrew,
    /// Tighten screws.
    Screw,
    /// Read writing on an object.
    Read,
    /// Show the command list.
    Help,
}

impl Verb {
    /// Canonical name emitted by the parser.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Look => "look",
            Self::Examine => "examine",
            Self::Inventory => "inventory",
            Self::Go => "go",
            Self::Take => "take",
            Self::Drop => "drop",
            Self::Put => "put",
            Self::Open => "open",
            Self::Close => "close",
            Self::Wear => "wear",
            Self::Remove => "remove",
            Self::SwitchOn => "switch_on",
            Self::SwitchOff => "switch_off",
            Self::Burn => "burn",
            Self::Search => "search",
            Self::Focus => "focus",
            Self::Become => "become",
            Self::Wait => "wait",
            Self::Sleep => "sleep",
            Self::Wake => "wake",
            Self::Unscrew => "unscrew",
            Self::Screw => "screw",
            Self::Read => "read",
            Self::Help => "help",
        }
    }

    /// Map a canonical name back to a verb.
    pub fn parse(s: &str) -> Option<Self> {
        VERB_ALIASES
            .iter()
            .find(|(_, verb)| verb.as_str() == s)
            .map(|(_, verb)| *verb)
    }

    /// Canonicalize a single input word through the alias table.
    pub fn from_alias(word: &str) -> Option<Self> {
        VERB_ALIASES
            .iter()
            .find(|(alias, _)| *alias == word)
            .map(|(_, verb)| *verb)
    }

    /// Verbs that only read state. They remain available after death.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::Look | Self::Examine | Self::Inventory | Self::Help | Self::Wait | Self::Read
        )
    }

    /// The word shown to the player when asking for a missing noun.
    pub fn prompt_word(&self) -> &'static str {
        match self {
            Self::SwitchOn => "switch on",
            Self::SwitchOff => "switch off",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prompt_word())
    }
}

/// Single-word verb aliases. Canonical names come first for each verb.
const VERB_ALIASES: &[(&str, Verb)] = &[
    ("look", Verb::Look),
    ("l", Verb::Look),
    ("examine", Verb::Examine),
    ("x", Verb::Examine),
    ("ex", Verb::Examine),
    ("inspect", Verb::Examine),
    ("describe", Verb::Examine),
    ("inventory", Verb::Inventory),
    ("i", Verb::Inventory),
    ("inv", Verb::Inventory),
    ("go", Verb::Go),
    ("walk", Verb::Go),
    ("run", Verb::Go),
    ("move", Verb::Go),
    ("head", Verb::Go),
    ("take", Verb::Take),
    ("get", Verb::Take),
    ("grab", Verb::Take),
    ("drop", Verb::Drop),
    ("discard", Verb::Drop),
    ("put", Verb::Put),
    ("place", Verb::Put),
    ("insert", Verb::Put),
    ("open", Verb::Open),
    ("close", Verb::Close),
    ("shut", Verb::Close),
    ("wear", Verb::Wear),
    ("don", Verb::Wear),
    ("remove", Verb::Remove),
    ("doff", Verb::Remove),
    ("switch_on", Verb::SwitchOn),
    ("activate", Verb::SwitchOn),
    ("switch_off", Verb::SwitchOff),
    ("deactivate", Verb::SwitchOff),
    ("burn", Verb::Burn),
    ("ignite", Verb::Burn),
    ("torch", Verb::Burn),
    ("search", Verb::Search),
    ("rummage", Verb::Search),
    ("focus", Verb::Focus),
    ("concentrate", Verb::Focus),
    ("meditate", Verb::Focus),
    ("become", Verb::Become),
    ("transform", Verb::Become),
    ("wait", Verb::Wait),
    ("z", Verb::Wait),
    ("sleep", Verb::Sleep),
    ("nap", Verb::Sleep),
    ("wake", Verb::Wake),
    ("awaken", Verb::Wake),
    ("unscrew", Verb::Unscrew),
    ("screw", Verb::Screw),
    ("read", Verb::Read),
    ("help", Verb::Help),
    ("h", Verb::Help),
    ("?", Verb::Help),
    ("commands", Verb::Help),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_canonicalize() {
        assert_eq!(Verb::from_alias("x"), Some(Verb::Examine));
        assert_eq!(Verb::from_alias("i"), Some(Verb::Inventory));
        assert_eq!(Verb::from_alias("get"), Some(Verb::Take));
        assert_eq!(Verb::from_alias("dance"), None);
    }

    #[test]
    fn canonical_names_round_trip() {
        for (_, verb) in VERB_ALIASES {
            assert_eq!(Verb::parse(verb.as_str()), Some(*verb));
        }
    }

    #[test]
    fn serde_matches_canonical_name() {
        assert_eq!(
            serde_json::to_string(&Verb::SwitchOn).unwrap(),
            "\"switch_on\""
        );
        let verb: Verb = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(verb, Verb::Open);
    }

    #[test]
    fn queries_are_read_only_verbs() {
        assert!(Verb::Look.is_query());
        assert!(Verb::Read.is_query());
        assert!(!Verb::Take.is_query());
        assert!(!Verb::Go.is_query());
    }
}
