//! Command parsing for player input.

use serde::{Deserialize, Serialize};
use umbra_core::{Direction, Verb};

/// A tokenized player command.
///
/// `verb` is canonical when the input word was a known alias; unknown words
/// pass through unchanged and are rejected by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Canonical verb, or the unrecognized first word.
    pub verb: String,
    /// Direct object.
    pub noun: Option<String>,
    /// Preposition splitting the two nouns.
    pub preposition: Option<String>,
    /// Indirect object.
    pub second_noun: Option<String>,
    /// The input as typed.
    pub raw: String,
}

impl Command {
    fn new(verb: impl Into<String>, raw: &str) -> Self {
        Self {
            verb: verb.into(),
            noun: None,
            preposition: None,
            second_noun: None,
            raw: raw.to_string(),
        }
    }

    /// Split the words after the verb into noun, preposition, and second noun.
    fn with_objects(mut self, words: &[&str]) -> Self {
        if words.is_empty() {
            return self;
        }
        match words
            .iter()
            .skip(1)
            .position(|w| PREPOSITIONS.contains(w))
            .map(|i| i + 1)
        {
            Some(split) => {
                self.noun = Some(words[..split].join(" "));
                self.preposition = Some(words[split].to_string());
                let rest = words[split + 1..].join(" ");
                self.second_noun = (!rest.is_empty()).then_some(rest);
            }
            None => self.noun = Some(words.join(" ")),
        }
        self
    }
}

/// Multi-word verb phrases, checked before single-word aliases.
const VERB_PHRASES: &[(&str, Verb)] = &[
    ("pick up", Verb::Take),
    ("put on", Verb::Wear),
    ("take off", Verb::Remove),
    ("switch on", Verb::SwitchOn),
    ("turn on", Verb::SwitchOn),
    ("switch off", Verb::SwitchOff),
    ("turn off", Verb::SwitchOff),
    ("look at", Verb::Examine),
    ("look in", Verb::Examine),
    ("look under", Verb::Search),
    ("wake up", Verb::Wake),
    ("go to sleep", Verb::Sleep),
    ("set fire to", Verb::Burn),
];

const PREPOSITIONS: &[&str] = &["with", "on", "in", "to", "from", "at"];

/// Parse a player input line into a command.
///
/// Never fails: empty input is `look`, a leading direction is `go`, and an
/// unknown verb is carried through for the dispatcher to reject.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let Some(first) = words.first() else {
        return Command::new(Verb::Look.as_str(), input);
    };

    if let Some(direction) = Direction::parse(first) {
        let mut command = Command::new(Verb::Go.as_str(), input);
        command.noun = Some(direction.name().to_string());
        return command;
    }

    let line = words.join(" ");
    for (phrase, verb) in VERB_PHRASES {
        if let Some(rest) = line.strip_prefix(phrase)
            && (rest.is_empty() || rest.starts_with(' '))
        {
            let rest: Vec<&str> = rest.split_whitespace().collect();
            return Command::new(verb.as_str(), input).with_objects(&rest);
        }
    }

    let verb = Verb::from_alias(first).map_or_else(|| (*first).to_string(), |v| v.as_str().to_string());
    Command::new(verb, input).with_objects(&words[1..])
}
