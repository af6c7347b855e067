//! Object name resolution helpers.

use strsim::jaro_winkler;
use umbra_core::GameObject;

/// Minimum similarity for a "did you mean" suggestion (0.0-1.0).
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Leading words that never name an object ("focus on the mirror").
const FILLER_WORDS: &[&str] = &["the", "a", "an", "some", "on", "at", "to", "into"];

/// Drop leading articles and stray prepositions from a noun phrase.
pub fn strip_fillers(noun: &str) -> &str {
    let mut noun = noun.trim();
    while let Some((first, rest)) = noun.split_once(' ') {
        if !FILLER_WORDS.contains(&first) {
            break;
        }
        noun = rest.trim_start();
    }
    noun
}

/// Name of the candidate most similar to `input`, if any is close enough.
///
/// Names and aliases are scored; the object's display name is returned.
pub fn suggest_object<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a GameObject>,
) -> Option<String> {
    let input = input.to_lowercase();
    let mut best: Option<(&GameObject, f64)> = None;
    for object in candidates {
        let score = std::iter::once(&object.name)
            .chain(object.aliases.iter())
            .map(|name| jaro_winkler(&input, &name.to_lowercase()))
            .fold(0.0, f64::max);
        if score >= SUGGESTION_THRESHOLD && best.is_none_or(|(_, s)| score > s) {
            best = Some((object, score));
        }
    }
    best.map(|(object, _)| object.name.clone())
}
