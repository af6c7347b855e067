//! Error types for the engine.

use thiserror::Error;
use umbra_core::{Verb, WorldError};

/// Result type for engine operations outside the command path.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while building, restoring, or extending an engine.
///
/// Command execution never returns these; see [`ActionError`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// World content could not be loaded or extended.
    #[error(transparent)]
    Content(#[from] WorldError),

    /// A save blob is not valid JSON or does not match the save format.
    #[error("corrupt save data: {0}")]
    CorruptSave(#[from] serde_json::Error),

    /// A save blob parsed but refers to state this world cannot hold.
    #[error("invalid save data: {0}")]
    InvalidSave(String),

    /// A save blob from a newer or unknown format.
    #[error("unsupported save version {0}")]
    UnsupportedSaveVersion(u32),
}

/// A precondition the player's command did not meet.
///
/// The display text is exactly what the player reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The verb is not known.
    #[error("I don't understand \"{0}\". Type 'help' for a list of commands.")]
    UnknownVerb(String),

    /// The verb needs an object.
    #[error("What do you want to {0}?")]
    MissingNoun(Verb),

    /// `put` without a destination.
    #[error("Where do you want to put the {0}?")]
    MissingDestination(String),

    /// Nothing accessible matches the noun.
    #[error("You don't see any {0} here.")]
    NotHere(String),

    /// Nothing accessible matches, but something visible is close.
    #[error("You don't see any {noun} here. Did you mean the {suggestion}?")]
    NotHereSuggest {
        /// What the player typed.
        noun: String,
        /// Name of the closest visible object.
        suggestion: String,
    },

    /// The room is dark and the object is not in hand.
    #[error("It's too dark to see anything here.")]
    TooDark,

    /// The player's room no longer exists.
    #[error("You are nowhere at all.")]
    Nowhere,

    /// The noun of `go` is not a direction.
    #[error("\"{0}\" isn't a direction you can go.")]
    NotADirection(String),

    /// No exit that way.
    #[error("You can't go {0} from here.")]
    NoExit(String),

    /// The exit is blocked; carries the blocking message.
    #[error("{0}")]
    Blocked(String),

    /// The object (or the door in the way) is locked.
    #[error("The {0} is locked.")]
    Locked(String),

    /// Already in the inventory.
    #[error("You already have the {0}.")]
    AlreadyCarried(String),

    /// Fixed or scenery.
    #[error("You can't take the {0}.")]
    CannotTake(String),

    /// Not in the inventory.
    #[error("You're not carrying the {0}.")]
    NotCarried(String),

    /// Not openable.
    #[error("The {0} can't be opened or closed.")]
    NotOpenable(String),

    /// Already open.
    #[error("The {0} is already open.")]
    AlreadyOpen(String),

    /// Already closed.
    #[error("The {0} is already closed.")]
    AlreadyClosed(String),

    /// Not wearable.
    #[error("You can't wear the {0}.")]
    NotWearable(String),

    /// Already worn.
    #[error("You're already wearing the {0}.")]
    AlreadyWorn(String),

    /// Not worn.
    #[error("You're not wearing the {0}.")]
    NotWorn(String),

    /// Not switchable.
    #[error("The {0} can't be switched on or off.")]
    NotSwitchable(String),

    /// Already switched on.
    #[error("The {0} is already on.")]
    AlreadyOn(String),

    /// Already switched off.
    #[error("The {0} is already off.")]
    AlreadyOff(String),

    /// Nothing carried can start a fire.
    #[error("You have nothing to light it with.")]
    NoFireSource,

    /// The named tool can't start a fire.
    #[error("You can't light anything with the {0}.")]
    NotAFireSource(String),

    /// Not flammable.
    #[error("The {0} won't burn.")]
    NotFlammable(String),

    /// Already burned.
    #[error("The {0} has already burned.")]
    AlreadyBurned(String),

    /// Destination of `put` is not a container.
    #[error("You can't put things in the {0}.")]
    NotAContainer(String),

    /// Destination of `put` is closed.
    #[error("The {0} is closed.")]
    ContainerClosed(String),

    /// `put` would nest an object inside itself.
    #[error("You can't put the {0} inside itself.")]
    InsideItself(String),

    /// No screws to turn.
    #[error("There's nothing to unscrew on the {0}.")]
    NoScrews(String),

    /// Screws already out.
    #[error("The {0} is already unscrewed.")]
    AlreadyUnscrewed(String),

    /// Screws already in.
    #[error("The {0} is already screwed tight.")]
    AlreadyScrewed(String),

    /// A tool is required and not carried.
    #[error("You need the {0} for that.")]
    NeedTool(String),

    /// Nothing written on it.
    #[error("There's nothing written on the {0}.")]
    NothingToRead(String),

    /// No transformation applies.
    #[error("You can't become the {0}.")]
    CannotBecome(String),

    /// The void object worn outside its room.
    #[error("The {0} slips through your fingers. It has no hold here.")]
    NoHoldHere(String),

    /// Wrong place or state for sleeping.
    #[error("You can't sleep here.")]
    CannotSleep,

    /// Already asleep.
    #[error("You are already dreaming.")]
    AlreadyDreaming,

    /// Not asleep.
    #[error("You aren't dreaming.")]
    NotDreaming,

    /// The player is dead; only queries work.
    #[error("You are dead. You can look, examine, check your inventory, or wait.")]
    Dead,

    /// A world invariant refused the change.
    #[error("You can't do that.")]
    Impossible,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_as_prose() {
        assert_eq!(
            ActionError::NotHere("lamp".into()).to_string(),
            "You don't see any lamp here."
        );
        assert_eq!(
            ActionError::MissingNoun(Verb::SwitchOn).to_string(),
            "What do you want to switch on?"
        );
        assert_eq!(
            ActionError::NotHereSuggest {
                noun: "lightr".into(),
                suggestion: "lighter".into()
            }
            .to_string(),
            "You don't see any lightr here. Did you mean the lighter?"
        );
    }
}
