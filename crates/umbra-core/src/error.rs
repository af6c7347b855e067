use std::path::PathBuf;

/// Alias for `Result<T, WorldError>`.
pub type WorldResult<T> = Result<T, WorldError>;

/// Errors raised while loading, validating, or extending world content.
///
/// None of these reach the player: command execution never fails with a
/// `WorldError`. They surface at load time or from the dynamic-content API.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A content file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// A content file is not valid JSON for its section.
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// The file that failed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A content source produced no rooms, objects, or puzzles.
    #[error("content at {0} is empty")]
    EmptyContent(PathBuf),

    /// Two definitions share the same id.
    #[error("duplicate {kind} id: \"{id}\"")]
    DuplicateId {
        /// What kind of definition collided (room, object, puzzle).
        kind: &'static str,
        /// The colliding id.
        id: String,
    },

    /// A reference names a room that does not exist.
    #[error("unknown room: \"{0}\"")]
    UnknownRoom(String),

    /// A reference names an object that does not exist.
    #[error("unknown object: \"{0}\"")]
    UnknownObject(String),

    /// A reference names a puzzle that does not exist.
    #[error("unknown puzzle: \"{0}\"")]
    UnknownPuzzle(String),

    /// Following `container` links from this object leads back to it.
    #[error("containment cycle through object \"{0}\"")]
    ContainmentCycle(String),

    /// An exit key is not of the form `room:direction`.
    #[error("invalid exit key: \"{0}\"")]
    InvalidExitKey(String),
}
