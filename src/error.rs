//! Error types for game configuration and synthesis failures.

use thiserror::Error;

/// Errors produced while solving or synthesizing a [`crate::game::CompiledGame`].
///
/// Fixpoint solving itself is total once a game's invariants hold: every
/// error below is raised either before the fixpoint runs (malformed input)
/// or after it (the realizability check failed).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The game is malformed: an empty goal or hold list, an unsupported
    /// rank, a vacuous environment, or a synthesizer invoked twice on the
    /// same game.
    #[error("invalid game configuration: {0}")]
    Configuration(String),
    /// The realizability check of [`crate::realizability::is_realizable`]
    /// returned `false`. Carries the human-readable witness formula that
    /// failed, mirroring the diagnostic message of the original algorithm.
    #[error("specification is not realizable: {0}")]
    Unrealizable(String),
}

/// Convenience alias for the `Result` type returned by this crate's public API.
pub type Result<T> = std::result::Result<T, GameError>;
