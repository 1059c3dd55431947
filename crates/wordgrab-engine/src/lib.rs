//! Wordgrab engine: one actor task per game, plus the registry that
//! addresses them.
//!
//! The core crate is deliberately synchronous; this crate supplies the
//! concurrency story around it. Every game runs on its own tokio task that
//! owns the `Game` outright and applies commands strictly in arrival order,
//! so two players grabbing the same word race on queue position, never on
//! state. Handles are cheap clones that any session task can hold.

pub mod actor;
pub mod registry;

use thiserror::Error;
use wordgrab_core::GameError;

// Re-export commonly used types
pub use actor::{Flipped, GameHandle, Joined};
pub use registry::GameRegistry;

/// What can go wrong when talking to a game through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The game applied the command and rejected it
    #[error(transparent)]
    Game(#[from] GameError),
    /// No game is registered under this id
    #[error("game not found: {0}")]
    GameNotFound(String),
    /// The game's actor shut down before answering
    #[error("game is closed")]
    GameClosed,
}
