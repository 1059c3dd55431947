//! Wordgrab - a multiplayer word-claiming race engine
//!
//! This crate provides the core game logic for Wordgrab, including:
//! - The letter tile bag and multiset arithmetic
//! - The game state machine with full rule enforcement
//! - The steal transformation heuristic
//! - End-game scoring and tie handling
//!
//! # Architecture
//!
//! The engine is synchronous and single-threaded by design. A `Game` is the
//! sole owner of its state and every operation is a plain method call;
//! running each game on its own task (see the `wordgrab-engine` crate) is
//! what serializes concurrent players. Word validity is delegated to a
//! [`Dictionary`] implementation supplied by the caller.
//!
//! # Modules
//!
//! - [`tiles`]: Letter distribution, the bag, and letter-count arithmetic
//! - [`dictionary`]: The word membership oracle
//! - [`player`]: Player state, claimed words, and reconnect tokens
//! - [`steal`]: The anti-trivial-steal heuristic
//! - [`turn`]: Turn rotation over connected players
//! - [`scoring`]: Final scores, ties, and tie-break policies
//! - [`snapshot`]: The published view of a game
//! - [`game`]: The state machine tying it all together

pub mod dictionary;
pub mod game;
pub mod player;
pub mod scoring;
pub mod snapshot;
pub mod steal;
pub mod tiles;
pub mod turn;

// Re-export commonly used types
pub use dictionary::{Dictionary, FixtureDictionary, WordList};
pub use game::{EndVote, Game, GameError, GameStatus, DEFAULT_MIN_WORD_LENGTH};
pub use player::{ClaimedWord, Player, PlayerId, ReconnectToken};
pub use scoring::{FirstTieBreak, GameOutcome, PlayerScore, RandomTieBreak, TieBreak, Winner};
pub use snapshot::{GameSnapshot, PlayerView};
pub use tiles::LetterCounts;
