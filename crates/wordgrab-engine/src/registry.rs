//! Name-addressed game lookup and lifecycle.

use crate::actor::{self, GameHandle};
use crate::EngineError;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use wordgrab_core::{Dictionary, Game};

/// Creates, finds, and removes game actors by external id.
///
/// All lookups go through one concurrent map, so callers racing to create
/// the same id converge on a single actor and handles stay valid for as
/// long as the actor runs.
pub struct GameRegistry {
    games: DashMap<String, GameHandle>,
    dictionary: Arc<dyn Dictionary>,
    min_word_length: usize,
}

impl GameRegistry {
    /// A registry whose games all share `dictionary` and the given minimum
    /// word length
    pub fn new(dictionary: Arc<dyn Dictionary>, min_word_length: usize) -> Self {
        Self {
            games: DashMap::new(),
            dictionary,
            min_word_length,
        }
    }

    /// Get the game registered under `id`, creating it if absent. Creation
    /// is insert-if-absent: concurrent callers all receive the same actor
    /// and none of the extra games they tried to create survive.
    pub fn create(&self, id: &str) -> GameHandle {
        self.games
            .entry(id.to_string())
            .or_insert_with(|| {
                info!("game {}: created", id);
                actor::spawn(
                    Game::new(id.to_string(), self.min_word_length),
                    Arc::clone(&self.dictionary),
                )
            })
            .clone()
    }

    /// Look up a running game without creating one
    pub fn get(&self, id: &str) -> Result<GameHandle, EngineError> {
        self.games
            .get(id)
            .map(|handle| handle.value().clone())
            .ok_or_else(|| EngineError::GameNotFound(id.to_string()))
    }

    /// Drop the game and stop its actor. Commands already queued still
    /// apply; handles used afterwards observe `GameClosed`. Returns whether
    /// the id was registered.
    pub fn remove(&self, id: &str) -> bool {
        match self.games.remove(id) {
            Some((_, handle)) => {
                handle.shutdown();
                info!("game {}: removed", id);
                true
            }
            None => false,
        }
    }

    /// Whether a game is registered under `id`
    pub fn contains(&self, id: &str) -> bool {
        self.games.contains_key(id)
    }

    /// Number of live games
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
