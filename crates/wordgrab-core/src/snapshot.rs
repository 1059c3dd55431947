//! Published game state.
//!
//! Everything the presentation layer may see. The bag is reported as a
//! count only, since revealing its order would let clients predict flips,
//! and reconnect tokens never leave the core.

use crate::game::GameStatus;
use crate::player::{ClaimedWord, PlayerId};
use crate::scoring::{PlayerScore, Winner};
use serde::{Deserialize, Serialize};

/// A player as shown to everyone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub words: Vec<ClaimedWord>,
    pub score: u32,
    pub connected: bool,
}

/// Snapshot of one game, safe to broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub id: String,
    pub status: GameStatus,
    /// Players in join order
    pub players: Vec<PlayerView>,
    /// Face-up tiles in flip order
    pub flipped_tiles: Vec<char>,
    /// How many tiles are still face down
    pub tiles_remaining: usize,
    pub current_turn: Option<PlayerId>,
    pub min_word_length: usize,
    /// Players who voted to end, in join order
    pub end_votes: Vec<PlayerId>,
    /// Set once the game finishes
    pub final_scores: Option<Vec<PlayerScore>>,
    pub winner: Option<Winner>,
}
