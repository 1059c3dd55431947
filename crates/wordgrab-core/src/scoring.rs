//! End-game scoring and winner resolution.
//!
//! Scores are recomputed from the words actually held, ranked descending,
//! and ties at the top are reported as a set. Picking one winner out of a
//! tie is a policy choice behind the `TieBreak` trait.

use crate::player::{Player, PlayerId};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the final scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub name: String,
    /// Total letters across the player's words
    pub total_letters: u32,
}

/// The winner of a finished game, or the tied set when the top score is
/// shared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Single(PlayerId),
    Tied(Vec<PlayerId>),
}

impl Winner {
    /// Resolve to one player, consulting `tie_break` only for ties
    pub fn resolve(&self, tie_break: &dyn TieBreak) -> Option<PlayerId> {
        match self {
            Winner::Single(id) => Some(*id),
            Winner::Tied(ids) => tie_break.pick(ids),
        }
    }
}

/// Final scoreboard plus the winner, if any player ever joined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Descending by score; join order breaks score ties in the ranking
    pub final_scores: Vec<PlayerScore>,
    pub winner: Option<Winner>,
}

/// Score every player and rank them
pub fn compute_outcome(
    join_order: &[PlayerId],
    players: &HashMap<PlayerId, Player>,
) -> GameOutcome {
    let mut final_scores: Vec<PlayerScore> = join_order
        .iter()
        .filter_map(|id| players.get(id))
        .map(|player| PlayerScore {
            player_id: player.id,
            name: player.name.clone(),
            total_letters: player
                .words
                .iter()
                .map(|word| word.letters.len() as u32)
                .sum(),
        })
        .collect();

    // Stable sort keeps join order among equal scores
    final_scores.sort_by(|a, b| b.total_letters.cmp(&a.total_letters));

    let winner = final_scores.first().map(|top| {
        let tied: Vec<PlayerId> = final_scores
            .iter()
            .take_while(|s| s.total_letters == top.total_letters)
            .map(|s| s.player_id)
            .collect();
        if tied.len() == 1 {
            Winner::Single(tied[0])
        } else {
            Winner::Tied(tied)
        }
    });

    GameOutcome {
        final_scores,
        winner,
    }
}

/// Picks one winner out of a tied set
pub trait TieBreak {
    /// Returns `None` only for an empty set
    fn pick(&self, tied: &[PlayerId]) -> Option<PlayerId>;
}

/// Uniform random choice among the tied players
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTieBreak;

impl TieBreak for RandomTieBreak {
    fn pick(&self, tied: &[PlayerId]) -> Option<PlayerId> {
        tied.choose(&mut rand::thread_rng()).copied()
    }
}

/// Deterministic policy for tests: the earliest-ranked tied player wins
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTieBreak;

impl TieBreak for FirstTieBreak {
    fn pick(&self, tied: &[PlayerId]) -> Option<PlayerId> {
        tied.first().copied()
    }
}
