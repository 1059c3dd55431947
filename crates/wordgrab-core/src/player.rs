//! Player state and reconnect tokens.
//!
//! This module contains:
//! - Player struct with claimed words, score, and presence
//! - ClaimedWord, the unit of ownership that steals operate on
//! - ReconnectToken, the secret that lets a session re-attach

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// Identifies a player within a game. Assigned by the session layer.
pub type PlayerId = Uuid;

/// Token length in characters, roughly 256 bits of entropy.
const TOKEN_LEN: usize = 43;

/// Opaque secret handed to a player on join. The session layer presents it
/// when re-attaching a dropped connection; the game core never verifies it
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectToken(String);

impl ReconnectToken {
    /// Generate a fresh alphanumeric token
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let token = rng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a presented token without short-circuiting, so timing
    /// does not reveal how long a matching prefix was.
    pub fn matches(&self, presented: &str) -> bool {
        let ours = self.0.as_bytes();
        let theirs = presented.as_bytes();
        if ours.len() != theirs.len() {
            return false;
        }
        ours.iter().zip(theirs).fold(0u8, |diff, (a, b)| diff | (a ^ b)) == 0
    }
}

/// A word a player holds, with the exact letter tiles it consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedWord {
    /// The word as submitted
    pub word: String,
    /// Letters consumed, uppercased; always one per character of `word`
    pub letters: Vec<char>,
    /// When the claim or steal was made
    pub claimed_at: DateTime<Utc>,
    /// For steals: which word indices were taken from which players
    pub stolen_from: Option<HashMap<PlayerId, BTreeSet<usize>>>,
}

impl ClaimedWord {
    /// A word claimed straight from the flipped pool
    pub fn new(word: &str, claimed_at: DateTime<Utc>) -> Self {
        Self {
            word: word.to_string(),
            letters: upper_letters(word),
            claimed_at,
            stolen_from: None,
        }
    }

    /// A word formed by stealing existing words plus pool letters
    pub fn stolen(
        word: &str,
        claimed_at: DateTime<Utc>,
        stolen_from: HashMap<PlayerId, BTreeSet<usize>>,
    ) -> Self {
        Self {
            word: word.to_string(),
            letters: upper_letters(word),
            claimed_at,
            stolen_from: Some(stolen_from),
        }
    }

    /// Number of letter tiles this word holds
    pub fn letter_count(&self) -> u32 {
        self.letters.len() as u32
    }
}

fn upper_letters(word: &str) -> Vec<char> {
    word.chars().map(|c| c.to_ascii_uppercase()).collect()
}

/// A single player's state within a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Claimed words, oldest first. Steal indices point into this list.
    pub words: Vec<ClaimedWord>,
    /// Total letters held; kept equal to the sum over `words`
    pub score: u32,
    pub joined_at: DateTime<Utc>,
    /// Soft presence. Disconnected players keep their words and stay
    /// stealable.
    pub connected: bool,
    pub reconnect_token: ReconnectToken,
}

impl Player {
    /// Create a new player with a fresh reconnect token
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            words: Vec::new(),
            score: 0,
            joined_at: Utc::now(),
            connected: true,
            reconnect_token: ReconnectToken::generate(&mut rand::thread_rng()),
        }
    }

    /// Recompute `score` from the words actually held
    pub fn recompute_score(&mut self) {
        self.score = self.words.iter().map(ClaimedWord::letter_count).sum();
    }

    /// Public projection of this player, without the reconnect token
    pub fn to_view(&self) -> crate::snapshot::PlayerView {
        crate::snapshot::PlayerView {
            id: self.id,
            name: self.name.clone(),
            words: self.words.clone(),
            score: self.score,
            connected: self.connected,
        }
    }
}
