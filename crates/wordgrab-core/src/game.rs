//! The game state machine.
//!
//! All rule enforcement lives here. A `Game` owns the bag, the flipped
//! pool, and every player's words; each operation validates first and only
//! then mutates, so a rejected call leaves the state exactly as it was.
//! The engine crate runs each game on its own task, which is what makes
//! "validate then mutate" safe without any locking here.

use crate::dictionary::Dictionary;
use crate::player::{ClaimedWord, Player, PlayerId, ReconnectToken};
use crate::scoring::{self, GameOutcome, PlayerScore, Winner};
use crate::snapshot::GameSnapshot;
use crate::steal;
use crate::tiles::{self, LetterCounts};
use crate::turn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use thiserror::Error;

/// Default minimum claimable word length
pub const DEFAULT_MIN_WORD_LENGTH: usize = 3;

/// Game lifecycle. Transitions run strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Fewer than two players so far
    Waiting,
    /// Tiles are being flipped and words claimed
    Playing,
    /// Scores are final
    Finished,
}

/// Why an operation was rejected. Rejections never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("player already joined this game")]
    AlreadyJoined,
    #[error("player not found in this game")]
    PlayerNotFound,
    #[error("game has not started")]
    GameNotStarted,
    #[error("not your turn to flip")]
    NotYourTurn,
    #[error("no tiles left to flip")]
    NoTilesLeft,
    #[error("word is too short")]
    WordTooShort,
    #[error("word is not in the dictionary")]
    NotInDictionary,
    #[error("word cannot be built from the flipped tiles")]
    InvalidTiles,
    #[error("word cannot be built from the stolen words and flipped tiles")]
    InvalidSteal,
    #[error("steal must use at least one flipped tile")]
    MustAddLetter,
    #[error("steal is a trivial extension of the stolen word")]
    InvalidTransformation,
    #[error("already voted to end the game")]
    AlreadyVoted,
}

/// Outcome of a vote: an acknowledgment with the running tally, or the game
/// just ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndVote {
    Recorded { votes: usize, needed: usize },
    Ended(GameOutcome),
}

/// One game's complete state.
///
/// `Game` is the sole mutator of everything it owns. It is deliberately
/// synchronous; serialization of operations is the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// External identifier, assigned by the registry
    pub id: String,
    pub status: GameStatus,
    pub players: HashMap<PlayerId, Player>,
    /// Player ids in the order they joined; drives turn rotation
    pub join_order: Vec<PlayerId>,
    /// Face-down tiles; the front is the next flip
    pub tile_bag: VecDeque<char>,
    /// Face-up tiles available to claim, in flip order
    pub flipped_tiles: Vec<char>,
    /// Shortest word the dictionary gate will accept
    pub min_word_length: usize,
    /// Whose flip it is; `None` until the game starts
    pub current_turn: Option<PlayerId>,
    pub game_started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Players currently voting to end the game
    pub end_votes: HashSet<PlayerId>,
    /// Set once the game finishes
    pub final_scores: Option<Vec<PlayerScore>>,
    pub winner: Option<Winner>,
}

impl Game {
    /// Create a game in the waiting state with a freshly shuffled full bag
    pub fn new(id: String, min_word_length: usize) -> Self {
        Self {
            id,
            status: GameStatus::Waiting,
            players: HashMap::new(),
            join_order: Vec::new(),
            tile_bag: tiles::standard_bag(&mut rand::thread_rng()),
            flipped_tiles: Vec::new(),
            min_word_length,
            current_turn: None,
            game_started_at: None,
            ended_at: None,
            end_votes: HashSet::new(),
            final_scores: None,
            winner: None,
        }
    }

    // ==================== Membership ====================

    /// Add a player. The second join starts the game and hands the new
    /// player the first turn; later joiners drop straight into a running
    /// game.
    pub fn join(&mut self, player_id: PlayerId, name: String) -> Result<ReconnectToken, GameError> {
        if self.players.contains_key(&player_id) {
            return Err(GameError::AlreadyJoined);
        }

        let player = Player::new(player_id, name);
        let token = player.reconnect_token.clone();
        self.players.insert(player_id, player);
        self.join_order.push(player_id);

        if self.status == GameStatus::Waiting && self.players.len() >= 2 {
            self.status = GameStatus::Playing;
            self.current_turn = Some(player_id);
            self.game_started_at = Some(Utc::now());
        } else {
            self.repair_turn();
        }

        Ok(token)
    }

    /// Mark a player connected again
    pub fn reconnect(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(GameError::PlayerNotFound)?;
        player.connected = true;
        self.repair_turn();
        Ok(())
    }

    /// Mark a player disconnected. Their words stay and remain stealable;
    /// their end-vote is withdrawn, and the turn moves on if they held it.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(GameError::PlayerNotFound)?;
        player.connected = false;

        self.end_votes.remove(&player_id);

        if self.current_turn == Some(player_id) {
            self.current_turn = turn::next_turn(&self.join_order, &self.players, player_id);
        }

        Ok(())
    }

    /// Hand the turn back to a connected player if its holder dropped. The
    /// turn only goes stale this way while nobody at all is connected, so a
    /// return or a fresh join must pick it back up.
    fn repair_turn(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        if let Some(current) = self.current_turn {
            let holder_connected = self.players.get(&current).map_or(false, |p| p.connected);
            if !holder_connected {
                self.current_turn = turn::next_turn(&self.join_order, &self.players, current);
            }
        }
    }

    // ==================== Tiles ====================

    /// Flip the next tile into the shared pool. Only the turn holder may
    /// flip, and flipping passes the turn.
    pub fn flip_tile(&mut self, player_id: PlayerId) -> Result<char, GameError> {
        if self.status != GameStatus::Playing {
            return Err(GameError::GameNotStarted);
        }
        if self.current_turn != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }

        let tile = self.tile_bag.pop_front().ok_or(GameError::NoTilesLeft)?;
        self.flipped_tiles.push(tile);
        self.current_turn = turn::next_turn(&self.join_order, &self.players, player_id);

        Ok(tile)
    }

    // ==================== Words ====================

    /// Claim a word built from the flipped pool alone. First come, first
    /// served: the letters leave the pool the moment the claim validates.
    pub fn claim_word(
        &mut self,
        player_id: PlayerId,
        word: &str,
        dictionary: &dyn Dictionary,
        claimed_at: DateTime<Utc>,
    ) -> Result<(), GameError> {
        if self.status != GameStatus::Playing {
            return Err(GameError::GameNotStarted);
        }
        if !self.players.contains_key(&player_id) {
            return Err(GameError::PlayerNotFound);
        }
        self.check_word(word, dictionary)?;

        let needed = LetterCounts::from_word(word).ok_or(GameError::InvalidTiles)?;
        if !LetterCounts::from_letters(&self.flipped_tiles).contains(&needed) {
            return Err(GameError::InvalidTiles);
        }

        tiles::remove_counts(&mut self.flipped_tiles, &needed);
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(GameError::PlayerNotFound)?;
        player.words.push(ClaimedWord::new(word, claimed_at));
        player.recompute_score();

        Ok(())
    }

    /// Steal whole words (from opponents or yourself), add at least one
    /// flipped tile, and form a new word from the combined letters.
    ///
    /// Victims lose the exact words named by index. Stolen letters the new
    /// word does not use are discarded rather than returned to the pool.
    pub fn steal_word(
        &mut self,
        stealer_id: PlayerId,
        word: &str,
        from_players: HashMap<PlayerId, BTreeSet<usize>>,
        dictionary: &dyn Dictionary,
        claimed_at: DateTime<Utc>,
    ) -> Result<(), GameError> {
        if self.status != GameStatus::Playing {
            return Err(GameError::GameNotStarted);
        }
        if !self.players.contains_key(&stealer_id) {
            return Err(GameError::PlayerNotFound);
        }
        self.check_word(word, dictionary)?;

        // Resolve the victims' words against the lists as they stand right
        // now; an index stale from a lost race is simply invalid.
        let mut stolen_words: Vec<String> = Vec::new();
        let mut stolen_letters: Vec<char> = Vec::new();
        for (victim_id, indices) in &from_players {
            let victim = self.players.get(victim_id).ok_or(GameError::PlayerNotFound)?;
            for &index in indices {
                let claimed = victim.words.get(index).ok_or(GameError::InvalidSteal)?;
                stolen_words.push(claimed.word.clone());
                stolen_letters.extend(&claimed.letters);
            }
        }

        let needed = LetterCounts::from_word(word).ok_or(GameError::InvalidSteal)?;
        let stolen_counts = LetterCounts::from_letters(&stolen_letters);
        let mut available = stolen_counts.clone();
        available.add(&LetterCounts::from_letters(&self.flipped_tiles));
        if !available.contains(&needed) {
            return Err(GameError::InvalidSteal);
        }

        // Letters the pool must contribute beyond the stolen words
        let used_flipped = needed.saturating_sub(&stolen_counts);
        if used_flipped.is_empty() {
            return Err(GameError::MustAddLetter);
        }

        let new_letters = used_flipped.total() as usize;
        if stolen_words
            .iter()
            .any(|stolen| steal::is_trivial_extension(word, stolen, new_letters))
        {
            return Err(GameError::InvalidTransformation);
        }

        // All checks passed; apply. Victims lose whole words, highest index
        // first so the lower indices stay valid while removing.
        for (victim_id, indices) in &from_players {
            let victim = self
                .players
                .get_mut(victim_id)
                .ok_or(GameError::PlayerNotFound)?;
            for &index in indices.iter().rev() {
                victim.words.remove(index);
            }
            victim.recompute_score();
        }

        tiles::remove_counts(&mut self.flipped_tiles, &used_flipped);

        let stealer = self
            .players
            .get_mut(&stealer_id)
            .ok_or(GameError::PlayerNotFound)?;
        stealer.words.push(ClaimedWord::stolen(word, claimed_at, from_players));
        stealer.recompute_score();

        Ok(())
    }

    /// Length and dictionary gate shared by claims and steals
    fn check_word(&self, word: &str, dictionary: &dyn Dictionary) -> Result<(), GameError> {
        if word.chars().count() < self.min_word_length {
            return Err(GameError::WordTooShort);
        }
        if !dictionary.contains(word) {
            return Err(GameError::NotInDictionary);
        }
        Ok(())
    }

    // ==================== Ending ====================

    /// Vote to end the game. Once at least half the players (rounded up)
    /// have voted, the game ends immediately.
    pub fn vote_to_end(&mut self, player_id: PlayerId) -> Result<EndVote, GameError> {
        if self.status != GameStatus::Playing {
            return Err(GameError::GameNotStarted);
        }
        if !self.players.contains_key(&player_id) {
            return Err(GameError::PlayerNotFound);
        }
        if !self.end_votes.insert(player_id) {
            return Err(GameError::AlreadyVoted);
        }

        let votes = self.end_votes.len();
        let needed = (self.players.len() + 1) / 2;
        if votes >= needed {
            Ok(EndVote::Ended(self.end_game()))
        } else {
            Ok(EndVote::Recorded { votes, needed })
        }
    }

    /// Finish the game now, whatever state it is in. Idempotent: calling
    /// this on a finished game returns the stored outcome unchanged.
    pub fn end_game(&mut self) -> GameOutcome {
        if self.status == GameStatus::Finished {
            return GameOutcome {
                final_scores: self.final_scores.clone().unwrap_or_default(),
                winner: self.winner.clone(),
            };
        }

        let outcome = scoring::compute_outcome(&self.join_order, &self.players);
        self.status = GameStatus::Finished;
        self.ended_at = Some(Utc::now());
        self.final_scores = Some(outcome.final_scores.clone());
        self.winner = outcome.winner.clone();

        outcome
    }

    // ==================== Views ====================

    /// The published view of this game
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id.clone(),
            status: self.status,
            players: self
                .join_order
                .iter()
                .filter_map(|id| self.players.get(id))
                .map(Player::to_view)
                .collect(),
            flipped_tiles: self.flipped_tiles.clone(),
            tiles_remaining: self.tile_bag.len(),
            current_turn: self.current_turn,
            min_word_length: self.min_word_length,
            end_votes: self
                .join_order
                .iter()
                .copied()
                .filter(|id| self.end_votes.contains(id))
                .collect(),
            final_scores: self.final_scores.clone(),
            winner: self.winner.clone(),
        }
    }

    /// Number of players who ever joined
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Look up a player
    pub fn get_player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(&player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::FixtureDictionary;
    use uuid::Uuid;

    fn dict() -> FixtureDictionary {
        FixtureDictionary::new(["cat", "cats", "cart", "act", "tack", "door", "rat"])
    }

    fn started_game() -> (Game, PlayerId, PlayerId) {
        let mut game = Game::new("g1".to_string(), DEFAULT_MIN_WORD_LENGTH);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        game.join(alice, "Alice".to_string()).unwrap();
        game.join(bob, "Bob".to_string()).unwrap();
        (game, alice, bob)
    }

    fn steal_one(victim: PlayerId, index: usize) -> HashMap<PlayerId, BTreeSet<usize>> {
        let mut from = HashMap::new();
        from.insert(victim, BTreeSet::from([index]));
        from
    }

    #[test]
    fn test_new_game_waits_with_full_bag() {
        let game = Game::new("g1".to_string(), 3);
        assert_eq!(game.status, GameStatus::Waiting);
        assert_eq!(game.tile_bag.len(), tiles::BAG_SIZE);
        assert!(game.flipped_tiles.is_empty());
        assert_eq!(game.current_turn, None);
    }

    #[test]
    fn test_second_join_starts_the_game() {
        let mut game = Game::new("g1".to_string(), 3);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        game.join(alice, "Alice".to_string()).unwrap();
        assert_eq!(game.status, GameStatus::Waiting);
        assert_eq!(game.current_turn, None);
        assert!(game.game_started_at.is_none());

        game.join(bob, "Bob".to_string()).unwrap();
        assert_eq!(game.status, GameStatus::Playing);
        assert_eq!(game.current_turn, Some(bob));
        assert!(game.game_started_at.is_some());
    }

    #[test]
    fn test_join_twice_is_rejected() {
        let (mut game, alice, _) = started_game();
        assert_eq!(
            game.join(alice, "Alice again".to_string()),
            Err(GameError::AlreadyJoined)
        );
        assert_eq!(game.player_count(), 2);
    }

    #[test]
    fn test_late_joiner_enters_running_game() {
        let (mut game, _, bob) = started_game();
        let carol = Uuid::new_v4();
        game.join(carol, "Carol".to_string()).unwrap();

        assert_eq!(game.status, GameStatus::Playing);
        // The turn stays where it was
        assert_eq!(game.current_turn, Some(bob));
        assert_eq!(game.join_order.len(), 3);
    }

    #[test]
    fn test_flip_requires_turn_and_passes_it() {
        let (mut game, alice, bob) = started_game();

        assert_eq!(game.flip_tile(alice), Err(GameError::NotYourTurn));

        let tile = game.flip_tile(bob).unwrap();
        assert_eq!(game.flipped_tiles, vec![tile]);
        assert_eq!(game.tile_bag.len(), tiles::BAG_SIZE - 1);
        assert_eq!(game.current_turn, Some(alice));
    }

    #[test]
    fn test_flip_before_start_is_rejected() {
        let mut game = Game::new("g1".to_string(), 3);
        let alice = Uuid::new_v4();
        game.join(alice, "Alice".to_string()).unwrap();
        assert_eq!(game.flip_tile(alice), Err(GameError::GameNotStarted));
    }

    #[test]
    fn test_flip_empty_bag() {
        let (mut game, _, bob) = started_game();
        game.tile_bag.clear();
        assert_eq!(game.flip_tile(bob), Err(GameError::NoTilesLeft));
    }

    #[test]
    fn test_claim_takes_letters_and_scores() {
        let (mut game, alice, _) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T', 'R'];

        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        assert_eq!(game.flipped_tiles, vec!['R']);
        let player = game.get_player(alice).unwrap();
        assert_eq!(player.words.len(), 1);
        assert_eq!(player.words[0].word, "cat");
        assert_eq!(player.score, 3);
    }

    #[test]
    fn test_claim_rejections_leave_state_alone() {
        let (mut game, alice, _) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T'];

        assert_eq!(
            game.claim_word(alice, "at", &dict(), Utc::now()),
            Err(GameError::WordTooShort)
        );
        assert_eq!(
            game.claim_word(alice, "tac", &dict(), Utc::now()),
            Err(GameError::NotInDictionary)
        );
        assert_eq!(
            game.claim_word(alice, "cart", &dict(), Utc::now()),
            Err(GameError::InvalidTiles)
        );
        assert_eq!(
            game.claim_word(Uuid::new_v4(), "cat", &dict(), Utc::now()),
            Err(GameError::PlayerNotFound)
        );

        assert_eq!(game.flipped_tiles, vec!['C', 'A', 'T']);
        assert_eq!(game.get_player(alice).unwrap().score, 0);
    }

    #[test]
    fn test_claimed_letters_leave_the_pool() {
        let (mut game, alice, _) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T', 'S'];

        // The pool covers "cats" exactly once; a second claim finds nothing
        game.claim_word(alice, "cats", &dict(), Utc::now()).unwrap();
        assert_eq!(
            game.claim_word(alice, "cat", &dict(), Utc::now()),
            Err(GameError::InvalidTiles)
        );
    }

    #[test]
    fn test_steal_transforms_a_word() {
        let (mut game, alice, bob) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T', 'R'];
        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        game.steal_word(bob, "cart", steal_one(alice, 0), &dict(), Utc::now())
            .unwrap();

        assert!(game.get_player(alice).unwrap().words.is_empty());
        assert_eq!(game.get_player(alice).unwrap().score, 0);

        let bob_state = game.get_player(bob).unwrap();
        assert_eq!(bob_state.words.len(), 1);
        assert_eq!(bob_state.words[0].word, "cart");
        assert_eq!(bob_state.score, 4);
        assert!(bob_state.words[0].stolen_from.is_some());

        assert!(game.flipped_tiles.is_empty());
    }

    #[test]
    fn test_steal_without_pool_letter_is_rejected() {
        let (mut game, alice, bob) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T'];
        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        // "act" is an anagram of the stolen word; no pool tile is used
        assert_eq!(
            game.steal_word(bob, "act", steal_one(alice, 0), &dict(), Utc::now()),
            Err(GameError::MustAddLetter)
        );
        assert_eq!(game.get_player(alice).unwrap().words.len(), 1);
    }

    #[test]
    fn test_trivial_steal_is_rejected() {
        let (mut game, alice, bob) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T', 'S'];
        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        assert_eq!(
            game.steal_word(bob, "cats", steal_one(alice, 0), &dict(), Utc::now()),
            Err(GameError::InvalidTransformation)
        );

        // The rejected steal consumed nothing
        assert_eq!(game.flipped_tiles, vec!['S']);
        assert_eq!(game.get_player(alice).unwrap().words.len(), 1);
    }

    #[test]
    fn test_steal_with_stale_index_is_rejected() {
        let (mut game, alice, bob) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T', 'R'];
        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        assert_eq!(
            game.steal_word(bob, "cart", steal_one(alice, 1), &dict(), Utc::now()),
            Err(GameError::InvalidSteal)
        );
    }

    #[test]
    fn test_steal_needing_absent_letters_is_rejected() {
        let (mut game, alice, bob) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T'];
        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        // The claim drained the pool; the R has to come from somewhere
        assert_eq!(
            game.steal_word(bob, "cart", steal_one(alice, 0), &dict(), Utc::now()),
            Err(GameError::InvalidSteal)
        );
    }

    #[test]
    fn test_steal_from_unknown_player() {
        let (mut game, _, bob) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'R', 'T'];

        assert_eq!(
            game.steal_word(bob, "cart", steal_one(Uuid::new_v4(), 0), &dict(), Utc::now()),
            Err(GameError::PlayerNotFound)
        );
    }

    #[test]
    fn test_self_steal_is_legal() {
        let (mut game, alice, _) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T', 'K'];
        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        game.steal_word(alice, "tack", steal_one(alice, 0), &dict(), Utc::now())
            .unwrap();

        let player = game.get_player(alice).unwrap();
        assert_eq!(player.words.len(), 1);
        assert_eq!(player.words[0].word, "tack");
        assert_eq!(player.score, 4);
    }

    #[test]
    fn test_partial_reuse_discards_leftovers() {
        let (mut game, alice, bob) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T', 'S', 'R', 'A'];
        game.claim_word(alice, "cats", &dict(), Utc::now()).unwrap();
        assert_eq!(game.flipped_tiles, vec!['R', 'A']);

        // "rat" reuses R from the pool plus A, T from "cats"; C and S are
        // gone for good.
        game.steal_word(bob, "rat", steal_one(alice, 0), &dict(), Utc::now())
            .unwrap();

        assert_eq!(game.flipped_tiles, vec!['A']);
        assert_eq!(game.get_player(bob).unwrap().score, 3);
        assert_eq!(game.get_player(alice).unwrap().score, 0);

        // Letter accounting: 4 stolen + 1 pool tile went in, 3 came out
        // held, so 2 tiles left the game.
        let held: u32 = game.players.values().map(|p| p.score).sum();
        assert_eq!(held, 3);
    }

    #[test]
    fn test_disconnect_rotates_turn_and_drops_vote() {
        let (mut game, alice, bob) = started_game();
        let carol = Uuid::new_v4();
        game.join(carol, "Carol".to_string()).unwrap();

        // One vote of the two needed; disconnecting must withdraw it
        assert_eq!(
            game.vote_to_end(bob),
            Ok(EndVote::Recorded { votes: 1, needed: 2 })
        );

        assert_eq!(game.current_turn, Some(bob));
        game.disconnect(bob).unwrap();

        assert!(!game.get_player(bob).unwrap().connected);
        assert_eq!(game.current_turn, Some(alice));
        assert!(game.end_votes.is_empty());
        assert_eq!(game.status, GameStatus::Playing);
    }

    #[test]
    fn test_parked_turn_follows_returning_players() {
        let (mut game, alice, bob) = started_game();

        game.disconnect(bob).unwrap();
        assert_eq!(game.current_turn, Some(alice));

        // Nobody left: the turn parks on the first joiner
        game.disconnect(alice).unwrap();
        assert_eq!(game.current_turn, Some(alice));

        // Bob returns alone and the stale turn moves to him
        game.reconnect(bob).unwrap();
        assert_eq!(game.current_turn, Some(bob));

        // Park it again, then let a fresh joiner pick it up
        game.disconnect(bob).unwrap();
        assert_eq!(game.current_turn, Some(alice));
        let carol = Uuid::new_v4();
        game.join(carol, "Carol".to_string()).unwrap();
        assert_eq!(game.current_turn, Some(carol));
    }

    #[test]
    fn test_reconnect_restores_presence() {
        let (mut game, alice, _) = started_game();
        game.disconnect(alice).unwrap();
        game.reconnect(alice).unwrap();
        assert!(game.get_player(alice).unwrap().connected);

        assert_eq!(game.reconnect(Uuid::new_v4()), Err(GameError::PlayerNotFound));
    }

    #[test]
    fn test_vote_majority_ends_game() {
        let (mut game, alice, bob) = started_game();
        let carol = Uuid::new_v4();
        game.join(carol, "Carol".to_string()).unwrap();

        // Three players: two votes needed
        assert_eq!(
            game.vote_to_end(alice),
            Ok(EndVote::Recorded { votes: 1, needed: 2 })
        );
        assert_eq!(game.vote_to_end(alice), Err(GameError::AlreadyVoted));

        match game.vote_to_end(bob) {
            Ok(EndVote::Ended(outcome)) => {
                assert_eq!(outcome.final_scores.len(), 3);
            }
            other => panic!("expected the game to end, got {:?}", other),
        }
        assert_eq!(game.status, GameStatus::Finished);
        assert!(game.ended_at.is_some());
    }

    #[test]
    fn test_operations_rejected_after_finish() {
        let (mut game, alice, bob) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T'];
        game.end_game();

        assert_eq!(game.flip_tile(bob), Err(GameError::GameNotStarted));
        assert_eq!(
            game.claim_word(alice, "cat", &dict(), Utc::now()),
            Err(GameError::GameNotStarted)
        );
        assert_eq!(game.vote_to_end(alice), Err(GameError::GameNotStarted));
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let (mut game, alice, _) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T'];
        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        let first = game.end_game();
        let again = game.end_game();
        assert_eq!(first, again);
        assert_eq!(first.winner, Some(Winner::Single(alice)));
    }

    #[test]
    fn test_snapshot_hides_secrets() {
        let (mut game, alice, _) = started_game();
        game.flipped_tiles = vec!['C', 'A', 'T'];
        game.claim_word(alice, "cat", &dict(), Utc::now()).unwrap();

        let snapshot = game.snapshot();
        assert_eq!(snapshot.tiles_remaining, tiles::BAG_SIZE);
        assert_eq!(snapshot.players.len(), 2);
        assert_eq!(snapshot.players[0].name, "Alice");

        // Neither the bag order nor any reconnect token appears anywhere
        // in the serialized form.
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("tile_bag"));
        assert!(!json.contains("reconnect_token"));
        let bag_as_string: String = game.tile_bag.iter().collect();
        assert!(!json.contains(&bag_as_string));
    }
}
