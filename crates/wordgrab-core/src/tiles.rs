//! Letter tiles and multiset arithmetic.
//!
//! This module contains:
//! - The letter frequency table and bag construction
//! - LetterCounts, a multiset over A-Z used for every "can this word be
//!   built from these letters" question
//! - Helpers to test formability and to consume letters from the shared pool

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Letter frequencies for a full bag (26 letters, 100 tiles).
///
/// English Scrabble counts with the two blanks replaced by an extra E and an
/// extra S, keeping the bag at 100 plain letters.
pub const LETTER_DISTRIBUTION: [(char, u32); 26] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 4),
    ('E', 13),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 5),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
];

/// Number of tiles in a fresh bag.
pub const BAG_SIZE: usize = 100;

/// Build a freshly shuffled tile bag. The front of the deque is the next
/// tile to flip.
pub fn standard_bag<R: Rng>(rng: &mut R) -> VecDeque<char> {
    let mut tiles = Vec::with_capacity(BAG_SIZE);
    for (letter, count) in LETTER_DISTRIBUTION {
        tiles.extend(std::iter::repeat(letter).take(count as usize));
    }
    tiles.shuffle(rng);
    tiles.into()
}

/// A multiset of letters A-Z.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterCounts([u32; 26]);

impl LetterCounts {
    /// Create an empty multiset
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the letters of a word, case-insensitively. Returns `None` if
    /// the word contains anything outside A-Z; such a word can never be
    /// built from tiles.
    pub fn from_word(word: &str) -> Option<Self> {
        let mut counts = Self::new();
        for c in word.chars() {
            let upper = c.to_ascii_uppercase();
            if !upper.is_ascii_uppercase() {
                return None;
            }
            counts.0[(upper as u8 - b'A') as usize] += 1;
        }
        Some(counts)
    }

    /// Count a slice of tiles. Anything outside A-Z is ignored; tiles are
    /// always uppercase letters.
    pub fn from_letters(letters: &[char]) -> Self {
        let mut counts = Self::new();
        for &c in letters {
            let upper = c.to_ascii_uppercase();
            if upper.is_ascii_uppercase() {
                counts.0[(upper as u8 - b'A') as usize] += 1;
            }
        }
        counts
    }

    /// Count of a single letter
    pub fn count(&self, letter: char) -> u32 {
        let upper = letter.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            self.0[(upper as u8 - b'A') as usize]
        } else {
            0
        }
    }

    /// Total number of letters
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Check if the multiset is empty
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Check that every count in `needed` is covered by this multiset
    pub fn contains(&self, needed: &LetterCounts) -> bool {
        self.0.iter().zip(&needed.0).all(|(have, need)| have >= need)
    }

    /// Add another multiset to this one
    pub fn add(&mut self, other: &LetterCounts) {
        for (count, extra) in self.0.iter_mut().zip(&other.0) {
            *count += extra;
        }
    }

    /// Per-letter difference, clamped at zero
    pub fn saturating_sub(&self, other: &LetterCounts) -> LetterCounts {
        let mut result = Self::new();
        for i in 0..26 {
            result.0[i] = self.0[i].saturating_sub(other.0[i]);
        }
        result
    }

    /// Remove one occurrence of `letter` if present, reporting whether it was
    fn take(&mut self, letter: char) -> bool {
        let upper = letter.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return false;
        }
        let idx = (upper as u8 - b'A') as usize;
        if self.0[idx] > 0 {
            self.0[idx] -= 1;
            true
        } else {
            false
        }
    }
}

/// Whether `word` can be built from the letters in `pool`. Words with
/// characters outside A-Z are never formable.
pub fn formable(word: &str, pool: &[char]) -> bool {
    match LetterCounts::from_word(word) {
        Some(needed) => LetterCounts::from_letters(pool).contains(&needed),
        None => false,
    }
}

/// Remove `counts` from `pool`, consuming the earliest occurrence of each
/// needed letter and keeping the remaining tiles in order. The pool must
/// cover the counts.
pub fn remove_counts(pool: &mut Vec<char>, counts: &LetterCounts) {
    debug_assert!(LetterCounts::from_letters(pool).contains(counts));
    let mut remaining = counts.clone();
    pool.retain(|&c| !remaining.take(c));
}
