//! The anti-trivial-steal heuristic.
//!
//! Stealing is meant to transform a word, not merely pluralize or inflect
//! it. The rules are lexical and deliberately cheap: they look at the new
//! word, one stolen word, and how many pool tiles the steal consumed.

/// Suffixes that make a steal trivial when at most two pool tiles were used.
const SHORT_STEAL_SUFFIXES: [&str; 13] = [
    "s", "es", "ed", "ing", "ly", "er", "est", "ness", "ment", "ful", "less", "able", "ible",
];

/// Suffixes that still mark a steal as trivial when three or more pool
/// tiles were used, provided the stolen word survives as a prefix.
const LONG_STEAL_SUFFIXES: [&str; 5] = ["ing", "ness", "ment", "tion", "ation"];

/// Whether `new_word` is a trivial extension of `stolen_word`, given that
/// the steal pulled `new_letters` tiles from the pool. Case-insensitive.
///
/// A steal of several words is trivial if it trivially extends any one of
/// them; callers check each stolen word in turn.
pub fn is_trivial_extension(new_word: &str, stolen_word: &str, new_letters: usize) -> bool {
    let new_lower = new_word.to_lowercase();
    let stolen_lower = stolen_word.to_lowercase();

    // Every trivial form keeps the stolen word as a prefix. Anything that
    // reorders its letters is a real transformation.
    let Some(added) = new_lower.strip_prefix(stolen_lower.as_str()) else {
        return false;
    };

    if new_letters <= 2 {
        // A known suffix tacked straight on, or a pure append of exactly
        // the tiles taken from the pool.
        SHORT_STEAL_SUFFIXES.contains(&added) || added.chars().count() == new_letters
    } else {
        LONG_STEAL_SUFFIXES
            .iter()
            .any(|suffix| new_lower.ends_with(suffix))
    }
}
