//! Word validity: a membership oracle injected into the game.
//!
//! The game core never knows where words come from. It asks the oracle and
//! treats the answer as final, so swapping lexicons (or stubbing one in a
//! test) never touches game logic.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Case-insensitive word membership.
///
/// Implementations that cannot answer (missing backing store, failed lookup)
/// must return `false`; a word is never implicitly valid.
pub trait Dictionary: Send + Sync {
    fn contains(&self, word: &str) -> bool;
}

/// Dictionary backed by a newline-delimited word list.
#[derive(Debug, Clone)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Load a word list, one word per line. Surrounding whitespace and blank
    /// lines are ignored.
    pub fn from_reader<R: Read>(reader: R) -> io::Result<Self> {
        let mut words = HashSet::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                words.insert(word.to_uppercase());
            }
        }
        Ok(Self { words })
    }

    /// Load a word list from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Number of words loaded
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_uppercase())
    }
}

/// In-memory dictionary for tests: exactly the words given, nothing else.
#[derive(Debug, Clone, Default)]
pub struct FixtureDictionary {
    words: HashSet<String>,
}

impl FixtureDictionary {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_uppercase()).collect(),
        }
    }
}

impl Dictionary for FixtureDictionary {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_word_list_from_reader() {
        let input = Cursor::new("cat\nCART\n  dog  \n\nhorse\n");
        let list = WordList::from_reader(input).unwrap();
        assert_eq!(list.len(), 4);
        assert!(list.contains("cat"));
        assert!(list.contains("CAT"));
        assert!(list.contains("cart"));
        assert!(list.contains("dog"));
        assert!(!list.contains("pony"));
    }

    #[test]
    fn test_empty_word_list_rejects_everything() {
        let list = WordList::from_reader(Cursor::new("")).unwrap();
        assert!(list.is_empty());
        assert!(!list.contains("cat"));
    }

    #[test]
    fn test_fixture_dictionary() {
        let dict = FixtureDictionary::new(["cat", "cart"]);
        assert!(dict.contains("CaT"));
        assert!(dict.contains("cart"));
        assert!(!dict.contains("cats"));
    }
}
