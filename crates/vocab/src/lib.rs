//! Word vocabularies for corpora
//!
//! A [`Vocabulary`] maps words to dense integer indices. It is built either
//! from an explicit word list or by counting word frequencies in a text file
//! and keeping the words admitted by [`VocabularyOptions`].
//!
//! Indices of a file-built vocabulary are assigned by descending frequency,
//! ties broken by the word itself, starting at 0.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod options;

pub use options::VocabularyOptions;

use corpora_core::split::split_words;
use corpora_core::{Error, Result, TokenId};
use corpora_storage::lines::for_each_line;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Bidirectional word ↔ index mapping with per-word frequencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyRepr", into = "VocabularyRepr")]
pub struct Vocabulary {
    words: Vec<String>,
    counts: Vec<u64>,
    index: HashMap<String, TokenId>,
}

/// Persisted form; the lookup map is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct VocabularyRepr {
    words: Vec<String>,
    counts: Vec<u64>,
}

impl From<Vocabulary> for VocabularyRepr {
    fn from(vocab: Vocabulary) -> Self {
        VocabularyRepr {
            words: vocab.words,
            counts: vocab.counts,
        }
    }
}

impl TryFrom<VocabularyRepr> for Vocabulary {
    type Error = String;

    fn try_from(repr: VocabularyRepr) -> std::result::Result<Self, String> {
        if repr.words.len() != repr.counts.len() {
            return Err(format!(
                "vocabulary has {} words but {} counts",
                repr.words.len(),
                repr.counts.len()
            ));
        }
        let mut index = HashMap::with_capacity(repr.words.len());
        for (i, word) in repr.words.iter().enumerate() {
            let id = TokenId::try_from(i).map_err(|_| "vocabulary too large".to_string())?;
            if index.insert(word.clone(), id).is_some() {
                return Err(format!("duplicate vocabulary word {:?}", word));
            }
        }
        Ok(Vocabulary {
            words: repr.words,
            counts: repr.counts,
            index,
        })
    }
}

impl Vocabulary {
    /// Build from words in order; the first occurrence of a word gets the
    /// next index, later duplicates are ignored. Frequencies are zero.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Vocabulary {
            words: Vec::new(),
            counts: Vec::new(),
            index: HashMap::new(),
        };
        for word in words {
            vocab.insert(word.into(), 0)?;
        }
        Ok(vocab)
    }

    /// Count word frequencies in a text file and keep admitted words.
    pub fn build_from_file(path: impl AsRef<Path>, options: &VocabularyOptions) -> Result<Self> {
        options.validate()?;
        let path = path.as_ref();

        let mut frequencies: HashMap<String, u64> = HashMap::new();
        let lines = for_each_line(path, |_, line| {
            for word in split_words(&line) {
                *frequencies.entry(word.to_string()).or_insert(0) += 1;
            }
        })?;

        let mut admitted: Vec<(String, u64)> = frequencies
            .into_iter()
            .filter(|(word, count)| options.admits_count(*count) && !options.stopwords.contains(word))
            .collect();
        admitted.sort_by(|(wa, ca), (wb, cb)| cb.cmp(ca).then_with(|| wa.cmp(wb)));

        let mut vocab = Vocabulary::from_words(std::iter::empty::<String>())?;
        for (word, count) in admitted {
            vocab.insert(word, count)?;
        }

        info!(
            path = %path.display(),
            lines,
            words = vocab.len(),
            "Built vocabulary"
        );
        Ok(vocab)
    }

    fn insert(&mut self, word: String, count: u64) -> Result<()> {
        if self.index.contains_key(&word) {
            return Ok(());
        }
        let id = TokenId::try_from(self.words.len())
            .map_err(|_| Error::Config("vocabulary exceeds TokenId range".into()))?;
        self.index.insert(word.clone(), id);
        self.words.push(word);
        self.counts.push(count);
        Ok(())
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if the vocabulary has no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True if `word` is in the vocabulary
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Index of `word`, if present
    pub fn index_of(&self, word: &str) -> Option<TokenId> {
        self.index.get(word).copied()
    }

    /// Word at index `id`, if in range
    pub fn word(&self, id: TokenId) -> Option<&str> {
        self.words.get(id as usize).map(String::as_str)
    }

    /// Frequency recorded for `word` when the vocabulary was built
    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.index_of(word).map(|id| self.counts[id as usize])
    }

    /// Words in index order
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str)> {
        self.words
            .iter()
            .enumerate()
            .map(|(i, w)| (i as TokenId, w.as_str()))
    }

    /// Split `text` on spaces, drop unknown words, and map the rest to
    /// indices in their original order.
    pub fn tokenize(&self, text: &str) -> Vec<TokenId> {
        split_words(text)
            .filter_map(|word| self.index_of(word))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_words_assigns_in_order() {
        let vocab = Vocabulary::from_words(["cat", "dog", "cat"]).unwrap();
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.index_of("cat"), Some(0));
        assert_eq!(vocab.index_of("dog"), Some(1));
        assert_eq!(vocab.word(1), Some("dog"));
        assert_eq!(vocab.word(2), None);
        assert!(!vocab.contains("bird"));
    }

    #[test]
    fn test_tokenize_drops_unknown_words() {
        let vocab = Vocabulary::from_words(["cat", "dog"]).unwrap();
        assert_eq!(vocab.tokenize("the cat sat on the dog"), vec![0, 1]);
        assert_eq!(vocab.tokenize("dog dog cat"), vec![1, 1, 0]);
        assert!(vocab.tokenize("nothing known here").is_empty());
        assert!(vocab.tokenize("").is_empty());
    }

    #[test]
    fn test_iter_in_index_order() {
        let vocab = Vocabulary::from_words(["b", "a"]).unwrap();
        let items: Vec<_> = vocab.iter().collect();
        assert_eq!(items, vec![(0, "b"), (1, "a")]);
    }

    #[test]
    fn test_repr_rejects_mismatched_counts() {
        let repr = VocabularyRepr {
            words: vec!["a".into()],
            counts: vec![],
        };
        assert!(Vocabulary::try_from(repr).is_err());
    }

    #[test]
    fn test_repr_rejects_duplicates() {
        let repr = VocabularyRepr {
            words: vec!["a".into(), "a".into()],
            counts: vec![1, 1],
        };
        assert!(Vocabulary::try_from(repr).is_err());
    }
}
