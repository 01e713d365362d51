//! Vocabulary construction options

use corpora_core::{Error, Result};
use std::collections::HashSet;

/// Membership rules applied when building a vocabulary from a file.
///
/// A word is kept when its frequency `c` satisfies `lo <= c`, and `c <= hi`
/// if an upper bound is set, and it is not a stopword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyOptions {
    /// Minimum frequency (inclusive)
    pub lo: u64,
    /// Maximum frequency (inclusive), unbounded if `None`
    pub hi: Option<u64>,
    /// Words never admitted
    pub stopwords: HashSet<String>,
}

impl Default for VocabularyOptions {
    fn default() -> Self {
        VocabularyOptions {
            lo: 1,
            hi: None,
            stopwords: HashSet::new(),
        }
    }
}

impl VocabularyOptions {
    /// Set the minimum frequency
    pub fn with_lo(mut self, lo: u64) -> Self {
        self.lo = lo;
        self
    }

    /// Set the maximum frequency
    pub fn with_hi(mut self, hi: u64) -> Self {
        self.hi = Some(hi);
        self
    }

    /// Add stopwords
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords.extend(words.into_iter().map(Into::into));
        self
    }

    /// True if a word with `count` occurrences passes the frequency bounds
    pub fn admits_count(&self, count: u64) -> bool {
        count >= self.lo && self.hi.map_or(true, |hi| count <= hi)
    }

    /// Validate the bounds
    pub fn validate(&self) -> Result<()> {
        if let Some(hi) = self.hi {
            if hi < self.lo {
                return Err(Error::Config(format!(
                    "vocabulary upper bound {} is below lower bound {}",
                    hi, self.lo
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_admits_everything_seen() {
        let options = VocabularyOptions::default();
        assert!(!options.admits_count(0));
        assert!(options.admits_count(1));
        assert!(options.admits_count(1_000_000));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_bounds() {
        let options = VocabularyOptions::default().with_lo(2).with_hi(3);
        assert!(!options.admits_count(1));
        assert!(options.admits_count(2));
        assert!(options.admits_count(3));
        assert!(!options.admits_count(4));
    }

    #[test]
    fn test_invalid_bounds() {
        let options = VocabularyOptions::default().with_lo(5).with_hi(2);
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_stopwords_builder() {
        let options = VocabularyOptions::default().with_stopwords(["the", "on"]);
        assert!(options.stopwords.contains("the"));
        assert!(options.stopwords.contains("on"));
    }
}
