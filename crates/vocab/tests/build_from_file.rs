//! Vocabulary construction from text files

use corpora_core::Error;
use corpora_vocab::{Vocabulary, VocabularyOptions};
use proptest::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn corpus(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("corpus.txt");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_indices_follow_descending_frequency() {
    let dir = TempDir::new().unwrap();
    let path = corpus(&dir, "b a c a\nc a\nd\n");

    let vocab = Vocabulary::build_from_file(&path, &VocabularyOptions::default()).unwrap();

    // a:3, c:2, then b and d tie at 1 and sort by word
    assert_eq!(vocab.index_of("a"), Some(0));
    assert_eq!(vocab.index_of("c"), Some(1));
    assert_eq!(vocab.index_of("b"), Some(2));
    assert_eq!(vocab.index_of("d"), Some(3));
    assert_eq!(vocab.frequency("a"), Some(3));
    assert_eq!(vocab.frequency("d"), Some(1));
}

#[test]
fn test_frequency_bounds_and_stopwords() {
    let dir = TempDir::new().unwrap();
    let path = corpus(&dir, "the cat the dog\nthe cat sat\nthe end\n");

    let options = VocabularyOptions::default()
        .with_lo(1)
        .with_hi(2)
        .with_stopwords(["sat"]);
    let vocab = Vocabulary::build_from_file(&path, &options).unwrap();

    assert!(!vocab.contains("the"), "frequency 4 is above hi");
    assert!(!vocab.contains("sat"), "stopword");
    assert!(vocab.contains("cat"));
    assert!(vocab.contains("dog"));
    assert!(vocab.contains("end"));
    assert_eq!(vocab.len(), 3);
}

#[test]
fn test_lower_bound_prunes_rare_words() {
    let dir = TempDir::new().unwrap();
    let path = corpus(&dir, "x y\nx z\nx\n");

    let vocab =
        Vocabulary::build_from_file(&path, &VocabularyOptions::default().with_lo(2)).unwrap();
    assert_eq!(vocab.len(), 1);
    assert!(vocab.contains("x"));
}

#[test]
fn test_invalid_options_rejected() {
    let dir = TempDir::new().unwrap();
    let path = corpus(&dir, "a\n");
    let options = VocabularyOptions::default().with_lo(3).with_hi(1);
    assert!(matches!(
        Vocabulary::build_from_file(&path, &options),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = Vocabulary::build_from_file(
        dir.path().join("missing.txt"),
        &VocabularyOptions::default(),
    );
    assert!(matches!(result, Err(Error::Open { .. })));
}

#[test]
fn test_serde_rebuilds_lookup() {
    let dir = TempDir::new().unwrap();
    let path = corpus(&dir, "cat dog cat\n");
    let vocab = Vocabulary::build_from_file(&path, &VocabularyOptions::default()).unwrap();

    let bytes = bincode::serialize(&vocab).unwrap();
    let restored: Vocabulary = bincode::deserialize(&bytes).unwrap();

    assert_eq!(restored, vocab);
    assert_eq!(restored.index_of("dog"), vocab.index_of("dog"));
    assert_eq!(restored.frequency("cat"), Some(2));
}

proptest! {
    /// Tokenized output keeps only known words, in their original order.
    #[test]
    fn tokenize_is_an_order_preserving_filter(
        known in proptest::collection::hash_set("[a-e]{1,2}", 0..8),
        line in proptest::collection::vec("[a-e]{1,2}", 0..20),
    ) {
        let known: Vec<String> = known.into_iter().collect();
        let vocab = Vocabulary::from_words(known.iter().cloned()).unwrap();
        let tokens = vocab.tokenize(&line.join(" "));

        let expected: Vec<u32> = line
            .iter()
            .filter_map(|w| vocab.index_of(w))
            .collect();
        prop_assert_eq!(&tokens, &expected);
        for id in tokens {
            prop_assert!(vocab.word(id).is_some());
        }
    }
}
