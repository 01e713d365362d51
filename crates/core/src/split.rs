//! Whitespace word splitting
//!
//! Lines are split on the literal space character with no escaping or
//! normalization. Runs of spaces produce no empty words.

/// Split a line into words on `' '`.
///
/// # Example
///
/// ```
/// use corpora_core::split::split_words;
///
/// let words: Vec<&str> = split_words("the  cat sat").collect();
/// assert_eq!(words, vec!["the", "cat", "sat"]);
/// ```
pub fn split_words(line: &str) -> impl Iterator<Item = &str> {
    line.split(' ').filter(|w| !w.is_empty())
}

/// Strip one trailing `\n` or `\r\n` from raw line bytes.
pub fn trim_line_ending(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_basic() {
        let words: Vec<&str> = split_words("the cat sat on the dog").collect();
        assert_eq!(words, vec!["the", "cat", "sat", "on", "the", "dog"]);
    }

    #[test]
    fn test_split_empty() {
        assert_eq!(split_words("").count(), 0);
        assert_eq!(split_words("    ").count(), 0);
    }

    #[test]
    fn test_split_keeps_punctuation_and_tabs() {
        // Only spaces separate words
        let words: Vec<&str> = split_words("a,b\tc d").collect();
        assert_eq!(words, vec!["a,b\tc", "d"]);
    }

    #[test]
    fn test_trim_line_ending() {
        let mut s = b"hello\r\n".to_vec();
        trim_line_ending(&mut s);
        assert_eq!(s, b"hello");

        let mut s = b"hello\n".to_vec();
        trim_line_ending(&mut s);
        assert_eq!(s, b"hello");

        let mut s = b"hello".to_vec();
        trim_line_ending(&mut s);
        assert_eq!(s, b"hello");

        // A lone '\r' is content
        let mut s = b"hello\r".to_vec();
        trim_line_ending(&mut s);
        assert_eq!(s, b"hello\r");
    }

    proptest! {
        #[test]
        fn split_then_join_drops_only_spaces(words in proptest::collection::vec("[a-z]{1,6}", 0..12)) {
            let line = words.join("  ");
            let split: Vec<&str> = split_words(&line).collect();
            prop_assert_eq!(split, words.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
