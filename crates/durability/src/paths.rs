//! Artifact paths for a built corpus
//!
//! The build pipeline writes three correlated files next to an output base:
//!
//! ```text
//! <base>.bin   # one framed record per source line (raw text)
//! <base>.tok   # one framed record per source line (token indices)
//! <base>.idx   # the offset index
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default extension of the serialized-document artifact
pub const DOCUMENTS_EXTENSION: &str = "bin";
/// Default extension of the serialized-token artifact
pub const TOKENS_EXTENSION: &str = "tok";
/// Default extension of the offset index artifact
pub const INDEX_EXTENSION: &str = "idx";

/// Append `.ext` to a path without replacing an existing extension.
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Paths of the three artifacts produced by one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifacts {
    /// Serialized raw-line records
    pub documents: PathBuf,
    /// Serialized token-index records
    pub tokens: PathBuf,
    /// Offset index
    pub index: PathBuf,
}

impl BuildArtifacts {
    /// Artifacts at `<base>.bin`, `<base>.tok`, `<base>.idx`
    pub fn from_base(base: impl AsRef<Path>) -> Self {
        Self::with_extensions(base, DOCUMENTS_EXTENSION, TOKENS_EXTENSION, INDEX_EXTENSION)
    }

    /// Artifacts with custom extensions
    pub fn with_extensions(
        base: impl AsRef<Path>,
        documents: &str,
        tokens: &str,
        index: &str,
    ) -> Self {
        let base = base.as_ref();
        BuildArtifacts {
            documents: append_extension(base, documents),
            tokens: append_extension(base, tokens),
            index: append_extension(base, index),
        }
    }

    /// True if all three files exist
    pub fn exist(&self) -> bool {
        self.documents.exists() && self.tokens.exists() && self.index.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_existing_extension() {
        assert_eq!(
            append_extension(Path::new("/data/corpus.txt"), "token"),
            PathBuf::from("/data/corpus.txt.token")
        );
    }

    #[test]
    fn test_from_base() {
        let artifacts = BuildArtifacts::from_base("/tmp/out/wiki");
        assert_eq!(artifacts.documents, PathBuf::from("/tmp/out/wiki.bin"));
        assert_eq!(artifacts.tokens, PathBuf::from("/tmp/out/wiki.tok"));
        assert_eq!(artifacts.index, PathBuf::from("/tmp/out/wiki.idx"));
    }

    #[test]
    fn test_exist_false_for_missing() {
        assert!(!BuildArtifacts::from_base("/nonexistent/base").exist());
    }
}
