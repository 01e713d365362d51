//! Corpus configuration
//!
//! Controls how a corpus names its derived files, how large a single record
//! may be, and whether saves are fsynced.

use corpora_core::{Error, Result};
use corpora_durability::paths::{DOCUMENTS_EXTENSION, INDEX_EXTENSION, TOKENS_EXTENSION};
use corpora_durability::BuildArtifacts;
use corpora_storage::DEFAULT_MAX_RECORD_BYTES;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Corpus configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusConfig {
    /// Suffix appended to the text location to name the token file
    pub token_suffix: String,
    /// Extension of the build pipeline's document artifact
    pub documents_extension: String,
    /// Extension of the build pipeline's token artifact
    pub tokens_extension: String,
    /// Extension of the build pipeline's index artifact
    pub index_extension: String,
    /// Largest record payload accepted when reading (default: 64MB)
    pub max_record_bytes: u32,
    /// fsync saved snapshots (default: true)
    pub sync_on_save: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            token_suffix: ".token".to_string(),
            documents_extension: DOCUMENTS_EXTENSION.to_string(),
            tokens_extension: TOKENS_EXTENSION.to_string(),
            index_extension: INDEX_EXTENSION.to_string(),
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            sync_on_save: true,
        }
    }
}

impl CorpusConfig {
    /// Create config for testing
    ///
    /// Skips fsync and uses a small record limit.
    pub fn for_testing() -> Self {
        CorpusConfig {
            max_record_bytes: 1024 * 1024,
            sync_on_save: false,
            ..Default::default()
        }
    }

    /// Set the token file suffix
    pub fn with_token_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.token_suffix = suffix.into();
        self
    }

    /// Set the build artifact extensions
    pub fn with_artifact_extensions(
        mut self,
        documents: impl Into<String>,
        tokens: impl Into<String>,
        index: impl Into<String>,
    ) -> Self {
        self.documents_extension = documents.into();
        self.tokens_extension = tokens.into();
        self.index_extension = index.into();
        self
    }

    /// Set the per-record size limit
    pub fn with_max_record_bytes(mut self, max: u32) -> Self {
        self.max_record_bytes = max;
        self
    }

    /// Enable or disable fsync on save
    pub fn with_sync_on_save(mut self, sync: bool) -> Self {
        self.sync_on_save = sync;
        self
    }

    /// Token location derived from a text location
    pub fn token_location_for(&self, text_location: &Path) -> PathBuf {
        let mut name: OsString = text_location.as_os_str().to_owned();
        name.push(&self.token_suffix);
        PathBuf::from(name)
    }

    /// Build artifact paths for an output base
    pub fn artifacts_for(&self, base: &Path) -> BuildArtifacts {
        BuildArtifacts::with_extensions(
            base,
            &self.documents_extension,
            &self.tokens_extension,
            &self.index_extension,
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.token_suffix.is_empty() {
            return Err(Error::Config(
                "token suffix must not be empty".to_string(),
            ));
        }
        let extensions = [
            &self.documents_extension,
            &self.tokens_extension,
            &self.index_extension,
        ];
        if extensions.iter().any(|e| e.is_empty()) {
            return Err(Error::Config(
                "artifact extensions must not be empty".to_string(),
            ));
        }
        if extensions[0] == extensions[1]
            || extensions[1] == extensions[2]
            || extensions[0] == extensions[2]
        {
            return Err(Error::Config(
                "artifact extensions must be distinct".to_string(),
            ));
        }
        if self.max_record_bytes == 0 {
            return Err(Error::Config(
                "max_record_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CorpusConfig::default();
        assert_eq!(config.token_suffix, ".token");
        assert_eq!(config.tokens_extension, "tok");
        assert!(config.sync_on_save);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_testing() {
        let config = CorpusConfig::for_testing();
        assert!(!config.sync_on_save);
        assert!(config.max_record_bytes < DEFAULT_MAX_RECORD_BYTES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_location_for() {
        let config = CorpusConfig::default();
        assert_eq!(
            config.token_location_for(Path::new("/data/news.txt")),
            PathBuf::from("/data/news.txt.token")
        );
        let config = config.with_token_suffix("-ids");
        assert_eq!(
            config.token_location_for(Path::new("/data/news.txt")),
            PathBuf::from("/data/news.txt-ids")
        );
    }

    #[test]
    fn test_artifacts_for() {
        let config = CorpusConfig::default().with_artifact_extensions("docs", "toks", "offsets");
        let artifacts = config.artifacts_for(Path::new("/out/news"));
        assert_eq!(artifacts.documents, PathBuf::from("/out/news.docs"));
        assert_eq!(artifacts.tokens, PathBuf::from("/out/news.toks"));
        assert_eq!(artifacts.index, PathBuf::from("/out/news.offsets"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            CorpusConfig::default().with_token_suffix("").validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CorpusConfig::default()
                .with_artifact_extensions("a", "a", "b")
                .validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CorpusConfig::default().with_max_record_bytes(0).validate(),
            Err(Error::Config(_))
        ));
    }
}
