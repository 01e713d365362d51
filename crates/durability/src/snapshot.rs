//! Corpus metadata snapshots
//!
//! A [`CorpusSnapshot`] is the persistable projection of a corpus: its
//! locations, vocabulary and document count. Open file handles have no
//! representation in this type.
//!
//! # Crash Safety
//!
//! Saving follows the write-fsync-rename pattern:
//! 1. Write to a temporary sibling (`.<name>.tmp`)
//! 2. fsync the temporary file
//! 3. Atomic rename to the final path
//! 4. fsync the parent directory (best effort)
//!
//! Either the complete previous snapshot or the complete new one is visible.

use corpora_core::{Error, Result};
use corpora_storage::record::{read_value_from_file, RecordWriter};
use corpora_vocab::Vocabulary;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Persistable corpus metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    /// Raw corpus file
    pub text_location: Option<PathBuf>,
    /// Tokenized counterpart
    pub token_location: Option<PathBuf>,
    /// Bound vocabulary, if any
    pub vocabulary: Option<Vocabulary>,
    /// Number of documents
    pub document_count: u64,
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save a snapshot to `path`.
///
/// With `sync` the temporary file is fsynced before the rename and the
/// parent directory afterwards.
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &CorpusSnapshot, sync: bool) -> Result<()> {
    let path = path.as_ref();
    let temp = temp_path(path);

    let mut writer = RecordWriter::create(&temp)?;
    let bytes = writer.append(snapshot)?;
    if sync {
        writer.finish()?;
    } else {
        writer.flush()?;
    }

    if let Err(e) = std::fs::rename(&temp, path) {
        if let Err(cleanup) = std::fs::remove_file(&temp) {
            warn!(path = %temp.display(), error = %cleanup, "Failed to remove temporary snapshot");
        }
        return Err(Error::write(path, e));
    }

    if sync {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            // Directory fsync is not supported everywhere
            if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
                warn!(path = %parent.display(), error = %e, "Failed to sync snapshot directory");
            }
        }
    }

    info!(
        path = %path.display(),
        bytes,
        documents = snapshot.document_count,
        "Saved corpus snapshot"
    );
    Ok(())
}

/// Load a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<CorpusSnapshot> {
    let path = path.as_ref();
    let snapshot: CorpusSnapshot = read_value_from_file(path)?;
    if snapshot.text_location.is_some() != snapshot.token_location.is_some() {
        return Err(Error::corrupt(
            0,
            "snapshot must set both text and token locations or neither",
        ));
    }
    info!(
        path = %path.display(),
        documents = snapshot.document_count,
        "Loaded corpus snapshot"
    );
    Ok(snapshot)
}
