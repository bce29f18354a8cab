//! Processed-path tracking.
//!
//! Remembers which files have already been transcribed during this run so a
//! duplicate creation event never triggers a second transcription. Lives only
//! for the process lifetime; a restart starts empty.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Set of file paths that have completed transcription.
///
/// Mutation currently happens only from the watch loop, but the set is
/// mutex-guarded so the pipeline could move to a worker pool without an API
/// change.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    paths: Mutex<HashSet<PathBuf>>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a path has already been transcribed.
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.paths
            .lock()
            .expect("processed set poisoned")
            .contains(path)
    }

    /// Record a completed transcription. Idempotent.
    pub fn mark(&self, path: &Path) {
        self.paths
            .lock()
            .expect("processed set poisoned")
            .insert(path.to_path_buf());
    }

    /// Number of tracked paths.
    pub fn len(&self) -> usize {
        self.paths.lock().expect("processed set poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
