//! Locally selected media files held against not-yet-persisted lectures.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maps a lecture's temporary identifier to exactly one locally held file
/// awaiting upload. Entries are dropped only by lecture removal or by
/// [`MediaStagingArea::clear`] after a successful submit.
#[derive(Debug, Clone, Default)]
pub struct MediaStagingArea {
    files: HashMap<String, PathBuf>,
}

impl MediaStagingArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a file for the lecture. Last selection wins; the replaced
    /// file, if any, is returned.
    pub fn stage(&mut self, temp_lecture_id: impl Into<String>, file: impl Into<PathBuf>) -> Option<PathBuf> {
        self.files.insert(temp_lecture_id.into(), file.into())
    }

    pub fn get(&self, temp_lecture_id: &str) -> Option<&Path> {
        self.files.get(temp_lecture_id).map(PathBuf::as_path)
    }

    pub fn remove(&mut self, temp_lecture_id: &str) -> Option<PathBuf> {
        self.files.remove(temp_lecture_id)
    }

    /// Drops everything. Invoked only after a successful remote exchange.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
