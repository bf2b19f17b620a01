//! Shared types passed between pipeline stages.

use std::path::{Path, PathBuf};

/// A per-item recoverable failure: the offending file plus a human-readable
/// reason. Collected by the indexers and printed by the CLI; never aborts
/// the run.
#[derive(Debug, Clone)]
pub struct Skip {
    pub path: PathBuf,
    pub reason: String,
}

impl Skip {
    pub fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
