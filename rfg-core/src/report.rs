use std::path::PathBuf;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedArchive {
    pub path: PathBuf,
    pub reason: String,
}

/// What one reconciliation run changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub archives_scanned: u64,
    /// Containers whose offset and compressed size were recomputed.
    pub containers_located: u64,
    pub primitives_updated: u64,
    /// Archives whose name matched no container.
    pub unmatched_archives: Vec<String>,
    /// Archives that could not be read.
    pub skipped: Vec<SkippedArchive>,
}
