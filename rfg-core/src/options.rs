use serde::{Deserialize, Serialize};

/// Which containers an archive's entries are matched against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveScope {
    /// Only the container named after the archive.
    #[default]
    MatchedContainer,
    /// Every container in the descriptor. Lets virtual containers pick up
    /// sizes from archives named after other containers; when several
    /// archives carry the same primitive the last one scanned wins.
    AllContainers,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Archive extensions considered when scanning a directory, without the
    /// leading dot. Compared ignoring ASCII case.
    pub archive_extensions: Vec<String>,
    pub primitive_scope: PrimitiveScope,
    /// Reconcile and report, but leave the descriptor on disk alone.
    pub dry_run: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            archive_extensions: vec!["str2_pc".to_string()],
            primitive_scope: PrimitiveScope::default(),
            dry_run: false,
        }
    }
}

impl UpdateOptions {
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.archive_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
