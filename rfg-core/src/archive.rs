use std::path::Path;

use serde::Serialize;

use crate::error::{Result, RfgError};
use crate::packfile::Packfile;

/// One directory record of an archive, as the descriptor sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    /// Uncompressed size.
    pub data_size: u32,
    pub compressed_size: u32,
}

/// Fixed structural constants of an archive family, needed to locate where
/// the payload starts without touching it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub header_size: u64,
    pub entry_size: u64,
    pub alignment: u64,
}

/// Metadata-only view of an archive: header, directory and filename block.
pub trait ArchiveMetadata: Send + Sync {
    /// File name of the archive, extension included.
    fn name(&self) -> &str;

    /// Directory entries in on-disk order.
    fn entries(&self) -> &[ArchiveEntry];

    /// Aggregate compressed size of the payload region.
    fn compressed_payload_size(&self) -> u32;

    /// Byte length of the filename block.
    fn name_block_size(&self) -> u32;

    fn layout(&self) -> ArchiveLayout;

    /// Archive name without its extension; this is what container names match.
    fn stem(&self) -> &str {
        file_stem(self.name())
    }
}

/// Text before the last `.`, or the whole name when there is none.
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

pub enum Backend {
    Packfile3,
}

impl Backend {
    /// Pick a reader from the archive's extension.
    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("str2_pc") || ext.eq_ignore_ascii_case("vpp_pc") {
            Some(Backend::Packfile3)
        } else {
            None
        }
    }
}

pub fn open_archive(path: &Path) -> Result<Box<dyn ArchiveMetadata>> {
    match Backend::for_path(path) {
        Some(Backend::Packfile3) => Ok(Box::new(Packfile::open(path)?)),
        None => Err(RfgError::ArchiveRead {
            path: path.to_path_buf(),
            reason: "unrecognized archive extension".into(),
        }),
    }
}
