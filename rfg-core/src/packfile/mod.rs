//! Packfile v3 (`.vpp_pc` / `.str2_pc`) metadata reader.
//!
//! Only the header, the directory and the filename block are read. Payload
//! bytes, compressed or not, are never touched.

pub mod entry;
pub mod header;

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::archive::{ArchiveEntry, ArchiveLayout, ArchiveMetadata};
use crate::error::{Result, RfgError};
use crate::util::align::align_up;
use entry::{ENTRY_SIZE, read_table_from_slice, resolve_names};
use header::{ALIGNMENT, HEADER_LEN, Packfile3Header};

pub const LAYOUT: ArchiveLayout = ArchiveLayout {
    header_size: HEADER_LEN,
    entry_size: ENTRY_SIZE as u64,
    alignment: ALIGNMENT,
};

#[derive(Debug, Clone)]
pub struct Packfile {
    pub name: String,
    pub header: Packfile3Header,
    pub entries: Vec<ArchiveEntry>,
}

impl Packfile {
    pub fn open(path: &Path) -> Result<Self> {
        let pf = Self::read_metadata(path).map_err(|e| RfgError::ArchiveRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(
            archive = %pf.name,
            entries = pf.entries.len(),
            compressed = pf.header.compressed(),
            condensed = pf.header.condensed(),
            "opened packfile"
        );
        Ok(pf)
    }

    fn read_metadata(path: &Path) -> std::io::Result<Self> {
        let mut f = File::open(path)?;
        let file_len = f.metadata()?.len();

        let header = Packfile3Header::read_from(&mut f)?;

        // directory
        let count = header.entry_count as u64;
        let table_len = count * ENTRY_SIZE as u64;
        let names_off = align_up(HEADER_LEN + table_len, ALIGNMENT);
        let names_len = header.name_block_size as u64;
        if names_off + names_len > file_len {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!(
                    "metadata runs past end of file: need {} bytes, file has {}",
                    names_off + names_len,
                    file_len
                ),
            ));
        }
        f.seek(SeekFrom::Start(HEADER_LEN))?;
        let mut tbytes = vec![0u8; table_len as usize];
        f.read_exact(&mut tbytes)?;
        let table = read_table_from_slice(&tbytes, count as usize)?;

        // filename block
        f.seek(SeekFrom::Start(names_off))?;
        let mut nbytes = vec![0u8; names_len as usize];
        f.read_exact(&mut nbytes)?;
        let names = resolve_names(&nbytes, &table)?;

        let entries = table
            .iter()
            .zip(names)
            .map(|(e, name)| ArchiveEntry {
                name,
                data_size: e.data_size,
                compressed_size: e.compressed_data_size,
            })
            .collect();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            header,
            entries,
        })
    }
}

impl ArchiveMetadata for Packfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn compressed_payload_size(&self) -> u32 {
        self.header.compressed_data_size
    }

    fn name_block_size(&self) -> u32 {
        self.header.name_block_size
    }

    fn layout(&self) -> ArchiveLayout {
        LAYOUT
    }
}
