use std::io::Write;

use crate::util::bytes::le32_at;

/// Size of one directory record.
pub const ENTRY_SIZE: usize = 28;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Packfile3Entry {
    /// Offset of the NUL-terminated name inside the filename block.
    pub name_offset: u32,
    pub sector: u32,
    pub data_offset: u32,
    pub name_hash: u32,
    pub data_size: u32,
    pub compressed_data_size: u32,
    pub package_ptr: u32,
}

pub fn write_table(mut w: impl Write, entries: &[Packfile3Entry]) -> std::io::Result<()> {
    let mut buf = [0u8; ENTRY_SIZE];
    for e in entries {
        let fields = [
            e.name_offset,
            e.sector,
            e.data_offset,
            e.name_hash,
            e.data_size,
            e.compressed_data_size,
            e.package_ptr,
        ];
        for (i, v) in fields.iter().enumerate() {
            buf[i * 4..i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
        w.write_all(&buf)?;
    }
    Ok(())
}

pub fn read_table_from_slice(buf: &[u8], count: usize) -> std::io::Result<Vec<Packfile3Entry>> {
    let need = count * ENTRY_SIZE;
    if buf.len() != need {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "entry table size mismatch: got {} bytes, expected {}",
                buf.len(),
                need
            ),
        ));
    }

    Ok(buf
        .chunks_exact(ENTRY_SIZE)
        .map(|e| Packfile3Entry {
            name_offset: le32_at(e, 0),
            sector: le32_at(e, 4),
            data_offset: le32_at(e, 8),
            name_hash: le32_at(e, 12),
            data_size: le32_at(e, 16),
            compressed_data_size: le32_at(e, 20),
            package_ptr: le32_at(e, 24),
        })
        .collect())
}

/// Resolve each entry's name from the filename block.
pub fn resolve_names(block: &[u8], entries: &[Packfile3Entry]) -> std::io::Result<Vec<String>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let start = e.name_offset as usize;
            let tail = block.get(start..).filter(|t| !t.is_empty()).ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("entry[{i}] name offset {start} outside filename block"),
                )
            })?;
            let len = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
            String::from_utf8(tail[..len].to_vec()).map_err(|_| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("entry[{i}] name is not utf8"),
                )
            })
        })
        .collect()
}
