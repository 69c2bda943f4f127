use std::io::{Read, Write};

use crate::util::bytes::le32_at;

pub const SIGNATURE: u32 = 0x5189_0ACE;
pub const VERSION: u32 = 3;

/// Size of the header region. Entries start right after it.
pub const HEADER_LEN: u64 = 2048;
/// Directory records and the filename block are padded to this boundary.
pub const ALIGNMENT: u64 = 2048;

pub const FLAG_COMPRESSED: u32 = 1;
pub const FLAG_CONDENSED: u32 = 2;

// Bytes of the header that carry fields; the rest of the region is padding.
const FIELDS_LEN: usize = 364;

// Field offsets. 8..73 short name, 73..329 path name, 329..332 pad.
const OFF_SIGNATURE: usize = 0;
const OFF_VERSION: usize = 4;
const OFF_FLAGS: usize = 332;
const OFF_ENTRY_COUNT: usize = 340;
const OFF_FILE_SIZE: usize = 344;
const OFF_ENTRY_BLOCK_SIZE: usize = 348;
const OFF_NAME_BLOCK_SIZE: usize = 352;
const OFF_DATA_SIZE: usize = 356;
const OFF_COMPRESSED_DATA_SIZE: usize = 360;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Packfile3Header {
    pub flags: u32,
    pub entry_count: u32,
    pub file_size: u32,
    pub entry_block_size: u32,
    pub name_block_size: u32,
    /// Uncompressed payload size.
    pub data_size: u32,
    /// Compressed payload size as stored.
    pub compressed_data_size: u32,
}

impl Packfile3Header {
    pub fn compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn condensed(&self) -> bool {
        self.flags & FLAG_CONDENSED != 0
    }

    /// Writes the whole header region, zero padded to `HEADER_LEN`.
    pub fn write_to(&self, mut w: impl Write) -> std::io::Result<()> {
        let mut buf = vec![0u8; HEADER_LEN as usize];
        let mut put = |off: usize, v: u32| buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
        put(OFF_SIGNATURE, SIGNATURE);
        put(OFF_VERSION, VERSION);
        put(OFF_FLAGS, self.flags);
        put(OFF_ENTRY_COUNT, self.entry_count);
        put(OFF_FILE_SIZE, self.file_size);
        put(OFF_ENTRY_BLOCK_SIZE, self.entry_block_size);
        put(OFF_NAME_BLOCK_SIZE, self.name_block_size);
        put(OFF_DATA_SIZE, self.data_size);
        put(OFF_COMPRESSED_DATA_SIZE, self.compressed_data_size);
        w.write_all(&buf)
    }

    /// Reads the header fields. The reader is left just past the fields, not
    /// at the end of the header region.
    pub fn read_from(mut r: impl Read) -> std::io::Result<Self> {
        let mut buf = [0u8; FIELDS_LEN];
        r.read_exact(&mut buf)?;
        if le32_at(&buf, OFF_SIGNATURE) != SIGNATURE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "bad packfile signature",
            ));
        }
        let version = le32_at(&buf, OFF_VERSION);
        if version != VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unsupported packfile version {version}"),
            ));
        }
        Ok(Self {
            flags: le32_at(&buf, OFF_FLAGS),
            entry_count: le32_at(&buf, OFF_ENTRY_COUNT),
            file_size: le32_at(&buf, OFF_FILE_SIZE),
            entry_block_size: le32_at(&buf, OFF_ENTRY_BLOCK_SIZE),
            name_block_size: le32_at(&buf, OFF_NAME_BLOCK_SIZE),
            data_size: le32_at(&buf, OFF_DATA_SIZE),
            compressed_data_size: le32_at(&buf, OFF_COMPRESSED_DATA_SIZE),
        })
    }
}
