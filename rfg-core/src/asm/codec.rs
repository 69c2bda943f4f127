//! Binary layout of `.asm_pc` (version 5), little-endian:
//!
//! ```text
//! file:      u32 signature | u16 version | u16 container_count | containers
//! container: u16 name_len | name | u8 kind | u16 flags | u16 primitive_count
//!            u32 data_offset | u32 size_count | u32 compressed_size
//!            size_count x u32 | primitives
//! primitive: u16 name_len | name | u8 kind | u8 allocator | u8 flags
//!            u8 split_ext_index | u32 header_size | u32 data_size
//! ```

use std::io::Write;
use std::num::NonZeroU32;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::model::{AsmContainer, AsmFile, AsmPrimitive, SIGNATURE, SizeTable, VERSION};
use crate::error::{Result, RfgError};
use crate::util::bytes::{Eof, SliceReader};

impl AsmFile {
    /// Load a descriptor, naming it after its file name.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::read_from_slice(&bytes, &name)
    }

    pub fn read_from_slice(bytes: &[u8], name: &str) -> Result<Self> {
        let malformed = |reason: String| RfgError::MalformedDescriptor {
            name: name.to_string(),
            reason,
        };
        let eof = |e: Eof| malformed(e.to_string());

        let mut r = SliceReader::new(bytes);
        let signature = r.u32().map_err(eof)?;
        if signature != SIGNATURE {
            return Err(malformed(format!("bad signature {signature:#010x}")));
        }
        let version = r.u16().map_err(eof)?;
        if version != VERSION {
            return Err(malformed(format!("unsupported version {version}")));
        }
        let count = r.u16().map_err(eof)?;

        let mut containers = Vec::with_capacity(count as usize);
        for i in 0..count {
            let c = read_container(&mut r)
                .map_err(|reason| malformed(format!("container[{i}]: {reason}")))?;
            containers.push(c);
        }

        if r.remaining() != 0 {
            return Err(malformed(format!(
                "{} trailing bytes after {count} containers",
                r.remaining()
            )));
        }

        Ok(Self {
            name: name.to_string(),
            signature,
            version,
            containers,
        })
    }

    pub fn write_to(&self, mut w: impl Write) -> Result<()> {
        let count = narrow_u16(self.container_count(), "container count")?;
        w.write_all(&self.signature.to_le_bytes())?;
        w.write_all(&self.version.to_le_bytes())?;
        w.write_all(&count.to_le_bytes())?;
        for c in &self.containers {
            write_container(&mut w, c)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Replace `path` with this descriptor. The bytes go to a temp file in the
    /// same directory which is then renamed over `path`, so a failure leaves
    /// the previous file intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote asm_pc");
        Ok(())
    }
}

fn read_string(r: &mut SliceReader<'_>) -> std::result::Result<String, String> {
    let len = r.u16().map_err(|e| e.to_string())?;
    let raw = r.take(len as usize).map_err(|e| e.to_string())?;
    String::from_utf8(raw.to_vec()).map_err(|_| "name is not utf8".to_string())
}

fn read_container(r: &mut SliceReader<'_>) -> std::result::Result<AsmContainer, String> {
    let eof = |e: Eof| e.to_string();
    let name = read_string(r)?;
    let kind = r.u8().map_err(eof)?;
    let flags = r.u16().map_err(eof)?;
    let primitive_count = r.u16().map_err(eof)?;
    let data_offset = r.u32().map_err(eof)?;
    let size_count = r.u32().map_err(eof)?;
    let compressed_size = r.u32().map_err(eof)?;

    // Bound the allocation by what is actually left.
    if size_count as usize > r.remaining() / 4 {
        return Err(format!(
            "'{name}' declares {size_count} primitive sizes but only {} bytes remain",
            r.remaining()
        ));
    }
    let mut sizes = Vec::with_capacity(size_count as usize);
    for _ in 0..size_count {
        sizes.push(r.u32().map_err(eof)?);
    }

    let mut primitives = Vec::with_capacity(primitive_count as usize);
    for i in 0..primitive_count {
        let p = read_primitive(r).map_err(|reason| format!("'{name}' primitive[{i}]: {reason}"))?;
        primitives.push(p);
    }

    let mut container = AsmContainer {
        name,
        kind,
        flags,
        data_offset,
        compressed_size,
        primitives,
        sizes: SizeTable::Derived,
    };
    if container.derived_sizes() != sizes {
        container.sizes = SizeTable::Verbatim(sizes);
    }
    Ok(container)
}

fn read_primitive(r: &mut SliceReader<'_>) -> std::result::Result<AsmPrimitive, String> {
    let eof = |e: Eof| e.to_string();
    Ok(AsmPrimitive {
        name: read_string(r)?,
        kind: r.u8().map_err(eof)?,
        allocator: r.u8().map_err(eof)?,
        flags: r.u8().map_err(eof)?,
        split_ext_index: r.u8().map_err(eof)?,
        header_size: r.u32().map_err(eof)?,
        data_size: NonZeroU32::new(r.u32().map_err(eof)?),
    })
}

fn write_string(w: &mut impl Write, s: &str, what: &str) -> Result<()> {
    let len = narrow_u16(s.len(), what)?;
    w.write_all(&len.to_le_bytes())?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn write_container(w: &mut impl Write, c: &AsmContainer) -> Result<()> {
    let primitive_count = narrow_u16(c.primitives.len(), "primitive count")?;
    let sizes = c.primitive_sizes();
    let size_count = u32::try_from(sizes.len())
        .map_err(|_| RfgError::Format(format!("'{}' has too many primitive sizes", c.name)))?;

    write_string(w, &c.name, "container name length")?;
    w.write_all(&[c.kind])?;
    w.write_all(&c.flags.to_le_bytes())?;
    w.write_all(&primitive_count.to_le_bytes())?;
    w.write_all(&c.data_offset.to_le_bytes())?;
    w.write_all(&size_count.to_le_bytes())?;
    w.write_all(&c.compressed_size.to_le_bytes())?;
    for s in sizes.iter() {
        w.write_all(&s.to_le_bytes())?;
    }
    for p in &c.primitives {
        write_string(w, &p.name, "primitive name length")?;
        w.write_all(&[p.kind, p.allocator, p.flags, p.split_ext_index])?;
        w.write_all(&p.header_size.to_le_bytes())?;
        w.write_all(&p.raw_data_size().to_le_bytes())?;
    }
    Ok(())
}

fn narrow_u16(n: usize, what: &str) -> Result<u16> {
    u16::try_from(n).map_err(|_| RfgError::Format(format!("{what} {n} does not fit in u16")))
}
