use std::borrow::Cow;
use std::num::NonZeroU32;

pub const SIGNATURE: u32 = 0xBEEF_FEED;
pub const VERSION: u16 = 5;

/// In-memory `.asm_pc` file. Plain owned values only: nothing in here points
/// at anything else, so `Clone` is always a deep copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsmFile {
    /// File name the descriptor was loaded from.
    pub name: String,
    pub signature: u32,
    pub version: u16,
    pub containers: Vec<AsmContainer>,
}

impl AsmFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: SIGNATURE,
            version: VERSION,
            containers: Vec::new(),
        }
    }

    /// Written as the header's container count.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// First container whose name matches, ignoring ASCII case.
    pub fn container(&self, name: &str) -> Option<&AsmContainer> {
        self.containers
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn container_mut(&mut self, name: &str) -> Option<&mut AsmContainer> {
        self.containers
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Where a container's flat primitive size list comes from on write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SizeTable {
    /// Generated from the primitives.
    #[default]
    Derived,
    /// Read from disk and kept as-is because it disagreed with the primitives.
    Verbatim(Vec<u32>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AsmContainer {
    pub name: String,
    pub kind: u8,
    pub flags: u16,
    /// Offset of the container's data in the composed archive stream.
    pub data_offset: u32,
    /// Compressed payload size of the container's archive.
    pub compressed_size: u32,
    pub primitives: Vec<AsmPrimitive>,
    pub sizes: SizeTable,
}

impl AsmContainer {
    /// No archive of its own: nothing to locate, only primitive sizes to track.
    pub fn is_virtual(&self) -> bool {
        self.compressed_size == 0 && self.data_offset == 0
    }

    /// Header size, then data size when present, for each primitive in order.
    pub fn derived_sizes(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.size_slots());
        for p in &self.primitives {
            out.push(p.header_size);
            if let Some(d) = p.data_size {
                out.push(d.get());
            }
        }
        out
    }

    /// Number of flat size values the primitives imply.
    pub fn size_slots(&self) -> usize {
        self.primitives.iter().map(AsmPrimitive::size_slots).sum()
    }

    /// The flat size list as it will be written.
    pub fn primitive_sizes(&self) -> Cow<'_, [u32]> {
        match &self.sizes {
            SizeTable::Derived => Cow::Owned(self.derived_sizes()),
            SizeTable::Verbatim(v) => Cow::Borrowed(v),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AsmPrimitive {
    pub name: String,
    pub kind: u8,
    pub allocator: u8,
    pub flags: u8,
    pub split_ext_index: u8,
    /// Uncompressed size of the header file.
    pub header_size: u32,
    /// Uncompressed size of the companion data file, if there is one.
    /// Stored as 0 on disk when absent.
    pub data_size: Option<NonZeroU32>,
}

impl AsmPrimitive {
    pub fn has_companion(&self) -> bool {
        self.data_size.is_some()
    }

    pub fn size_slots(&self) -> usize {
        if self.has_companion() { 2 } else { 1 }
    }

    /// Data size as stored on disk, 0 meaning no companion.
    pub fn raw_data_size(&self) -> u32 {
        self.data_size.map_or(0, NonZeroU32::get)
    }

    pub fn set_raw_data_size(&mut self, size: u32) {
        self.data_size = NonZeroU32::new(size);
    }
}
