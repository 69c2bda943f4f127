#![allow(dead_code)]

use std::num::NonZeroU32;
use std::path::Path;

use rfg_core::packfile::entry::{Packfile3Entry, write_table};
use rfg_core::packfile::header::{ALIGNMENT, FLAG_COMPRESSED, FLAG_CONDENSED, Packfile3Header};
use rfg_core::util::align::align_up;
use rfg_core::{AsmContainer, AsmFile, AsmPrimitive};

/// Write a packfile whose metadata describes `files` (name, uncompressed size).
/// The filename block is padded to `name_block_size` when given.
pub fn write_str2(
    path: &Path,
    files: &[(&str, u32)],
    compressed_data_size: u32,
    name_block_size: Option<u32>,
) {
    let mut block = Vec::new();
    let mut table = Vec::new();
    for (name, size) in files {
        table.push(Packfile3Entry {
            name_offset: block.len() as u32,
            data_size: *size,
            compressed_data_size: u32::MAX,
            ..Default::default()
        });
        block.extend_from_slice(name.as_bytes());
        block.push(0);
    }
    if let Some(n) = name_block_size {
        assert!(n as usize >= block.len());
        block.resize(n as usize, 0);
    }
    let header = Packfile3Header {
        flags: FLAG_COMPRESSED | FLAG_CONDENSED,
        entry_count: files.len() as u32,
        entry_block_size: (files.len() * 28) as u32,
        name_block_size: block.len() as u32,
        data_size: files.iter().map(|(_, s)| s).sum(),
        compressed_data_size,
        ..Default::default()
    };
    let mut out = Vec::new();
    header.write_to(&mut out).unwrap();
    write_table(&mut out, &table).unwrap();
    out.resize(align_up(out.len() as u64, ALIGNMENT) as usize, 0);
    out.extend_from_slice(&block);
    out.resize(align_up(out.len() as u64, ALIGNMENT) as usize, 0);
    out.extend_from_slice(&vec![0x5A; compressed_data_size.min(4096) as usize]);
    std::fs::write(path, out).unwrap();
}

pub fn prim(name: &str, header: u32, data: u32) -> AsmPrimitive {
    AsmPrimitive {
        name: name.to_string(),
        kind: 1,
        allocator: 2,
        flags: 0,
        split_ext_index: 3,
        header_size: header,
        data_size: NonZeroU32::new(data),
    }
}

pub fn container(name: &str, offset: u32, size: u32, prims: Vec<AsmPrimitive>) -> AsmContainer {
    AsmContainer {
        name: name.to_string(),
        kind: 1,
        flags: 0x10,
        data_offset: offset,
        compressed_size: size,
        primitives: prims,
        ..Default::default()
    }
}

pub fn asm_file(name: &str, containers: Vec<AsmContainer>) -> AsmFile {
    let mut f = AsmFile::new(name);
    f.containers = containers;
    f
}
