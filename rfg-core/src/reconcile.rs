//! Re-derive the stale fields of an `.asm_pc` from the packfiles next to it.
//!
//! Only archive metadata is consulted: the header for the compressed payload
//! size, the directory for entry names and uncompressed sizes, and the
//! filename block size for the data offset.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::archive::{ArchiveEntry, ArchiveLayout, ArchiveMetadata, file_stem, open_archive};
use crate::asm::model::{AsmContainer, AsmFile, AsmPrimitive, SizeTable};
use crate::error::{Result, RfgError};
use crate::options::{PrimitiveScope, UpdateOptions};
use crate::report::{ReconcileReport, SkippedArchive};
use crate::util::align::align_up;

/// Where a container's data begins in the composed stream: header region,
/// directory, pad, filename block, pad.
pub fn data_start(layout: ArchiveLayout, entry_count: usize, name_block_size: u64) -> u64 {
    let mut off = layout.header_size;
    off += entry_count as u64 * layout.entry_size;
    off = align_up(off, layout.alignment);
    off += name_block_size;
    align_up(off, layout.alignment)
}

/// Reconcile `asm` against every recognised archive directly inside `dir`.
///
/// Unreadable archives are reported and skipped; the run carries on with the
/// rest. Nothing is written to disk.
pub fn reconcile(asm: &mut AsmFile, dir: &Path, opts: &UpdateOptions) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    for path in archive_paths(dir, opts)? {
        let archive = match open_archive(&path) {
            Ok(a) => a,
            Err(e) => {
                warn!(archive = %path.display(), error = %e, "skipping unreadable archive");
                report.skipped.push(SkippedArchive {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        report.archives_scanned += 1;
        if let Err(e) = apply_archive(asm, archive.as_ref(), opts.primitive_scope, &mut report) {
            warn!(archive = %path.display(), error = %e, "skipping archive");
            report.skipped.push(SkippedArchive {
                path,
                reason: e.to_string(),
            });
        }
    }
    Ok(report)
}

/// Archive files directly inside `dir`, sorted by file name.
fn archive_paths(dir: &Path, opts: &UpdateOptions) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for e in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let e = e.map_err(std::io::Error::other)?;
        if !e.file_type().is_file() {
            continue;
        }
        let accepted = e
            .path()
            .extension()
            .and_then(|x| x.to_str())
            .is_some_and(|x| opts.accepts_extension(x));
        if accepted {
            out.push(e.into_path());
        }
    }
    Ok(out)
}

/// Fold one archive's metadata into `asm`.
pub fn apply_archive(
    asm: &mut AsmFile,
    archive: &dyn ArchiveMetadata,
    scope: PrimitiveScope,
    report: &mut ReconcileReport,
) -> Result<()> {
    let stem = archive.stem();
    let start = data_start(
        archive.layout(),
        archive.entries().len(),
        archive.name_block_size() as u64,
    );
    let data_offset = u32::try_from(start).map_err(|_| {
        RfgError::Format(format!(
            "data offset {start} of '{}' does not fit in u32",
            archive.name()
        ))
    })?;

    let mut owned = false;
    for container in &mut asm.containers {
        let owns = container.name.eq_ignore_ascii_case(stem);
        owned |= owns;
        if !owns && scope == PrimitiveScope::MatchedContainer {
            continue;
        }

        if owns && !container.is_virtual() {
            container.compressed_size = archive.compressed_payload_size();
            container.data_offset = data_offset;
            report.containers_located += 1;
            info!(
                container = %container.name,
                archive = archive.name(),
                data_offset,
                compressed_size = container.compressed_size,
                "located container"
            );
        }

        let updated = update_primitives(container, archive.entries());
        report.primitives_updated += updated;
        if !container.is_virtual() && (owns || updated > 0) {
            container.sizes = SizeTable::Derived;
        }
    }

    if !owned {
        debug!(archive = archive.name(), "no container named after archive");
        report.unmatched_archives.push(archive.name().to_string());
    }
    Ok(())
}

/// Primitive positions keyed by lowercase name, built once per container.
struct PrimitiveIndex {
    by_name: HashMap<String, Vec<usize>>,
}

/// How an entry name found its primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameMatch {
    Full,
    Stem,
}

impl PrimitiveIndex {
    fn new(primitives: &[AsmPrimitive]) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, p) in primitives.iter().enumerate() {
            by_name.entry(p.name.to_ascii_lowercase()).or_default().push(i);
        }
        Self { by_name }
    }

    /// Exact name first, then the entry name without its extension.
    fn lookup(&self, entry_name: &str) -> Option<(&[usize], NameMatch)> {
        let full = entry_name.to_ascii_lowercase();
        if let Some(hit) = self.by_name.get(&full) {
            return Some((hit.as_slice(), NameMatch::Full));
        }
        self.by_name
            .get(file_stem(&full))
            .map(|hit| (hit.as_slice(), NameMatch::Stem))
    }
}

/// Walk the directory in order and copy entry sizes onto matching primitives.
/// A primitive with a companion takes the matched entry as its header and the
/// next entry as its data. Returns the number of primitive updates.
///
/// A stem match only lands on a primitive that nothing has matched yet in this
/// walk, so sibling entries sharing the stem (`rock.cvbm_pc`, `rock.xtbl`) and
/// a zero-size data entry that dropped the companion are ignored. Full-name
/// matches always apply.
fn update_primitives(container: &mut AsmContainer, entries: &[ArchiveEntry]) -> u64 {
    if container.primitives.is_empty() {
        return 0;
    }
    let index = PrimitiveIndex::new(&container.primitives);
    let mut matched = vec![false; container.primitives.len()];
    let mut updated = 0;
    let mut i = 0;
    while i < entries.len() {
        let entry = &entries[i];
        let Some((targets, how)) = index.lookup(&entry.name) else {
            i += 1;
            continue;
        };

        let mut consumed = 1;
        for &pi in targets {
            if how == NameMatch::Stem && matched[pi] {
                debug!(
                    container = %container.name,
                    entry = %entry.name,
                    "entry shares the stem of an already matched primitive; ignored"
                );
                continue;
            }
            matched[pi] = true;
            let prim = &mut container.primitives[pi];
            prim.header_size = entry.data_size;
            if prim.has_companion() {
                match entries.get(i + 1) {
                    Some(data) => {
                        prim.set_raw_data_size(data.data_size);
                        consumed = 2;
                    }
                    None => warn!(
                        container = %container.name,
                        primitive = %prim.name,
                        "companion entry missing at end of archive; data size kept"
                    ),
                }
            }
            debug!(
                container = %container.name,
                primitive = %prim.name,
                header_size = prim.header_size,
                data_size = prim.raw_data_size(),
                "updated primitive"
            );
            updated += 1;
        }
        i += consumed;
    }
    updated
}

/// Load the descriptor at `path`, reconcile it against the archives in its
/// directory and write it back in place (unless `opts.dry_run`).
pub fn update_asm(path: &Path, opts: &UpdateOptions) -> Result<ReconcileReport> {
    let mut asm = AsmFile::load(path)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let report = reconcile(&mut asm, dir, opts)?;
    if opts.dry_run {
        info!(asm = %path.display(), "dry run, not writing");
    } else {
        asm.save(path)?;
        info!(
            asm = %path.display(),
            containers = report.containers_located,
            primitives = report.primitives_updated,
            "updated asm_pc"
        );
    }
    Ok(report)
}

/// `update_asm` over several descriptors in parallel. Each descriptor is
/// independent; results come back in input order.
pub fn update_many(paths: &[PathBuf], opts: &UpdateOptions) -> Vec<(PathBuf, Result<ReconcileReport>)> {
    paths
        .par_iter()
        .map(|p| (p.clone(), update_asm(p, opts)))
        .collect()
}
