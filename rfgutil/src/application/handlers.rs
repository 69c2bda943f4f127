use std::path::{Path, PathBuf};

use rfg_core::error::{Result, RfgError};
use rfg_core::{
    AsmFile, PrimitiveScope, ReconcileReport, UpdateOptions, list_containers, transplant,
    update_asm, update_many,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::presentation::cli::ScanArgs;

#[derive(Serialize)]
struct UpdateLine<'a> {
    asm: &'a Path,
    report: &'a ReconcileReport,
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let s = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    s.map_err(|e| std::io::Error::other(e).into())
}

fn update_options(scan: ScanArgs, dry_run: bool) -> UpdateOptions {
    UpdateOptions {
        archive_extensions: scan.extensions,
        primitive_scope: if scan.scan_all_containers {
            PrimitiveScope::AllContainers
        } else {
            PrimitiveScope::MatchedContainer
        },
        dry_run,
    }
}

pub fn handle_update(asm: Vec<PathBuf>, dry_run: bool, scan: ScanArgs, json: bool) -> Result<()> {
    let opts = update_options(scan, dry_run);

    let total = asm.len();
    let mut first_err: Option<RfgError> = None;
    let mut failed = 0usize;
    for (path, res) in update_many(&asm, &opts) {
        match res {
            Ok(report) => {
                for s in &report.skipped {
                    warn!(asm = %path.display(), archive = %s.path.display(), "skipped: {}", s.reason);
                }
                if json {
                    let line = UpdateLine {
                        asm: &path,
                        report: &report,
                    };
                    println!("{}", to_json(&line, false)?);
                } else {
                    info!(
                        asm = %path.display(),
                        archives = report.archives_scanned,
                        containers = report.containers_located,
                        primitives = report.primitives_updated,
                        "done"
                    );
                }
            }
            Err(e) => {
                error!(asm = %path.display(), "{e}");
                failed += 1;
                first_err.get_or_insert(e);
            }
        }
    }

    match first_err {
        Some(e) => {
            error!("{failed} of {total} asm_pc files failed");
            Err(e)
        }
        None => Ok(()),
    }
}

pub fn handle_list(asm: PathBuf, primitives: bool, json: bool) -> Result<()> {
    let file = AsmFile::load(&asm)?;
    let rows = list_containers(&file, primitives);
    if json {
        println!("{}", to_json(&rows, true)?);
        return Ok(());
    }

    println!("Containers in {}:", file.name);
    for row in rows {
        if !primitives {
            println!("  {}", row.name);
            continue;
        }
        println!("  {}:", row.name);
        for p in row.primitives {
            println!("    {}", p.name);
        }
    }
    Ok(())
}

pub fn handle_copy(
    destination: PathBuf,
    source: PathBuf,
    container: String,
    update: bool,
    scan: ScanArgs,
) -> Result<()> {
    info!(
        "copying {} from '{}' to '{}'",
        container,
        source.display(),
        destination.display()
    );
    let src = AsmFile::load(&source)?;
    let mut dst = AsmFile::load(&destination)?;
    transplant(&src, &mut dst, &container)?;
    dst.save(&destination)?;

    if update {
        update_asm(&destination, &update_options(scan, false))?;
    }
    Ok(())
}
