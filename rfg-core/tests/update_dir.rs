mod common;

use common::{asm_file, container, prim, write_str2};
use rfg_core::error::RfgError;
use rfg_core::{AsmFile, PrimitiveScope, SizeTable, UpdateOptions, reconcile, update_asm, update_many};

fn stale_asm() -> AsmFile {
    asm_file(
        "mp_crashsite.asm_pc",
        vec![
            container(
                "terr01_l0",
                2048,
                1,
                vec![prim("rock", 1, 0), prim("tree", 1, 1)],
            ),
            container("virtual_c", 0, 0, vec![prim("bush.cvbm_pc", 5, 0)]),
            container("untouched", 4096, 333, vec![prim("lamp", 8, 9)]),
        ],
    )
}

fn ten_entries() -> Vec<(String, u32)> {
    let mut v = vec![
        ("rock.cvbm_pc".to_string(), 4096),
        ("tree.ccmesh_pc".to_string(), 1024),
        ("tree.gcmesh_pc".to_string(), 8192),
    ];
    for i in 0..7 {
        v.push((format!("filler{i}.txt"), 3));
    }
    v
}

fn write_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let files = ten_entries();
    let refs: Vec<(&str, u32)> = files.iter().map(|(n, s)| (n.as_str(), *s)).collect();
    write_str2(&dir.join("Terr01_L0.str2_pc"), &refs, 12_345, Some(512));
    write_str2(&dir.join("virtual_c.str2_pc"), &[("bush.cvbm_pc", 77)], 50, None);
    write_str2(&dir.join("nobody.str2_pc"), &[("lamp.txt", 1)], 9, None);
    std::fs::write(dir.join("readme.txt"), b"ignored").unwrap();

    let asm_path = dir.join("mp_crashsite.asm_pc");
    stale_asm().save(&asm_path).unwrap();
    asm_path
}

#[test]
fn update_rewrites_stale_fields_from_packfiles() {
    let dir = tempfile::tempdir().unwrap();
    let asm_path = write_fixture(dir.path());

    let report = update_asm(&asm_path, &UpdateOptions::default()).unwrap();
    assert_eq!(report.archives_scanned, 3);
    assert_eq!(report.containers_located, 1);
    assert_eq!(report.primitives_updated, 3);
    assert_eq!(report.unmatched_archives, vec!["nobody.str2_pc".to_string()]);
    assert!(report.skipped.is_empty());

    let asm = AsmFile::load(&asm_path).unwrap();
    let terr = asm.container("terr01_l0").unwrap();
    assert_eq!(terr.data_offset, 6144);
    assert_eq!(terr.compressed_size, 12_345);
    assert_eq!(terr.primitives[0].header_size, 4096);
    assert_eq!(terr.primitives[0].data_size, None);
    assert_eq!(terr.primitives[1].header_size, 1024);
    assert_eq!(terr.primitives[1].raw_data_size(), 8192);
    assert_eq!(terr.primitive_sizes().as_ref(), &[4096, 1024, 8192]);

    let virt = asm.container("virtual_c").unwrap();
    assert_eq!((virt.data_offset, virt.compressed_size), (0, 0));
    assert_eq!(virt.primitives[0].header_size, 77);

    let untouched = asm.container("untouched").unwrap();
    assert_eq!(untouched, &stale_asm().containers[2]);

    assert_eq!(asm.container_count(), 3);
    for c in &asm.containers {
        if c.sizes == SizeTable::Derived {
            assert_eq!(c.primitive_sizes().len(), c.size_slots());
        }
    }
}

#[test]
fn second_update_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let asm_path = write_fixture(dir.path());

    update_asm(&asm_path, &UpdateOptions::default()).unwrap();
    let first = std::fs::read(&asm_path).unwrap();
    update_asm(&asm_path, &UpdateOptions::default()).unwrap();
    let second = std::fs::read(&asm_path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn dry_run_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let asm_path = write_fixture(dir.path());
    let before = std::fs::read(&asm_path).unwrap();

    let opts = UpdateOptions {
        dry_run: true,
        ..Default::default()
    };
    let report = update_asm(&asm_path, &opts).unwrap();
    assert_eq!(report.containers_located, 1);
    assert_eq!(std::fs::read(&asm_path).unwrap(), before);
}

#[test]
fn corrupt_packfile_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let asm_path = write_fixture(dir.path());
    std::fs::write(dir.path().join("aaa_broken.str2_pc"), b"garbage").unwrap();

    let report = update_asm(&asm_path, &UpdateOptions::default()).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("aaa_broken.str2_pc"));
    assert_eq!(report.containers_located, 1);
}

#[test]
fn malformed_asm_is_fatal_and_not_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let asm_path = dir.path().join("bad.asm_pc");
    std::fs::write(&asm_path, [0xED, 0xFE, 0xEF, 0xBE, 5, 0, 3]).unwrap();

    let err = update_asm(&asm_path, &UpdateOptions::default()).unwrap_err();
    assert!(matches!(err, RfgError::MalformedDescriptor { ref name, .. } if name == "bad.asm_pc"));
    assert_eq!(std::fs::read(&asm_path).unwrap(), [0xED, 0xFE, 0xEF, 0xBE, 5, 0, 3]);
}

#[test]
fn vpp_archives_are_only_scanned_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    write_str2(&dir.path().join("terr.vpp_pc"), &[("rock.cvbm_pc", 10)], 5, None);
    let mut asm = asm_file("x.asm_pc", vec![container("terr", 1, 1, vec![prim("rock", 1, 0)])]);

    let report = reconcile(&mut asm, dir.path(), &UpdateOptions::default()).unwrap();
    assert_eq!(report.archives_scanned, 0);
    assert_eq!(asm.containers[0].primitives[0].header_size, 1);

    let opts = UpdateOptions {
        archive_extensions: vec!["str2_pc".into(), "vpp_pc".into()],
        ..Default::default()
    };
    reconcile(&mut asm, dir.path(), &opts).unwrap();
    assert_eq!(asm.containers[0].primitives[0].header_size, 10);
}

#[test]
fn all_containers_scope_uses_every_archive() {
    let dir = tempfile::tempdir().unwrap();
    write_str2(&dir.path().join("terr.str2_pc"), &[("shared.cvbm_pc", 64)], 5, None);
    let mut asm = asm_file(
        "x.asm_pc",
        vec![
            container("terr", 1, 1, vec![]),
            container("virt", 0, 0, vec![prim("shared.cvbm_pc", 1, 0)]),
        ],
    );

    reconcile(&mut asm, dir.path(), &UpdateOptions::default()).unwrap();
    assert_eq!(asm.containers[1].primitives[0].header_size, 1);

    let opts = UpdateOptions {
        primitive_scope: PrimitiveScope::AllContainers,
        ..Default::default()
    };
    reconcile(&mut asm, dir.path(), &opts).unwrap();
    assert_eq!(asm.containers[1].primitives[0].header_size, 64);
}

#[test]
fn update_many_reports_each_descriptor() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let good = write_fixture(a.path());
    let missing = b.path().join("missing.asm_pc");

    let results = update_many(&[good.clone(), missing.clone()], &UpdateOptions::default());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, good);
    assert!(results[0].1.is_ok());
    assert_eq!(results[1].0, missing);
    assert!(matches!(results[1].1, Err(RfgError::Io(_))));
}

#[test]
fn zero_size_companion_is_dropped_and_later_runs_are_stable() {
    let dir = tempfile::tempdir().unwrap();
    write_str2(
        &dir.path().join("terr.str2_pc"),
        &[("tree.ccmesh_pc", 1024), ("tree.gcmesh_pc", 0)],
        5,
        None,
    );
    let asm_path = dir.path().join("level.asm_pc");
    asm_file("level.asm_pc", vec![container("terr", 1, 1, vec![prim("tree", 1, 5)])])
        .save(&asm_path)
        .unwrap();

    update_asm(&asm_path, &UpdateOptions::default()).unwrap();
    let first = std::fs::read(&asm_path).unwrap();
    let asm = AsmFile::load(&asm_path).unwrap();
    let tree = &asm.containers[0].primitives[0];
    assert_eq!((tree.header_size, tree.data_size), (1024, None));

    update_asm(&asm_path, &UpdateOptions::default()).unwrap();
    assert_eq!(std::fs::read(&asm_path).unwrap(), first);
}

#[test]
fn entries_sharing_a_primitive_stem_do_not_overwrite_it() {
    let dir = tempfile::tempdir().unwrap();
    write_str2(
        &dir.path().join("terr.str2_pc"),
        &[("rock.cvbm_pc", 4096), ("rock.xtbl", 12)],
        5,
        None,
    );
    let mut asm = asm_file("x.asm_pc", vec![container("terr", 1, 1, vec![prim("rock", 1, 0)])]);

    let report = reconcile(&mut asm, dir.path(), &UpdateOptions::default()).unwrap();
    assert_eq!(report.primitives_updated, 1);
    assert_eq!(asm.containers[0].primitives[0].header_size, 4096);
}

#[test]
fn missing_archive_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut asm = asm_file("x.asm_pc", vec![container("terr", 1, 1, vec![])]);

    let err = reconcile(&mut asm, &dir.path().join("gone"), &UpdateOptions::default()).unwrap_err();
    assert!(matches!(err, RfgError::Io(_)));
}
