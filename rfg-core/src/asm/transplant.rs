use tracing::info;

use super::model::AsmFile;
use crate::error::{Result, RfgError};

/// Copy `container` (looked up ignoring case) from `source` onto the end of
/// `destination`. An existing container of the same name in `destination` is
/// left alone, so duplicates are possible.
pub fn transplant(source: &AsmFile, destination: &mut AsmFile, container: &str) -> Result<()> {
    let found = source
        .container(container)
        .ok_or_else(|| RfgError::ContainerNotFound {
            container: container.to_string(),
            descriptor: source.name.clone(),
        })?;

    info!(
        container = %found.name,
        primitives = found.primitives.len(),
        from = %source.name,
        to = %destination.name,
        "copying container"
    );
    destination.containers.push(found.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::model::{AsmContainer, AsmPrimitive};

    fn file(name: &str, containers: &[&str]) -> AsmFile {
        let mut f = AsmFile::new(name);
        for c in containers {
            f.containers.push(AsmContainer {
                name: c.to_string(),
                data_offset: 2048,
                compressed_size: 100,
                primitives: vec![AsmPrimitive {
                    name: format!("{c}_prim"),
                    header_size: 10,
                    ..Default::default()
                }],
                ..Default::default()
            });
        }
        f
    }

    #[test]
    fn appends_an_independent_copy() {
        let mut source = file("src.asm_pc", &["C"]);
        let mut dest = file("dst.asm_pc", &["A", "B"]);

        transplant(&source, &mut dest, "c").unwrap();

        let names: Vec<_> = dest.containers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(dest.container_count(), 3);
        assert_eq!(dest.containers[2], source.containers[0]);

        source.containers[0].primitives[0].header_size = 999;
        assert_eq!(dest.containers[2].primitives[0].header_size, 10);
    }

    #[test]
    fn missing_container_leaves_destination_untouched() {
        let source = file("src.asm_pc", &["C"]);
        let mut dest = file("dst.asm_pc", &["A", "B"]);
        let before = dest.clone();

        let err = transplant(&source, &mut dest, "nope").unwrap_err();
        match err {
            RfgError::ContainerNotFound { container, descriptor } => {
                assert_eq!(container, "nope");
                assert_eq!(descriptor, "src.asm_pc");
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(dest, before);
    }

    #[test]
    fn duplicates_are_allowed() {
        let source = file("src.asm_pc", &["A"]);
        let mut dest = file("dst.asm_pc", &["A"]);
        transplant(&source, &mut dest, "A").unwrap();
        assert_eq!(dest.container_count(), 2);
    }
}
