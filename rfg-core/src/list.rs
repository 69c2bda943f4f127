use crate::asm::model::AsmFile;
use crate::domain::{ContainerRow, PrimitiveRow};

pub fn list_containers(asm: &AsmFile, with_primitives: bool) -> Vec<ContainerRow> {
    asm.containers
        .iter()
        .map(|c| ContainerRow {
            name: c.name.clone(),
            is_virtual: c.is_virtual(),
            data_offset: c.data_offset,
            compressed_size: c.compressed_size,
            primitive_count: c.primitives.len(),
            primitives: if with_primitives {
                c.primitives
                    .iter()
                    .map(|p| PrimitiveRow {
                        name: p.name.clone(),
                        header_size: p.header_size,
                        data_size: p.data_size.map(|d| d.get()),
                    })
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect()
}
