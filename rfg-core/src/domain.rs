// rfg_core/src/domain.rs
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContainerRow {
    pub name: String,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub data_offset: u32,
    pub compressed_size: u32,
    pub primitive_count: usize,
    /// Empty unless primitives were requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub primitives: Vec<PrimitiveRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrimitiveRow {
    pub name: String,
    pub header_size: u32,
    pub data_size: Option<u32>,
}
