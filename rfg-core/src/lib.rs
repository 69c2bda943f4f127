#![forbid(unsafe_code)]

pub mod archive;
pub mod domain;
pub mod error;
pub mod list;
pub mod options;
pub mod reconcile;
pub mod report;

pub mod util {
    pub mod align;
    pub mod bytes;
}

pub mod asm;
pub mod packfile;

// Re-exports: stable API surface
pub use archive::{ArchiveEntry, ArchiveLayout, ArchiveMetadata, open_archive};
pub use asm::{AsmContainer, AsmFile, AsmPrimitive, SizeTable, transplant};
pub use list::list_containers;
pub use options::{PrimitiveScope, UpdateOptions};
pub use reconcile::{reconcile, update_asm, update_many};
pub use report::ReconcileReport;
