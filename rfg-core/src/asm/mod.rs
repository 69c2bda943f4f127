pub mod codec;
pub mod model;
pub mod transplant;

pub use model::{AsmContainer, AsmFile, AsmPrimitive, SizeTable};
pub use transplant::transplant;
