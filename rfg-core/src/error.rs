use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfgError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed asm_pc '{name}': {reason}")]
    MalformedDescriptor { name: String, reason: String },

    #[error("failed to read packfile '{}': {reason}", .path.display())]
    ArchiveRead { path: PathBuf, reason: String },

    #[error("'{descriptor}' has no container named '{container}'")]
    ContainerNotFound { container: String, descriptor: String },

    #[error("Format error: {0}")]
    Format(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, RfgError>;
