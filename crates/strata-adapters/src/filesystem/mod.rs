//! Filesystem adapters.

mod local;
mod memory;

pub use local::{DEFAULT_IGNORED, LocalFilesystem};
pub use memory::MemoryFilesystem;
