//! Repository Implementations
//!
//! Concrete implementations of the configuration set and pin ports.

mod fs_assembler;
mod pin_file;
mod set_catalog;

pub use fs_assembler::{FsAssembler, ROOT_DESCRIPTOR};
pub use pin_file::FsPinStore;
pub use set_catalog::FsSetCatalog;
