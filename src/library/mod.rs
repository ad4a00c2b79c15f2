//! The mesh-swap asset library.
//!
//! This module resolves the library file, reads the swap category table
//! stored next to it, and loads replacement objects and groups through the
//! host's append/link API.

pub mod loader;
pub mod table;

pub use loader::{resolve_library_path, table_path, LibraryAsset, LibraryLoader, LIBRARY_FILE};
pub use table::{SwapCategory, SwapTable};
