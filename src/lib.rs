//! # MCprep Mesh Swap
//!
//! Replace the flat block geometry of an exported Minecraft world with richer
//! models from an asset library.
//!
//! ## Overview
//!
//! World exporters produce one mesh per block material, built from plain
//! cubes. The mesh-swap engine scans each selected mesh face by face, works out
//! which block cells are occupied (and whether a block hangs on a wall),
//! deletes the flat geometry, and places a library asset in every cell.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mcprep_meshswap::{MeshSwap, SwapConfig};
//!
//! // `scene` implements the `Host` trait
//! let swap = MeshSwap::new(SwapConfig::new("//assets").with_seed(7));
//! let summary = swap.run(&mut scene)?;
//! println!("{}", summary);
//! ```
//!
//! ## Host Integration
//!
//! The engine only talks to the scene through [`Host`]. Implement it for the
//! application's scene API, or use [`MemoryScene`] for tests and tooling.

pub mod error;
pub mod types;
pub mod naming;
pub mod host;
pub mod library;
pub mod swap;

// Re-export main types for convenience
pub use error::{Result, SwapError};
pub use types::{Axis, BlockCell, BlockPosition, FaceRecord, Orientation};
pub use naming::canonical_name;
pub use host::{Host, MemoryLibrary, MemoryScene, Mesh, ObjectId, ReportLevel};
pub use library::{LibraryAsset, SwapCategory, SwapTable, LIBRARY_FILE};
pub use swap::{MeshSwap, ObjectOutcome, OperatorStatus, SwapConfig, SwapStage, SwapSummary};

/// Read a swap category table from a JSON file.
pub fn load_swap_table<P: AsRef<std::path::Path>>(path: P) -> Result<SwapTable> {
    SwapTable::from_file(path)
}
