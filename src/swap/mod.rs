//! The mesh-swap engine.
//!
//! For every selected mesh object whose canonical name is in the swap table,
//! the engine scans its faces, works out which block cells they occupy,
//! deletes the source, and places a library asset in each cell.
//!
//! Each source object moves strictly forward through [`SwapStage`]. A failure
//! ends that object's pass and the run carries on with the next one.

pub mod cells;
pub mod placer;
pub mod scanner;
pub mod variant;

pub use cells::{aggregate_cells, on_block_edge, CellAggregator};
pub use placer::{place_cells, placement_transform};
pub use scanner::{scan_faces, snapshot_object, SourceSnapshot};
pub use variant::{choose_variant, make_rng, randomize_name};

use crate::error::{Result, SwapError};
use crate::host::{Host, ObjectId, ReportLevel};
use crate::library::{
    resolve_library_path, table_path, LibraryLoader, SwapCategory, SwapTable, LIBRARY_FILE,
};
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Configuration for a swap run.
#[derive(Debug, Clone)]
pub struct SwapConfig {
    /// Library directory or file, as entered by the user.
    pub library_path: PathBuf,
    /// File name of the library inside `library_path`.
    pub library_file: String,
    /// Seed for variant choices. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Category table. `None` reads the table next to the library, or the built-in one.
    pub swap_table: Option<SwapTable>,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from("//"),
            library_file: LIBRARY_FILE.to_string(),
            seed: None,
            swap_table: None,
        }
    }
}

impl SwapConfig {
    pub fn new(library_path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: library_path.into(),
            ..Self::default()
        }
    }

    pub fn with_library_file(mut self, file_name: impl Into<String>) -> Self {
        self.library_file = file_name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_swap_table(mut self, table: SwapTable) -> Self {
        self.swap_table = Some(table);
        self
    }
}

/// Per-object progress through a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapStage {
    Scanning,
    Snapshotted,
    SourceDeleted,
    AssetLoaded,
    Placed,
    Done,
}

impl std::fmt::Display for SwapStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapStage::Scanning => write!(f, "scanning"),
            SwapStage::Snapshotted => write!(f, "snapshotted"),
            SwapStage::SourceDeleted => write!(f, "source deleted"),
            SwapStage::AssetLoaded => write!(f, "asset loaded"),
            SwapStage::Placed => write!(f, "placed"),
            SwapStage::Done => write!(f, "done"),
        }
    }
}

/// What happened to one selected object.
#[derive(Debug)]
pub enum ObjectOutcome {
    /// Replaced by library geometry.
    Swapped {
        name: String,
        category: SwapCategory,
        cells: usize,
        created: Vec<ObjectId>,
    },
    /// Deleted without replacement.
    Erased { name: String },
    /// Left untouched.
    Skipped { name: String },
    /// Failed after reaching `stage`.
    Failed {
        name: String,
        stage: SwapStage,
        error: SwapError,
    },
}

impl ObjectOutcome {
    pub fn name(&self) -> &str {
        match self {
            ObjectOutcome::Swapped { name, .. }
            | ObjectOutcome::Erased { name }
            | ObjectOutcome::Skipped { name }
            | ObjectOutcome::Failed { name, .. } => name,
        }
    }
}

/// Result of a swap run.
#[derive(Debug, Default)]
pub struct SwapSummary {
    /// One outcome per selected mesh object, in selection order.
    pub outcomes: Vec<ObjectOutcome>,
}

impl SwapSummary {
    pub fn swapped(&self) -> usize {
        self.count(|o| matches!(o, ObjectOutcome::Swapped { .. }))
    }

    pub fn erased(&self) -> usize {
        self.count(|o| matches!(o, ObjectOutcome::Erased { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ObjectOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ObjectOutcome::Failed { .. }))
    }

    /// Total cells filled across all swapped objects.
    pub fn cells(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                ObjectOutcome::Swapped { cells, .. } => *cells,
                _ => 0,
            })
            .sum()
    }

    /// Objects created by the run.
    pub fn created(&self) -> Vec<ObjectId> {
        self.outcomes
            .iter()
            .flat_map(|o| match o {
                ObjectOutcome::Swapped { created, .. } => created.clone(),
                _ => Vec::new(),
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&ObjectOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}

impl std::fmt::Display for SwapSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Swapped {} object(s) into {} cell(s), erased {}, skipped {}",
            self.swapped(),
            self.cells(),
            self.erased(),
            self.skipped()
        )?;
        if self.failed() > 0 {
            write!(f, ", {} failed", self.failed())?;
        }
        Ok(())
    }
}

/// How the operator wrapper finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorStatus {
    Finished,
    Cancelled,
}

/// The mesh-swap operation.
pub struct MeshSwap {
    config: SwapConfig,
}

impl MeshSwap {
    pub fn new(config: SwapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Run as a host operator: errors go to the report channel, not the caller.
    pub fn execute<H: Host + ?Sized>(&self, host: &mut H) -> OperatorStatus {
        match self.run(host) {
            Ok(summary) => {
                host.report(ReportLevel::Info, &summary.to_string());
                OperatorStatus::Finished
            }
            Err(err) => {
                host.report(ReportLevel::Error, &err.to_string());
                OperatorStatus::Cancelled
            }
        }
    }

    /// Swap every selected mesh object.
    ///
    /// Fails without touching the scene if nothing is selected or the library
    /// is missing. Per-object failures are reported to the host and recorded
    /// in the summary. The selection is cleared afterwards.
    pub fn run<H: Host + ?Sized>(&self, host: &mut H) -> Result<SwapSummary> {
        let selection: Vec<ObjectId> = host
            .selected_objects()
            .into_iter()
            .filter(|&object| host.is_mesh(object))
            .collect();
        if selection.is_empty() {
            return Err(SwapError::NoSelection);
        }

        let library =
            resolve_library_path(&*host, &self.config.library_path, &self.config.library_file)?;
        let table = match &self.config.swap_table {
            Some(table) => table.clone(),
            None => SwapTable::from_file_or_default(table_path(&library))?,
        };
        debug!(
            "Swapping {} object(s) from {}",
            selection.len(),
            library.display()
        );

        let mut rng = make_rng(self.config.seed);
        let mut loader = LibraryLoader::new(library, &table);
        let mut summary = SwapSummary::default();

        for object in selection {
            let outcome = swap_object(host, &table, &mut loader, &mut rng, object);
            if let ObjectOutcome::Failed { name, stage, error } = &outcome {
                warn!("Swap of {} failed after {}: {}", name, stage, error);
                host.report(
                    ReportLevel::Warning,
                    &format!("Could not swap {}: {}", name, error),
                );
            }
            summary.outcomes.push(outcome);
        }

        host.deselect_all();
        host.set_active(None);
        info!("{}", summary);
        Ok(summary)
    }
}

fn swap_object<H: Host + ?Sized>(
    host: &mut H,
    table: &SwapTable,
    loader: &mut LibraryLoader<'_>,
    rng: &mut StdRng,
    object: ObjectId,
) -> ObjectOutcome {
    let name = match host.object_name(object) {
        Some(name) => name.to_string(),
        None => {
            return ObjectOutcome::Failed {
                name: object.to_string(),
                stage: SwapStage::Scanning,
                error: SwapError::ObjectNotFound(object),
            }
        }
    };
    let fail = |name: String, stage, error| ObjectOutcome::Failed { name, stage, error };

    let category = match table.classify(&name) {
        Ok(SwapCategory::Ignored) | Err(SwapError::UnknownSwapName(_)) => {
            return ObjectOutcome::Skipped { name }
        }
        Ok(category) => category,
        Err(err) => return fail(name, SwapStage::Scanning, err),
    };

    if category == SwapCategory::EraseOnly {
        return match host.delete_object(object) {
            Ok(()) => ObjectOutcome::Erased { name },
            Err(err) => fail(name, SwapStage::Scanning, err),
        };
    }

    let snapshot = match snapshot_object(&*host, object) {
        Ok(snapshot) => snapshot,
        Err(err) => return fail(name, SwapStage::Scanning, err),
    };
    let cells = aggregate_cells(&snapshot.faces);
    debug!(
        "{}: {} face(s) in {} cell(s)",
        name,
        snapshot.faces.len(),
        cells.len()
    );

    // The source goes before the asset arrives so the names cannot collide
    if let Err(err) = host.delete_object(object) {
        return fail(name, SwapStage::Snapshotted, err);
    }

    let asset = match loader.load(host, &snapshot.canonical, category) {
        Ok(asset) => asset,
        Err(err) => return fail(name, SwapStage::SourceDeleted, err),
    };

    match place_cells(host, &cells, &snapshot.transform, &asset, rng) {
        Ok(created) => ObjectOutcome::Swapped {
            name,
            category,
            cells: cells.len(),
            created,
        },
        Err(err) => fail(name, SwapStage::AssetLoaded, err),
    }
}
