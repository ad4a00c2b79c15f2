//! MCprep Mesh Swap CLI
//!
//! Run the mesh-swap engine over a JSON scene with a JSON asset library.

use clap::{Parser, Subcommand};
use mcprep_meshswap::library::{resolve_library_path, table_path};
use mcprep_meshswap::swap::{aggregate_cells, snapshot_object};
use mcprep_meshswap::{
    load_swap_table, Host, MeshSwap, MemoryScene, ObjectOutcome, SwapConfig, SwapTable,
    LIBRARY_FILE,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcprep-meshswap")]
#[command(author, version, about = "Swap exported Minecraft block meshes for library assets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Swap the selected objects of a scene
    Swap {
        /// Input scene JSON file
        #[arg(short, long)]
        scene: PathBuf,

        /// Library directory or library file
        #[arg(short, long)]
        library: PathBuf,

        /// Library file name inside the library directory
        #[arg(long, default_value = LIBRARY_FILE)]
        library_file: String,

        /// Seed for variant choices
        #[arg(long)]
        seed: Option<u64>,

        /// Swap table JSON, overriding the one next to the library
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// Output scene JSON file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the block cells detected in the selected objects
    Cells {
        /// Input scene JSON file
        #[arg(short, long)]
        scene: PathBuf,
    },

    /// Print the effective swap table for a library
    Table {
        /// Library directory or library file
        #[arg(short, long)]
        library: PathBuf,

        /// Library file name inside the library directory
        #[arg(long, default_value = LIBRARY_FILE)]
        library_file: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Swap {
            scene,
            library,
            library_file,
            seed,
            table,
            output,
        } => {
            swap_scene(&scene, library, library_file, seed, table, &output)?;
        }
        Commands::Cells { scene } => {
            show_cells(&scene)?;
        }
        Commands::Table {
            library,
            library_file,
        } => {
            show_table(library, &library_file)?;
        }
    }

    Ok(())
}

fn swap_scene(
    scene_path: &PathBuf,
    library: PathBuf,
    library_file: String,
    seed: Option<u64>,
    table: Option<PathBuf>,
    output_path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", scene_path);
    let mut scene = MemoryScene::from_file(scene_path)?;
    println!("  {} object(s), {} selected", scene.objects().len(), scene.selected_objects().len());

    let library_path = resolve_library_path(&scene, &library, &library_file)?;
    println!("Loading library from {:?}...", library_path);
    scene.load_library_file(&library_path)?;

    let mut config = SwapConfig::new(library).with_library_file(library_file);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(table_path) = table {
        config = config.with_swap_table(load_swap_table(table_path)?);
    }

    let summary = MeshSwap::new(config).run(&mut scene)?;

    for outcome in &summary.outcomes {
        match outcome {
            ObjectOutcome::Swapped {
                name,
                category,
                cells,
                created,
            } => println!(
                "  {}: {} into {} cell(s), {} object(s) created",
                name,
                category,
                cells,
                created.len()
            ),
            ObjectOutcome::Erased { name } => println!("  {}: erased", name),
            ObjectOutcome::Skipped { name } => println!("  {}: skipped", name),
            ObjectOutcome::Failed { name, stage, error } => {
                println!("  {}: failed after {}: {}", name, stage, error)
            }
        }
    }
    println!("{}", summary);

    fs::write(output_path, scene.to_json()?)?;
    println!("Wrote scene to {:?}", output_path);

    Ok(())
}

fn show_cells(scene_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let scene = MemoryScene::from_file(scene_path)?;

    for object in scene.selected_objects() {
        if !scene.is_mesh(object) {
            continue;
        }
        let snapshot = snapshot_object(&scene, object)?;
        let cells = aggregate_cells(&snapshot.faces);
        println!(
            "{} ({}): {} face(s), {} cell(s)",
            snapshot.name,
            snapshot.canonical,
            snapshot.faces.len(),
            cells.len()
        );
        for cell in cells {
            println!("  {} {}", cell.position, cell.orientation);
        }
    }

    Ok(())
}

fn show_table(library: PathBuf, library_file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let scene = MemoryScene::new();
    let library_path = resolve_library_path(&scene, &library, library_file)?;
    let table = SwapTable::from_file_or_default(table_path(&library_path))?;
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}
