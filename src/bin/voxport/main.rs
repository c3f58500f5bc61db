//! Voxport CLI - voxel export command-line tool.
//!
//! Usage: voxport <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `voxport --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::debug;

use voxport::export::ExportOptions;
use voxport::io;
use voxport::mesh::Category;
use voxport::mesher::{CulledMesher, FaceMask};
use voxport::progress::{BlockProgress, Progress};

#[derive(Parser)]
#[command(name = "voxport")]
#[command(author, version, about = "Voxel to OBJ/PLY exporter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a voxel list to OBJ or PLY
    Export {
        /// Input voxel list (`X Y Z RRGGBB` per line)
        input: PathBuf,

        /// Output mesh file (.obj or .ply)
        output: PathBuf,

        /// TOML file with export options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Product name written in the file header
        #[arg(short, long)]
        product: Option<String>,

        /// Product version written in the file header
        #[arg(long)]
        product_version: Option<String>,

        /// Faces to emit, e.g. `all`, `none` or `+x,-x,+z`
        #[arg(short, long)]
        faces: Option<FaceMask>,
    },

    /// Display information about an exported mesh
    Info {
        /// Input mesh file (.obj or .ply)
        input: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            product,
            product_version,
            faces,
        } => {
            let mut options = match config {
                Some(path) => ExportOptions::from_toml_file(path)?,
                None => ExportOptions::default(),
            };
            if let Some(product) = product {
                options = options.with_product(product);
            }
            if let Some(version) = product_version {
                options = options.with_version(version);
            }
            if let Some(faces) = faces {
                options = options.with_faces(faces);
            }
            cmd_export(&input, &output, &options)?;
        }

        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that draws a block bar with the running quad count.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |p: &BlockProgress| {
        if p.blocks_total == 0 {
            return;
        }

        let raw_percent = if p.is_finished() {
            100
        } else {
            ((p.blocks_done * 100) + (p.blocks_total / 2)) / p.blocks_total
        };

        // Monotonic: only redraw when the percentage grows.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!(
            "\r[{}{}] {:3}% block {}/{} ({} quads)",
            bar, space, raw_percent, p.blocks_done, p.blocks_total, p.quads_total
        );
        let _ = std::io::stderr().flush();

        if p.is_finished() {
            eprintln!();
        }
    })
}

fn cmd_export(input: &Path, output: &Path, options: &ExportOptions) -> Result<(), Box<dyn std::error::Error>> {
    let volume = io::txt::load(input)?;
    println!(
        "Loaded: {} voxels in {} blocks",
        volume.voxel_count(),
        volume.block_count()
    );
    debug!("export options: {:?}", options);

    let progress = create_progress();
    let start = Instant::now();
    let pool = io::export_with_progress(volume.blocks(), &CulledMesher, output, options, &progress)?;
    let elapsed = start.elapsed();

    println!(
        "Result: {} vertices, {} normals, {} faces",
        pool.count(Category::Vertex),
        pool.count(Category::Normal),
        pool.count(Category::Face)
    );
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.vertex_count());
    println!("Normals: {}", mesh.normal_count());
    println!("Faces: {}", mesh.face_count());
    if !mesh.colors.is_empty() {
        println!("Colors: per vertex");
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let quads = mesh.faces.iter().filter(|f| f.vertices.len() == 4).count();
    if quads == mesh.face_count() {
        println!("Mesh type: Quad mesh");
    } else {
        println!("Mesh type: Mixed polygon mesh ({} quads)", quads);
    }

    Ok(())
}
