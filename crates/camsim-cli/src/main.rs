//! camsim CLI - STL mesh inspection and conversion
//!
//! Reads ASCII or binary STL files into an indexed mesh and reports on or
//! re-encodes them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use camsim_math::{BoundingBox3d, Point3};
use camsim_mesh::Units;
use camsim_stl::{
    read_stl, write_stl, HeaderData, ReadOptions, StlDocument, StlFormat, WriteOptions,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "camsim")]
#[command(about = "Inspect, convert and compact STL meshes", long_about = None)]
struct Cli {
    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about an STL file
    Info {
        /// Path to the STL file
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-encode an STL file
    Convert {
        /// Input STL file
        input: PathBuf,
        /// Output STL file
        output: PathBuf,
        /// Write ASCII STL
        #[arg(long, conflicts_with = "binary")]
        ascii: bool,
        /// Write binary STL (default)
        #[arg(long)]
        binary: bool,
        /// Print ASCII numbers at single precision
        #[arg(long)]
        truncate: bool,
    },
    /// Merge coincident points and drop degenerate triangles
    Compact {
        /// Input STL file
        input: PathBuf,
        /// Output STL file
        output: PathBuf,
        /// Point merge precision
        #[arg(long)]
        precision: Option<f64>,
        /// Also run the pairwise O(n²) duplicate removal
        #[arg(long)]
        slow: bool,
    },
}

/// Summary printed by `info`.
#[derive(Serialize)]
struct MeshSummary {
    file: PathBuf,
    format: StlFormat,
    solid_name: Option<String>,
    header: HeaderData,
    units: Units,
    triangles: usize,
    points: usize,
    bounding_box: BoundingBox3d,
    size: Option<Point3>,
    total_area: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Info { file, json } => show_info(&file, json)?,
        Commands::Convert {
            input,
            output,
            ascii,
            binary: _,
            truncate,
        } => {
            let format = if ascii {
                StlFormat::Ascii
            } else {
                StlFormat::Binary
            };
            convert(&input, &output, format, truncate)?;
        }
        Commands::Compact {
            input,
            output,
            precision,
            slow,
        } => compact(&input, &output, precision, slow)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load(path: &Path, options: &ReadOptions) -> Result<StlDocument> {
    read_stl(path, options).with_context(|| format!("failed to read {}", path.display()))
}

fn show_info(file: &Path, json: bool) -> Result<()> {
    let doc = load(file, &ReadOptions::default())?;
    let mesh = &doc.mesh;
    let bounding_box = mesh.bounding_box();
    let summary = MeshSummary {
        file: file.to_path_buf(),
        format: doc.format,
        solid_name: doc.solid_name.clone(),
        header: doc.header,
        units: mesh.units(),
        triangles: mesh.triangle_count(),
        points: mesh.point_count(),
        bounding_box,
        size: bounding_box.size().ok(),
        total_area: mesh.total_area(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("STL file: {}", file.display());
    println!("  Format: {:?}", summary.format);
    if let Some(name) = &summary.solid_name {
        println!("  Solid: {}", name);
    }
    if let Some([r, g, b, a]) = summary.header.color {
        println!("  Color: rgba({}, {}, {}, {})", r, g, b, a);
    }
    if let Some(m) = summary.header.material {
        println!(
            "  Material: diffuse {:?}, specular {:?}, ambient {:?}",
            m.diffuse, m.specular, m.ambient
        );
    }
    println!("  Triangles: {}", summary.triangles);
    println!("  Points: {}", summary.points);
    println!("  Bounding box: {}", summary.bounding_box);
    if let Some(size) = summary.size {
        println!("  Size: {}", size);
    }
    println!("  Total area: {:.6}", summary.total_area);
    Ok(())
}

fn convert(input: &Path, output: &Path, format: StlFormat, truncate: bool) -> Result<()> {
    let doc = load(input, &ReadOptions::default())?;
    let options = WriteOptions {
        format,
        truncate_numbers: truncate,
        header: doc.header,
        ..WriteOptions::default()
    };
    write_stl(&doc.mesh, output, &options)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Converted {} ({} triangles) to {:?} STL at {}",
        input.display(),
        doc.mesh.triangle_count(),
        format,
        output.display()
    );
    Ok(())
}

fn compact(input: &Path, output: &Path, precision: Option<f64>, slow: bool) -> Result<()> {
    let options = ReadOptions {
        compress_mesh: true,
        precision,
        ..ReadOptions::default()
    };
    let mut doc = load(input, &options)?;
    let before = doc.mesh.point_count();
    if slow {
        let merged = doc.mesh.remove_duplicates_slow();
        info!(merged, "pairwise duplicate removal finished");
    }
    let format = doc.format;
    let write = WriteOptions {
        format,
        header: doc.header,
        ..WriteOptions::default()
    };
    write_stl(&doc.mesh, output, &write)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Compacted {}: {} points ({} before pairwise pass), {} triangles",
        input.display(),
        doc.mesh.point_count(),
        before,
        doc.mesh.triangle_count()
    );
    Ok(())
}
