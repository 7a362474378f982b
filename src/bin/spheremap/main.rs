//! Spheremap CLI - spherical texture coordinates for OBJ sphere meshes.
//!
//! Usage: spheremap [-v] <COMMAND> [OPTIONS] [INPUT]
//!
//! Results are written to standard output unless `-o` is given; log messages
//! go to standard error.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use spheremap::algo::spherical::{
    self, inconsistent_faces, SphericalOptions, TexCoordSource, DEFAULT_LATITUDE_EPSILON,
    DEFAULT_POLE_EPSILON, DEFAULT_POLE_SPAN, DEFAULT_SEAM_EPSILON, DEFAULT_WRAP_SPAN,
};
use spheremap::algo::winding::reverse_winding;
use spheremap::io::{self, obj, ObjDocument};
use spheremap::mesh::{uv_sphere, UvSphereOptions};

const DEFAULT_INPUT: &str = "sphere.obj";

#[derive(Parser)]
#[command(name = "spheremap")]
#[command(author, version, about = "Spherical UV mapping for OBJ meshes", long_about = None)]
struct Cli {
    /// Log every corrected face
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project vertices to longitude/latitude texture coordinates and fix
    /// seam and pole triangles
    Uv {
        /// Input mesh file
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output mesh file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Correct the texture coordinates already in the file instead of
        /// projecting new ones
        #[arg(long)]
        reuse_texcoords: bool,

        /// Latitude distance below which a vertex counts as a pole
        #[arg(long, default_value_t = DEFAULT_POLE_EPSILON)]
        pole_epsilon: f64,

        /// Longitude below which a corner is moved across the seam
        #[arg(long, default_value_t = DEFAULT_SEAM_EPSILON)]
        seam_epsilon: f64,

        /// Allowed latitude difference between the two non-pole corners
        #[arg(long, default_value_t = DEFAULT_LATITUDE_EPSILON)]
        latitude_epsilon: f64,

        /// Longitude span of a pole triangle's base that means it crosses the seam
        #[arg(long, default_value_t = DEFAULT_POLE_SPAN)]
        pole_span: f64,

        /// Longitude span of a triangle that means it crosses the seam
        #[arg(long, default_value_t = DEFAULT_WRAP_SPAN)]
        wrap_span: f64,
    },

    /// Reverse the winding order of every triangle
    Reverse {
        /// Input mesh file
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output mesh file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a unit UV sphere
    Sphere {
        /// Vertices around each latitude ring
        #[arg(short, long, default_value = "32")]
        segments: usize,

        /// Latitude bands from pole to pole
        #[arg(short, long, default_value = "16")]
        rings: usize,

        /// Output mesh file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display mesh information
    Info {
        /// Input mesh file
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout only ever carries mesh text.
fn init_logging(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `RUST_LOG` if set, `info` otherwise; `-v` adds debug on top of either.
fn log_filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = EnvFilter::new(env.unwrap_or("info"));
    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Uv {
            input,
            output,
            reuse_texcoords,
            pole_epsilon,
            seam_epsilon,
            latitude_epsilon,
            pole_span,
            wrap_span,
        } => {
            let source = if reuse_texcoords {
                TexCoordSource::Existing
            } else {
                TexCoordSource::Project
            };
            let options = SphericalOptions::default()
                .with_source(source)
                .with_pole_epsilon(pole_epsilon)
                .with_seam_epsilon(seam_epsilon)
                .with_latitude_epsilon(latitude_epsilon)
                .with_pole_span(pole_span)
                .with_wrap_span(wrap_span);
            cmd_uv(&input, output.as_deref(), &options)?;
        }
        Commands::Reverse { input, output } => {
            cmd_reverse(&input, output.as_deref())?;
        }
        Commands::Sphere {
            segments,
            rings,
            output,
        } => {
            cmd_sphere(&UvSphereOptions::new(segments, rings), output.as_deref())?;
        }
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
    }
    Ok(())
}

/// Write the finished text in one go, so a failed run leaves no partial output.
fn emit(text: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            info!("Saved {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_uv(
    input: &Path,
    output: Option<&Path>,
    options: &SphericalOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut mesh = io::load(input)?;
    info!(
        "Loaded {}: {} vertices, {} faces",
        input.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );

    spherical::spherical_uv(&mut mesh, options)?;

    let text = obj::to_string(&mesh)?;
    emit(&text, output)?;
    info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

fn cmd_reverse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = ObjDocument::load(input)?;
    let count = reverse_winding(&mut doc)?;
    info!("Reversed {} faces from {}", count, input.display());

    let mut buf = Vec::new();
    doc.write(&mut buf)?;
    emit(&String::from_utf8(buf)?, output)
}

fn cmd_sphere(
    options: &UvSphereOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = uv_sphere(options)?;
    info!(
        "Generated sphere: {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    );
    emit(&obj::to_string(&mesh)?, output)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    let table = mesh.tex_coords();

    println!("File: {}", input.display());
    println!("Objects: {}", mesh.names().join(", "));
    println!("Vertices: {}", mesh.num_vertices());
    println!("Normals: {}", mesh.num_normals());
    println!("Texture coordinates: {}", table.len());
    println!("Faces: {}", mesh.num_faces());

    if let Some((min, max)) = table.bounding_box() {
        println!(
            "UV range: ({:.6}, {:.6}) to ({:.6}, {:.6})",
            min.x, min.y, max.x, max.y
        );
    }

    // A file's texcoords carry no undefined longitudes; count what a fresh
    // projection would see instead.
    let projected = spherical::project_vertices(
        mesh.positions(),
        &Default::default(),
        DEFAULT_POLE_EPSILON,
    );
    println!("Pole vertices: {}", projected.undefined_count());

    let with_tex_coords = mesh
        .faces()
        .iter()
        .filter(|f| f.tex_coords().is_some())
        .count();
    if with_tex_coords > 0 {
        let bad = inconsistent_faces(&mesh, DEFAULT_WRAP_SPAN);
        println!("Inconsistent faces: {}", bad.len());
        for (face, problem) in bad.iter().take(10) {
            println!("  {:?}: {:?}", face, problem);
        }
        if bad.len() > 10 {
            println!("  ... and {} more", bad.len() - 10);
        }
    }

    Ok(())
}
