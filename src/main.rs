//! tpmsgen command line tool.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{LevelFilter, Metadata, Record};
use nalgebra::{Point3, Vector3};
use std::path::PathBuf;
use std::process::ExitCode;
use tpmsgen::errors::Result;
use tpmsgen::float_types::Real;
use tpmsgen::isosurface::{IsosurfaceExtractor, SurfaceNets};
use tpmsgen::orientation::outward_fraction;
use tpmsgen::{
    BspKernel, DesignParameters, Family, MarchingCubes, Mesh, NormalOrientation, RefinementLoop,
    RefinementOutcome, RunConfig, TpmsVariant,
};

#[derive(Parser)]
#[command(name = "tpmsgen")]
#[command(version)]
#[command(about = "Watertight TPMS lattice meshes clipped to a box", long_about = None)]
struct Cli {
    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the design library
    Designs,

    /// Mesh a design without padding or clipping and report its orientation
    Preview {
        #[command(flatten)]
        design: DesignArgs,

        /// Reverse face winding and normals
        #[arg(long)]
        flip_normals: bool,

        /// Also write the preview mesh to this STL file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Extractor::MarchingCubes)]
        extractor: Extractor,
    },

    /// Run the refinement loop and export the closed mesh
    Generate {
        #[command(flatten)]
        design: DesignArgs,

        /// Reverse face winding and normals of every pass
        #[arg(long)]
        flip_normals: bool,

        /// Output file name, without extension
        #[arg(short, long, default_value = "tpms")]
        name: String,

        /// Output directory
        #[arg(short = 'd', long, default_value = ".")]
        dir: PathBuf,

        /// Write binary instead of ASCII STL
        #[arg(long)]
        binary: bool,

        #[arg(long, value_enum, default_value_t = Extractor::MarchingCubes)]
        extractor: Extractor,
    },

    /// Print the resolved design as JSON
    Config {
        #[command(flatten)]
        design: DesignArgs,
    },
}

#[derive(Args)]
struct DesignArgs {
    /// Design file (JSON) to start from
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Design family
    #[arg(long)]
    family: Option<Family>,

    /// Design name, full (`Shell-TPMS Gyroid`) or short (`Gyroid`)
    #[arg(long)]
    design: Option<String>,

    /// Shell wall thickness scale
    #[arg(long)]
    thickness: Option<Real>,

    /// Skeletal level-set offset C
    #[arg(long = "level-c", allow_negative_numbers = true)]
    level_c: Option<Real>,

    /// Bounding box size in mm
    #[arg(long = "box", num_args = 3, value_names = ["X", "Y", "Z"])]
    bounding_box: Option<Vec<Real>>,

    /// Unit cell size in mm
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    cell: Option<Vec<Real>>,

    /// Origin shift of the pattern in mm
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    origin: Option<Vec<Real>>,

    /// Samples per unit cell
    #[arg(short, long)]
    resolution: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Extractor {
    MarchingCubes,
    SurfaceNets,
}

fn vector(values: &[Real]) -> Vector3<Real> {
    Vector3::from_iterator(values.iter().copied())
}

impl DesignArgs {
    fn resolve(&self) -> Result<DesignParameters> {
        let base = match &self.config {
            Some(path) => DesignParameters::from_json_file(path)?,
            None => DesignParameters::default(),
        };
        let requested = self.family.unwrap_or(base.family());

        // a full name picks its own family unless one was given explicitly
        let variant = match &self.design {
            Some(name) if self.family.is_none() => name
                .parse::<TpmsVariant>()
                .unwrap_or_else(|_| TpmsVariant::resolve(requested, name)),
            Some(name) => TpmsVariant::resolve(requested, name),
            None if requested == base.family() => base.tpms_variant,
            None => match requested {
                Family::Shell => TpmsVariant::Gyroid,
                Family::Skeletal => TpmsVariant::SchoenGyroid,
            },
        };
        let family = variant.family();
        // switching family also switches to that family's default C
        let level_c = match (family == base.family(), family) {
            (true, _) => base.level_c,
            (false, Family::Shell) => DesignParameters::shell(variant).level_c,
            (false, Family::Skeletal) => DesignParameters::skeletal(variant).level_c,
        };
        let mut params = DesignParameters {
            tpms_variant: variant,
            level_c,
            ..base
        };

        if let Some(thickness) = self.thickness {
            params.thickness = thickness;
        }
        if let Some(level_c) = self.level_c {
            params.level_c = level_c;
        }
        if let Some(size) = &self.bounding_box {
            params.bounding_box_size = vector(size);
        }
        if let Some(size) = &self.cell {
            params.unit_cell_size = vector(size);
        }
        if let Some(origin) = &self.origin {
            params.origin = vector(origin);
        }
        if let Some(resolution) = self.resolution {
            params.mesh_resolution = resolution;
        }
        params.validate()?;
        Ok(params)
    }
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logger(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        ..=-2 => LevelFilter::Error,
        -1 => LevelFilter::Warn,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn refine_with<E: IsosurfaceExtractor>(
    extractor: E,
    params: &DesignParameters,
    config: RunConfig,
) -> Result<RefinementOutcome> {
    let kernel = BspKernel::new();
    RefinementLoop::with_extractor(&kernel, extractor).run(params, config)
}

fn report_orientation(mesh: &Mesh) {
    match outward_fraction(mesh, &Point3::origin()) {
        Some(fraction) => {
            println!("{:.1}% of faces point away from the box centre", fraction * 100.0);
        },
        None => println!("mesh is empty, nothing to orient"),
    }
}

fn cmd_designs() {
    for variant in TpmsVariant::ALL {
        match variant.family() {
            Family::Shell => println!("{variant}  (t = {})", variant.shell_scale()),
            Family::Skeletal => println!("{variant}"),
        }
    }
}

fn cmd_preview(
    params: &DesignParameters,
    orientation: NormalOrientation,
    output: Option<PathBuf>,
    extractor: Extractor,
) -> Result<()> {
    let preview = match extractor {
        Extractor::MarchingCubes => tpmsgen::preview::preview_with(&MarchingCubes, params, orientation)?,
        Extractor::SurfaceNets => tpmsgen::preview::preview_with(&SurfaceNets, params, orientation)?,
    };
    println!(
        "{}: {} vertices, {} faces",
        params.tpms_variant,
        preview.mesh.vertex_count(),
        preview.mesh.face_count()
    );
    report_orientation(&preview.mesh);

    if let Some(path) = output {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("preview")
            .to_owned();
        std::fs::write(&path, preview.mesh.to_stl_ascii(&name))?;
        println!("preview written to {}", path.display());
    }
    Ok(())
}

fn cmd_generate(
    params: &DesignParameters,
    orientation: NormalOrientation,
    name: &str,
    dir: PathBuf,
    binary: bool,
    extractor: Extractor,
) -> Result<()> {
    let config = RunConfig::default().with_orientation(orientation);
    let outcome = match extractor {
        Extractor::MarchingCubes => refine_with(MarchingCubes, params, config)?,
        Extractor::SurfaceNets => refine_with(SurfaceNets, params, config)?,
    };

    for (i, pass) in outcome.passes.iter().enumerate() {
        println!(
            "pass {:>2}: k = {:>3}, {} -> {} triangles{}{}",
            i + 1,
            pass.k,
            pass.triangles_before,
            pass.triangles_after,
            if pass.holes_filled { ", holes filled" } else { "" },
            if pass.is_watertight { ", watertight" } else { "" },
        );
    }
    println!("{}", outcome.status.message());

    let path = if binary {
        let path = dir.join(format!("{name}.stl"));
        std::fs::write(&path, outcome.mesh.to_stl_binary(name)?)?;
        path
    } else {
        tpmsgen::io::export_stl_file(&outcome.mesh, name, &dir)?
    };
    println!("mesh written to {}", path.display());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Designs => {
            cmd_designs();
            Ok(())
        },
        Commands::Preview {
            design,
            flip_normals,
            output,
            extractor,
        } => cmd_preview(
            &design.resolve()?,
            NormalOrientation::new(flip_normals),
            output,
            extractor,
        ),
        Commands::Generate {
            design,
            flip_normals,
            name,
            dir,
            binary,
            extractor,
        } => cmd_generate(
            &design.resolve()?,
            NormalOrientation::new(flip_normals),
            &name,
            dir,
            binary,
            extractor,
        ),
        Commands::Config { design } => {
            println!("{}", design.resolve()?.to_json_string()?);
            Ok(())
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        },
    }
}
