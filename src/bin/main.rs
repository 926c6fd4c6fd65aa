//! implicit-trace CLI
//!
//! Casts rays at implicit surfaces stored as JSON expression files.

use implicit_trace::io::{get_info, load, load_json};
use implicit_trace::prelude::*;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "implicit-trace")]
#[command(version = implicit_trace::VERSION)]
#[command(about = "Ray tracing of implicit surfaces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Intersect one ray with the surface f(x, y, z) = 0
    Cast {
        /// Expression file (.json) holding f
        #[arg(short, long)]
        function: PathBuf,
        /// Ray origin as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        origin: DVec3,
        /// Ray direction as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        direction: DVec3,
        /// Trace configuration (.json); defaults are used when absent
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print a formula and its partial derivatives
    Show {
        /// Expression file (.json)
        file: PathBuf,
    },
}

fn parse_vec3(s: &str) -> Result<DVec3, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{}: {}", p, e)))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {}", s)),
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,implicit_trace=info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Cast {
            function,
            origin,
            direction,
            config,
        } => cmd_cast(function, origin, direction, config),
        Commands::Show { file } => cmd_show(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_cast(
    function: PathBuf,
    origin: DVec3,
    direction: DVec3,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let field = load(&function)?;
    let config: TraceConfig = match config {
        Some(path) => load_json(path)?,
        None => TraceConfig::default(),
    };
    if direction.length_squared() == 0.0 {
        return Err("ray direction must be non-zero".into());
    }

    let ids = IdAllocator::new();
    let surface = ImplicitFunction::with_config(&ids, field, config)?;
    let ray = Ray::new(origin, direction);

    let (_, stats) = surface.find_root(&ray)?;
    println!(
        "Bisection: {} evaluations, {} pruned, {} leaves, depth {}",
        stats.evaluations, stats.pruned, stats.leaves, stats.max_depth
    );

    let scene = Scene::new(&ids).with(surface);
    match scene.trace(&ray)? {
        Some(hit) => {
            println!("Distance: {:.6}", hit.distance);
            println!("Point:    {:.6?}", hit.point);
            println!("Normal:   {:.6?}", hit.shader.normal);
        }
        None => println!("No intersection within {}", config.max_distance),
    }
    Ok(())
}

fn cmd_show(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", get_info(&file)?);
    let field = load(&file)?;
    for var in field.variables() {
        let d = field.derive(&var)?.simplify()?;
        println!("d/d{}: {}", var, d);
    }
    Ok(())
}
