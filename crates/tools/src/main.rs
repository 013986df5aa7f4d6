use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tools::{collect_points, distance, fit, parse_point, resolve_config, sweep};

/// Globe camera framing from the command line.
#[derive(Debug, Parser)]
#[command(name = "framer", version)]
struct Cli {
    /// JSON file overriding framing constants (defaults to $FRAMER_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit compact rather than pretty-printed JSON.
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute center and wide/close altitudes for a point set.
    Fit {
        /// Points as `lat,lng[,label]`. Defaults to the site's two points.
        #[arg(allow_hyphen_values = true)]
        points: Vec<String>,
        /// JSON array of points to frame in addition to positional ones.
        #[arg(long)]
        points_file: Option<PathBuf>,
    },
    /// Scroll from wide to close framing and report each camera write.
    Sweep {
        #[arg(allow_hyphen_values = true)]
        points: Vec<String>,
        #[arg(long)]
        points_file: Option<PathBuf>,
        /// Number of progress steps between 0 and 1.
        #[arg(long, default_value_t = 20)]
        steps: u32,
    },
    /// Great-circle distance between two points.
    Distance {
        #[arg(allow_hyphen_values = true)]
        from: String,
        #[arg(allow_hyphen_values = true)]
        to: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Fit {
            points,
            points_file,
        } => {
            let points = collect_points(&points, points_file.as_deref())?;
            print_json(&fit(&points, &config), cli.compact)
        }
        Command::Sweep {
            points,
            points_file,
            steps,
        } => {
            let points = collect_points(&points, points_file.as_deref())?;
            print_json(&sweep(points, config, steps), cli.compact)
        }
        Command::Distance { from, to } => {
            let a = parse_point(&from)?;
            let b = parse_point(&to)?;
            print_json(&distance(&a, &b), cli.compact)
        }
    }
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<(), String> {
    let out = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(|e| format!("serialize output: {e}"))?;
    println!("{out}");
    Ok(())
}
