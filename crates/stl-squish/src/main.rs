//! `stl-squish`: inspect and flatten the low end of an STL mesh.
//!
//! # Commands
//!
//! - `stl-squish histogram <PATH>` - Print the file size, the Z bounds and a
//!   bar chart of vertex heights
//! - `stl-squish squish <PATH>` - Compress every vertex below a height into a
//!   thin band and write `<PATH>.modified.stl`
//!
//! Heights not given on the command line are asked for interactively.
//! Set `RUST_LOG` or pass `-v`/`-vv` for diagnostics on stderr.

mod chart;
mod commands;
mod prompt;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Z-axis histogram and height squish for STL meshes
#[derive(Parser)]
#[command(name = "stl-squish")]
#[command(about = "Z-axis histogram and height squish for STL meshes", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the distribution of vertex heights
    Histogram {
        /// STL file to analyze (binary or ASCII)
        path: PathBuf,

        /// Number of equal-width steps between min and max Z
        #[arg(long, default_value_t = 20)]
        buckets: usize,
    },

    /// Compress every vertex below a height into a thin band
    Squish {
        /// STL file to transform (binary or ASCII)
        path: PathBuf,

        /// Squish vertices strictly below this height
        #[arg(long, allow_negative_numbers = true)]
        below: Option<f64>,

        /// Height of the band the squished vertices end up in
        #[arg(long, allow_negative_numbers = true)]
        to: Option<f64>,

        /// Output file (defaults to `<PATH>.modified.stl`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Histogram { path, buckets } => commands::histogram(&path, buckets),
        Commands::Squish {
            path,
            below,
            to,
            output,
        } => commands::squish(&path, below, to, output.as_deref()),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
