//! Subcommand implementations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mesh_io::{StlEncoding, load_stl, save_stl};
use mesh_stats::{HistogramParams, SquishParams, ZBounds, build_histogram, scan_z};
use mesh_types::{FacetMesh, MeshTopology};
use owo_colors::OwoColorize;
use tracing::info;

use crate::chart::{BarChart, CHART_WIDTH};
use crate::prompt::ask_f64;

const BELOW_QUESTION: &str = "What height do you want to squish below?";
const TO_QUESTION: &str = "What height do you want to squish it to?";

/// `stl-squish histogram`
pub fn histogram(path: &Path, buckets: usize) -> Result<()> {
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    println!(
        "Total file size for {}: {} bytes",
        path.display().green(),
        group_thousands(size).blue()
    );

    let (mesh, bounds) = load_with_bounds(path)?;
    print_bounds(&bounds);

    let params = HistogramParams::default().with_bucket_count(buckets);
    let histogram = build_histogram(&mesh, &bounds, &params)
        .with_context(|| format!("Cannot build a histogram of {}", path.display()))?;

    println!();
    print!("{}", BarChart::new(&histogram, CHART_WIDTH));
    Ok(())
}

/// `stl-squish squish`
///
/// Heights missing from the command line are read from stdin.
pub fn squish(
    path: &Path,
    below: Option<f64>,
    to: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let (mut mesh, bounds) = load_with_bounds(path)?;
    print_bounds(&bounds);
    bounds
        .require_range()
        .with_context(|| format!("Cannot squish {}", path.display()))?;

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let threshold = match below {
        Some(h) => h,
        None => ask_f64(BELOW_QUESTION, &mut stdin, &mut stdout)?,
    };
    let target = match to {
        Some(h) => h,
        None => ask_f64(TO_QUESTION, &mut stdin, &mut stdout)?,
    };

    let report = mesh_stats::squish(&mut mesh, &bounds, &SquishParams::new(threshold, target))?;

    let output = output.map_or_else(|| modified_path(path), Path::to_path_buf);
    save_stl(&mesh, &output, StlEncoding::Binary)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Squished {} of {} vertices below {} into {}",
        report.vertices_squished.to_string().yellow(),
        mesh.vertex_count(),
        threshold,
        output.display().green()
    );
    Ok(())
}

fn load_with_bounds(path: &Path) -> Result<(FacetMesh, ZBounds)> {
    let mesh = load_stl(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let bounds = scan_z(&mesh).with_context(|| format!("No geometry in {}", path.display()))?;
    info!(facets = mesh.facet_count(), "Loaded {}", path.display());
    Ok((mesh, bounds))
}

fn print_bounds(bounds: &ZBounds) {
    println!(
        "Min Z height is {} and max is {}",
        bounds.min.green(),
        bounds.max.blue()
    );
}

/// Default output path: `.modified.stl` appended to the full input path.
#[must_use]
pub fn modified_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".modified.stl");
    PathBuf::from(name)
}

/// `1234567` -> `"1,234,567"`.
#[must_use]
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
