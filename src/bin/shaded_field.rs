//! shaded-field - Draw a scalar field as colour-filled contour bands.
//!
//! Four pages: identity, 1-D distorted, 2-D distorted and polar mappings.
//!
//! Run: `shaded-field --dev svg -o field.svg --contours`

use anyhow::{Context, Result};
use clap::Parser;
use shadeplot::cli::PlotArgs;
use shadeplot::demos::ShadedFieldDemo;
use shadeplot::stream::PlotStream;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// shaded-field: filled contour bands under four coordinate mappings
#[derive(Parser, Debug)]
#[command(name = "shaded-field")]
#[command(version)]
#[command(about = "Draw a field as filled contour bands", long_about = None)]
struct Cli {
    #[command(flatten)]
    plot: PlotArgs,

    /// Samples along x
    #[arg(long, default_value = "35")]
    nx: usize,

    /// Samples along y
    #[arg(long, default_value = "46")]
    ny: usize,

    /// Number of contour bands
    #[arg(long, default_value = "20")]
    ns: usize,

    /// Overlay contour lines of the stream field
    #[arg(long)]
    contours: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let demo = ShadedFieldDemo::new(cli.nx, cli.ny, cli.ns)
        .context("invalid field parameters")?
        .with_contours(cli.contours);
    let options = cli.plot.resolve("field").context("invalid output options")?;

    let mut pls = PlotStream::open(&options)
        .with_context(|| format!("failed to open {} device", options.device))?;
    pls.init()?;

    let passes = demo
        .render(&mut pls)
        .context("failed to draw shaded field")?;
    pls.end().context("failed to finish output")?;

    for pass in &passes {
        info!(
            mode = %pass.mode,
            title = pass.title,
            zmin = pass.zmin,
            zmax = pass.zmax,
            fills = pass.fill_calls,
            "pass complete"
        );
    }
    let stats = pls.stats();
    info!(
        pages = stats.pages,
        polygons = stats.polygons_filled,
        "shaded field complete"
    );
    Ok(())
}
