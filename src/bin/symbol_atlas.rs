//! symbol-atlas - Draw every glyph of the extended symbol set.
//!
//! Writes 17 pages of 10x10 labelled glyph grids.
//!
//! Run: `symbol-atlas --dev png -o atlas.png`

use anyhow::{Context, Result};
use clap::Parser;
use shadeplot::cli::PlotArgs;
use shadeplot::demos::render_atlas;
use shadeplot::stream::PlotStream;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// symbol-atlas: draw the plot symbol set
#[derive(Parser, Debug)]
#[command(name = "symbol-atlas")]
#[command(version)]
#[command(about = "Draw every plot symbol on 10x10 grids", long_about = None)]
struct Cli {
    #[command(flatten)]
    plot: PlotArgs,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let options = cli.plot.resolve("atlas").context("invalid output options")?;

    let mut pls = PlotStream::open(&options)
        .with_context(|| format!("failed to open {} device", options.device))?;
    pls.init()?;

    let pages = render_atlas(&mut pls).context("failed to draw symbol atlas")?;
    pls.end().context("failed to finish output")?;

    info!(
        pages = pages.len(),
        output = %options.output.display(),
        "symbol atlas complete"
    );
    Ok(())
}
