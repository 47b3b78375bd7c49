//! Draws a teaching diagram of a seismic line: one surface source, a row
//! of geophones and flat layers beneath them.
use segy_view::geometry::AcquisitionGeometry;
use segy_view::overrides::DepthList;
use segy_view::render::{render_geometry, Viewer};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(name = env!("CARGO_BIN_NAME"))]
/// Synthetic acquisition geometry diagram
pub struct Cli {
    /// Output image
    #[arg(short = 'o', default_value = "geometry.png")]
    output: PathBuf,

    /// Number of geophones spread over 300 to 1500 m
    #[arg(long, default_value_t = 8)]
    geophones: usize,

    /// Number of layers, 100 m apart, when no depths are given
    #[arg(long, default_value_t = 3)]
    layers: usize,

    /// Explicit layer depths (negative, in metres)
    #[arg(long, value_names = ["d1,d2,..."], allow_hyphen_values = true)]
    depths: Option<DepthList>,

    /// Program used to display the image
    #[arg(long)]
    viewer: Option<PathBuf>,

    /// Open the image once written
    #[arg(long)]
    show: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .parse_default_env()
        .init();

    let mut builder = AcquisitionGeometry::builder()
        .geophones(cli.geophones)
        .layers(cli.layers);
    if let Some(DepthList(depths)) = cli.depths {
        builder = builder.depths(depths.into_iter().map(f64::from).collect());
    }
    let geometry = builder.build().context("Invalid geometry")?;

    render_geometry(&cli.output, &geometry, (800, 600)).context("Failed to render geometry")?;
    info!("geometry written to {}", cli.output.display());
    if cli.show {
        Viewer::new(cli.viewer)
            .show(&cli.output)
            .context("Failed to show figure")?;
    }
    Ok(())
}
