mod collage;
mod colormap;
mod envelope;
mod geometry;
mod raster;

pub use collage::{render_collage, CollageFigure, SpectrogramPanel, SPECTROGRAM_TRACE_POSITION};
pub use colormap::{Colormap, ColormapError};
pub use envelope::{render_envelope, EnvelopeFigure};
pub use geometry::render_geometry;
pub use raster::resample_bilinear;

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;

use crate::signal::AffineError;

pub const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("no traces to draw")]
    EmptyData,
    #[error("unknown colormap")]
    Colormap(#[from] ColormapError),
    #[error("unable to scale traces")]
    Scale(#[from] AffineError),
    #[error("unable to launch viewer {}", .0.display())]
    ViewerLaunch(PathBuf, #[source] std::io::Error),
}

pub(crate) fn drawing_error<E: std::error::Error + Send + Sync>(
    e: DrawingAreaErrorKind<E>,
) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Reserve a footer strip for `caption`, if any, and return the area
/// left above it.
pub(crate) fn with_caption<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    caption: Option<&str>,
) -> Result<DrawingArea<DB, Shift>, RenderError> {
    let Some(caption) = caption else {
        return Ok(root.clone());
    };
    let (width, height) = root.dim_in_pixel();
    let (body, footer) = root.split_vertically(height as i32 - 30);
    let style = (FONT, 16)
        .into_font()
        .color(&BLUE)
        .pos(Pos::new(HPos::Center, VPos::Top));
    footer
        .draw(&Text::new(caption.to_owned(), (width as i32 / 2, 5), style))
        .map_err(drawing_error)?;
    Ok(body)
}

/// Smallest and largest finite values, widened when they coincide so
/// they can serve as an axis range.
pub(crate) fn value_range<'a, I: IntoIterator<Item = &'a f32>>(values: I) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v as f64), hi.max(v as f64))
        });
    if lo > hi {
        (-1.0, 1.0)
    } else if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Shows rendered figures by handing them to an external program.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    program: Option<PathBuf>,
}

impl Viewer {
    pub fn new(program: Option<PathBuf>) -> Self {
        Self { program }
    }

    /// Open `image` and wait for the viewer to exit. Without a viewer the
    /// path is only logged.
    pub fn show(&self, image: &Path) -> Result<(), RenderError> {
        let Some(program) = self.program.as_ref() else {
            info!("figure written to {}", image.display());
            return Ok(());
        };
        let status = Command::new(program)
            .arg(image)
            .status()
            .map_err(|e| RenderError::ViewerLaunch(program.clone(), e))?;
        if !status.success() {
            warn!("viewer {} exited with {status}", program.display());
        }
        Ok(())
    }
}
