use std::path::Path;

use log::info;

use super::envelope_flow::{EnvelopeFlow, EnvelopeOutput};
use super::SessionError;
use crate::config::{CollageParameters, FilterParameters};
use crate::render::{
    render_collage, render_envelope, CollageFigure, EnvelopeFigure, SpectrogramPanel,
};
use crate::segy::TraceSet;

/// Figure-level settings shared by both plots.
#[derive(Debug, Clone)]
pub struct FigureStyle {
    pub size: (u32, u32),
    pub caption: Option<String>,
}

/// Render the four-panel collage of `set` to `output`.
pub fn draw_collage(
    set: &TraceSet,
    traces_to_plot: &[usize],
    params: CollageParameters,
    style: &FigureStyle,
    output: &Path,
) -> Result<SpectrogramPanel, SessionError> {
    let figure = CollageFigure {
        data: set.data.view(),
        traces_to_plot,
        params,
        caption: style.caption.clone(),
        size: style.size,
    };
    let panel = render_collage(output, &figure)?;
    info!("collage written to {}", output.display());
    Ok(panel)
}

/// Band-pass one trace of `set`, take its envelope and render both to
/// `output`. `dump` receives the intermediate signals as text.
pub fn draw_envelope(
    set: &TraceSet,
    trace: usize,
    sample_rate_hz: f32,
    params: &FilterParameters,
    style: &FigureStyle,
    output: &Path,
    dump: Option<&Path>,
) -> Result<EnvelopeOutput, SessionError> {
    let samples = set
        .trace(trace)
        .ok_or(SessionError::NoSuchTrace {
            index: trace,
            count: set.num_traces(),
        })?
        .to_owned();
    let mut flow = EnvelopeFlow::from_parameters(sample_rate_hz, params, dump)?;
    let out = flow.process(&samples)?;
    let figure = EnvelopeFigure {
        filtered: &out.filtered,
        envelope: &out.envelope,
        sample_rate_hz,
        time_window: params.time_window,
        caption: style.caption.clone(),
        size: style.size,
    };
    render_envelope(output, &figure)?;
    info!("envelope figure written to {}", output.display());
    Ok(out)
}
