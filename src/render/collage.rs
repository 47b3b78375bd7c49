use std::path::Path;

use log::warn;
use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{drawing_error, value_range, with_caption, Colormap, RenderError, FONT};
use crate::config::CollageParameters;
use crate::render::raster::resample_bilinear;
use crate::signal::{peak_amplitude, spectrogram, AffineTransform, SignalBlock};

/// Position in the highlight list whose trace gets the spectrogram.
pub const SPECTROGRAM_TRACE_POSITION: usize = 6;

/// What the fourth panel of the collage shows.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SpectrogramPanel {
    Trace(usize),
    /// Five or fewer highlighted traces.
    NotEnoughTraces,
    /// No seventh highlight, or it is past the last trace.
    IndexOutOfRange,
    /// The FFT settings could not produce a spectrogram.
    InvalidParameters,
}

impl SpectrogramPanel {
    pub fn choose(traces_to_plot: &[usize], num_traces: usize) -> SpectrogramPanel {
        if traces_to_plot.len() <= 5 {
            return SpectrogramPanel::NotEnoughTraces;
        }
        match traces_to_plot.get(SPECTROGRAM_TRACE_POSITION) {
            Some(&i) if i < num_traces => SpectrogramPanel::Trace(i),
            _ => SpectrogramPanel::IndexOutOfRange,
        }
    }

    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            SpectrogramPanel::Trace(_) => None,
            SpectrogramPanel::NotEnoughTraces => Some("Spectrogram: Not enough traces selected"),
            SpectrogramPanel::IndexOutOfRange => Some("Spectrogram: Trace index out of range"),
            SpectrogramPanel::InvalidParameters => Some("Spectrogram: invalid FFT parameters"),
        }
    }
}

/// Everything needed to draw the four-panel overview of one file.
pub struct CollageFigure<'a> {
    /// Traces × samples.
    pub data: ArrayView2<'a, f32>,
    pub traces_to_plot: &'a [usize],
    pub params: CollageParameters,
    /// Footer line, e.g. the source file name.
    pub caption: Option<String>,
    pub size: (u32, u32),
}

/// Draw the collage to a PNG at `path`, reporting what the spectrogram
/// panel ended up showing.
pub fn render_collage(path: &Path, figure: &CollageFigure) -> Result<SpectrogramPanel, RenderError> {
    if figure.data.is_empty() {
        return Err(RenderError::EmptyData);
    }
    let root = BitMapBackend::new(path, figure.size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let body = with_caption(&root, figure.caption.as_deref())?;

    let panels = body.split_evenly((2, 2));
    draw_wiggle(&panels[0], figure.data)?;
    draw_heat_map(&panels[1], figure.data, figure.params.cmap)?;
    draw_overlay(&panels[2], figure.data, figure.traces_to_plot)?;
    let panel = draw_spectrogram(&panels[3], figure)?;

    root.present().map_err(drawing_error)?;
    Ok(panel)
}

fn title_font() -> FontDesc<'static> {
    (FONT, 18).into_font().style(FontStyle::Bold)
}

// Time runs downwards, so sample s is plotted at y = -s.
fn sample_label(y: &f64) -> String {
    format!("{:.0}", y.abs())
}

fn draw_wiggle<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: ArrayView2<f32>,
) -> Result<(), RenderError> {
    let (traces, samples) = data.dim();
    let peak = peak_amplitude(data.iter());
    let mut chart = ChartBuilder::on(area)
        .caption("Seismic Wave Viewer", title_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(-1f64..traces as f64, -(samples as f64)..0f64)
        .map_err(drawing_error)?;
    chart
        .configure_mesh()
        .x_desc("Traces")
        .y_desc("Time [samples]")
        .y_label_formatter(&sample_label)
        .draw()
        .map_err(drawing_error)?;

    for (i, trace) in data.outer_iter().enumerate() {
        let mut block = AffineTransform::wiggle(i, peak)?;
        let lifted = block.process(&trace.to_owned());
        chart
            .draw_series(LineSeries::new(
                lifted
                    .iter()
                    .enumerate()
                    .map(|(s, &x)| (x as f64, -(s as f64))),
                BLACK.stroke_width(1),
            ))
            .map_err(drawing_error)?;
    }
    Ok(())
}

fn draw_heat_map<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: ArrayView2<f32>,
    cmap: Colormap,
) -> Result<(), RenderError> {
    let (traces, samples) = data.dim();
    let (width, _) = area.dim_in_pixel();
    let (map_area, bar_area) = area.split_horizontally(width as i32 - 90);
    let (lo, hi) = value_range(data.iter());

    let mut chart = ChartBuilder::on(&map_area)
        .caption("Wave Intensity", title_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(
            -0.5f64..traces as f64 - 0.5,
            -(samples as f64 - 0.5)..0.5f64,
        )
        .map_err(drawing_error)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Traces")
        .y_desc("Time [samples]")
        .y_label_formatter(&sample_label)
        .draw()
        .map_err(drawing_error)?;

    let pixels = chart.plotting_area().strip_coord_spec();
    let (cols, rows) = pixels.dim_in_pixel();
    let raster = resample_bilinear(data.t(), rows as usize, cols as usize);
    for ((r, c), &v) in raster.indexed_iter() {
        pixels
            .draw_pixel((c as i32, r as i32), &cmap.scaled(v as f64, lo, hi))
            .map_err(drawing_error)?;
    }

    draw_color_bar(&bar_area, cmap, lo, hi, "Amplitude")
}

fn draw_color_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cmap: Colormap,
    lo: f64,
    hi: f64,
    label: &str,
) -> Result<(), RenderError> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(45)
        .margin_bottom(45)
        .margin_right(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, lo..hi)
        .map_err(drawing_error)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(label)
        .draw()
        .map_err(drawing_error)?;
    let steps = 128;
    let span = (hi - lo) / steps as f64;
    bar.draw_series((0..steps).map(|i| {
        let y0 = lo + span * i as f64;
        Rectangle::new(
            [(0.0, y0), (1.0, y0 + span)],
            cmap.scaled(y0 + span / 2.0, lo, hi).filled(),
        )
    }))
    .map_err(drawing_error)?;
    Ok(())
}

fn draw_overlay<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: ArrayView2<f32>,
    traces_to_plot: &[usize],
) -> Result<(), RenderError> {
    let (traces, samples) = data.dim();
    let selected: Vec<usize> = traces_to_plot
        .iter()
        .copied()
        .filter(|&i| i < traces)
        .collect();
    let (lo, hi) = value_range(selected.iter().flat_map(|&i| data.row(i).into_iter()));

    let mut chart = ChartBuilder::on(area)
        .caption("Seismic Traces", title_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..samples as f64, lo..hi)
        .map_err(drawing_error)?;
    chart
        .configure_mesh()
        .x_desc("Time [samples]")
        .y_desc("Amplitude")
        .draw()
        .map_err(drawing_error)?;
    for i in selected {
        chart
            .draw_series(LineSeries::new(
                data.row(i)
                    .iter()
                    .enumerate()
                    .map(|(s, &v)| (s as f64, v as f64)),
                BLACK.stroke_width(1),
            ))
            .map_err(drawing_error)?;
    }
    Ok(())
}

fn draw_spectrogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &CollageFigure,
) -> Result<SpectrogramPanel, RenderError> {
    let (traces, _) = figure.data.dim();
    let mut panel = SpectrogramPanel::choose(figure.traces_to_plot, traces);
    let params = &figure.params;
    if let SpectrogramPanel::Trace(index) = panel {
        match spectrogram(figure.data.row(index), params.nfft, params.fs, params.noverlap) {
            Ok(spec) => {
                let half = if spec.num_segments() > 1 {
                    (spec.times[1] - spec.times[0]) as f64 / 2.0
                } else {
                    spec.times[0] as f64
                };
                let last = spec.num_segments() - 1;
                let x_range = spec.times[0] as f64 - half..spec.times[last] as f64 + half;
                let nyquist = params.fs as f64 / 2.0;
                let df = params.fs as f64 / params.nfft as f64;
                let (lo, hi) = spec.db_range();

                let mut chart = ChartBuilder::on(area)
                    .caption("Spectrogram", title_font())
                    .margin(10)
                    .x_label_area_size(35)
                    .y_label_area_size(55)
                    .build_cartesian_2d(x_range, 0f64..nyquist)
                    .map_err(drawing_error)?;
                chart
                    .configure_mesh()
                    .disable_mesh()
                    .x_desc("Time [s]")
                    .y_desc("Frequency [Hz]")
                    .draw()
                    .map_err(drawing_error)?;
                chart
                    .draw_series(spec.power_db.indexed_iter().map(|((k, seg), &db)| {
                        let t = spec.times[seg] as f64;
                        let f = spec.freqs[k] as f64;
                        Rectangle::new(
                            [
                                (t - half, (f - df / 2.0).max(0.0)),
                                (t + half, (f + df / 2.0).min(nyquist)),
                            ],
                            params
                                .cmap
                                .scaled(db as f64, lo as f64, hi as f64)
                                .filled(),
                        )
                    }))
                    .map_err(drawing_error)?;
                return Ok(panel);
            }
            Err(e) => {
                warn!("no spectrogram for trace {index}: {e}");
                panel = SpectrogramPanel::InvalidParameters;
            }
        }
    }
    if let Some(title) = panel.placeholder() {
        area.titled(title, title_font()).map_err(drawing_error)?;
    }
    Ok(panel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrogram_needs_six_highlights() {
        assert_eq!(
            SpectrogramPanel::choose(&[0, 1, 2, 3, 4], 100),
            SpectrogramPanel::NotEnoughTraces
        );
        assert_eq!(
            SpectrogramPanel::choose(&[90, 91, 92, 93, 94], 100),
            SpectrogramPanel::NotEnoughTraces
        );
    }

    #[test]
    fn seventh_highlight_is_used() {
        assert_eq!(
            SpectrogramPanel::choose(&[0, 1, 2, 3, 4, 5, 9], 10),
            SpectrogramPanel::Trace(9)
        );
        assert_eq!(
            SpectrogramPanel::choose(&[0, 1, 2, 3, 4, 5, 10], 10),
            SpectrogramPanel::IndexOutOfRange
        );
        // Six highlights have no seventh entry.
        assert_eq!(
            SpectrogramPanel::choose(&[0, 1, 2, 3, 4, 5], 10),
            SpectrogramPanel::IndexOutOfRange
        );
    }

    #[test]
    fn placeholders() {
        assert_eq!(SpectrogramPanel::Trace(3).placeholder(), None);
        assert_eq!(
            SpectrogramPanel::IndexOutOfRange.placeholder(),
            Some("Spectrogram: Trace index out of range")
        );
    }

    #[test]
    fn empty_data_is_refused() {
        let data = ndarray::Array2::<f32>::zeros((0, 0));
        let figure = CollageFigure {
            data: data.view(),
            traces_to_plot: &[0],
            params: crate::config::Preset::Standard.collage_defaults(),
            caption: None,
            size: (400, 300),
        };
        let res = render_collage(Path::new("unused.png"), &figure);
        assert!(matches!(res, Err(RenderError::EmptyData)));
    }
}
