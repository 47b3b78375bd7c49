use std::path::Path;

use ndarray::Array1;
use plotters::prelude::*;

use super::{drawing_error, value_range, with_caption, RenderError, FONT};
use crate::config::TimeWindow;

/// A filtered trace and its envelope, shown over a time window.
pub struct EnvelopeFigure<'a> {
    pub filtered: &'a Array1<f32>,
    pub envelope: &'a Array1<f32>,
    pub sample_rate_hz: f32,
    pub time_window: TimeWindow,
    pub caption: Option<String>,
    pub size: (u32, u32),
}

impl EnvelopeFigure<'_> {
    /// Horizontal range actually shown. A reversed window is swapped and
    /// an empty one widened by a second.
    pub fn x_range(&self) -> (f64, f64) {
        let (a, b) = (self.time_window.start as f64, self.time_window.end as f64);
        match a.partial_cmp(&b) {
            Some(std::cmp::Ordering::Less) => (a, b),
            Some(std::cmp::Ordering::Greater) => (b, a),
            _ => (a, a + 1.0),
        }
    }

    /// Indices of the samples whose time `i / fs` falls inside the window.
    pub fn visible(&self) -> impl Iterator<Item = usize> + '_ {
        let (start, end) = self.x_range();
        let fs = self.sample_rate_hz as f64;
        (0..self.filtered.len().min(self.envelope.len())).filter(move |&i| {
            let t = i as f64 / fs;
            t >= start && t <= end
        })
    }
}

pub fn render_envelope(path: &Path, figure: &EnvelopeFigure) -> Result<(), RenderError> {
    if figure.filtered.is_empty() {
        return Err(RenderError::EmptyData);
    }
    let root = BitMapBackend::new(path, figure.size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let body = with_caption(&root, figure.caption.as_deref())?;

    let visible: Vec<usize> = figure.visible().collect();
    let (lo, hi) = value_range(
        visible
            .iter()
            .flat_map(|&i| [&figure.filtered[i], &figure.envelope[i]]),
    );
    let (start, end) = figure.x_range();
    let fs = figure.sample_rate_hz as f64;

    let mut chart = ChartBuilder::on(&body)
        .caption(
            "Filtered Data with Envelope",
            (FONT, 20).into_font().style(FontStyle::Bold),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(start..end, lo..hi)
        .map_err(drawing_error)?;
    chart
        .configure_mesh()
        .x_desc("Time [s]")
        .y_desc("Amplitude")
        .draw()
        .map_err(drawing_error)?;

    chart
        .draw_series(LineSeries::new(
            visible
                .iter()
                .map(|&i| (i as f64 / fs, figure.filtered[i] as f64)),
            BLACK.stroke_width(1),
        ))
        .map_err(drawing_error)?
        .label("Filtered Data")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
    chart
        .draw_series(DashedLineSeries::new(
            visible
                .iter()
                .map(|&i| (i as f64 / fs, figure.envelope[i] as f64)),
            3,
            3,
            BLACK.stroke_width(1),
        ))
        .map_err(drawing_error)?
        .label("Envelope")
        .legend(|(x, y)| {
            EmptyElement::at((x, y))
                + PathElement::new(vec![(0, 0), (6, 0)], BLACK)
                + PathElement::new(vec![(12, 0), (18, 0)], BLACK)
        });

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(drawing_error)?;
    root.present().map_err(drawing_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure<'a>(x: &'a Array1<f32>, window: TimeWindow) -> EnvelopeFigure<'a> {
        EnvelopeFigure {
            filtered: x,
            envelope: x,
            sample_rate_hz: 2.0,
            time_window: window,
            caption: None,
            size: (400, 300),
        }
    }

    #[test]
    fn window_selects_samples_by_time() {
        let x = Array1::<f32>::zeros(10);
        let f = figure(&x, TimeWindow { start: 1.0, end: 2.0 });
        assert_eq!(f.visible().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn reversed_and_empty_windows() {
        let x = Array1::<f32>::zeros(4);
        assert_eq!(
            figure(&x, TimeWindow { start: 5.0, end: 1.0 }).x_range(),
            (1.0, 5.0)
        );
        assert_eq!(
            figure(&x, TimeWindow { start: 3.0, end: 3.0 }).x_range(),
            (3.0, 4.0)
        );
    }

    #[test]
    fn empty_trace_is_refused() {
        let x = Array1::<f32>::zeros(0);
        let res = render_envelope(
            Path::new("unused.png"),
            &figure(&x, TimeWindow { start: 0.0, end: 1.0 }),
        );
        assert!(matches!(res, Err(RenderError::EmptyData)));
    }
}
