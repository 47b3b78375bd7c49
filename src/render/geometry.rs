use std::path::Path;

use plotters::prelude::*;

use super::{drawing_error, RenderError, FONT};
use crate::geometry::AcquisitionGeometry;

/// Draw the source, geophone line and layers as a cross-section.
pub fn render_geometry(
    path: &Path,
    geometry: &AcquisitionGeometry,
    size: (u32, u32),
) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let (x0, x1) = geometry.position_range();
    let (y0, y1) = geometry.depth_range();
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Source, Geophones and Layers",
            (FONT, 20).into_font().style(FontStyle::Bold),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(drawing_error)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Position (m)")
        .y_desc("Depth (m)")
        .draw()
        .map_err(drawing_error)?;

    let marker_font = |size: u32, color: &RGBColor| (FONT, size).into_font().color(color);

    for (i, &depth) in geometry.layer_depths.iter().enumerate() {
        chart
            .draw_series(DashedLineSeries::new(
                [(x0, depth), (x1, depth)],
                8,
                5,
                BLACK.stroke_width(1),
            ))
            .map_err(drawing_error)?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("Layer {}", i + 1),
                (20.0, depth + 10.0),
                marker_font(14, &BLACK),
            )))
            .map_err(drawing_error)?;
    }

    chart
        .draw_series(std::iter::once(Circle::new(
            (geometry.source, 0.0),
            10,
            RED.filled(),
        )))
        .map_err(drawing_error)?
        .label("Source (*)")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));
    chart
        .draw_series(std::iter::once(Text::new(
            "*",
            (geometry.source - 10.0, 10.0),
            marker_font(22, &RED),
        )))
        .map_err(drawing_error)?;

    chart
        .draw_series(geometry.geophones.iter().map(|&x| {
            EmptyElement::at((x, 0.0))
                + Polygon::new(vec![(-8, -7), (8, -7), (0, 7)], GREEN.filled())
        }))
        .map_err(drawing_error)?
        .label("Geophones (x)")
        .legend(|(x, y)| {
            EmptyElement::at((x + 10, y))
                + Polygon::new(vec![(-6, -5), (6, -5), (0, 5)], GREEN.filled())
        });
    chart
        .draw_series(geometry.geophones.iter().map(|&x| {
            Text::new("x", (x - 5.0, 10.0), marker_font(16, &GREEN))
        }))
        .map_err(drawing_error)?;

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

    #[test]
    fn default_diagram_is_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("geometry.png");
        let geometry = AcquisitionGeometry::builder().build().expect("build");
        render_geometry(&path, &geometry, (800, 600)).expect("render");
        assert!(path.exists());
    }

    #[test]
    fn single_shallow_layer_is_drawn() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("shallow.png");
        let geometry = AcquisitionGeometry::builder()
            .geophones(1)
            .depths(vec![100.0])
            .build()
            .expect("build");
        render_geometry(&path, &geometry, (400, 300)).expect("render");
        assert!(path.exists());
    }
}
