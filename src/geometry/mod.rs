use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error("at least one geophone is required")]
    NoGeophones,
    #[error("at least one layer is required")]
    NoLayers,
    #[error("spread must run from left to right")]
    InvertedSpread,
}

/// `n` evenly spaced values from `start` to `end` inclusive. One value
/// yields `[start]`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// A surface source, a line of geophones and flat layers beneath them.
/// Depths are negative, increasing downwards in magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionGeometry {
    pub geophones: Vec<f64>,
    pub source: f64,
    pub layer_depths: Vec<f64>,
}

impl AcquisitionGeometry {
    pub fn builder() -> GeometryBuilder {
        GeometryBuilder::new()
    }

    /// Vertical extent of the diagram: 50 below the last listed layer to
    /// 50 above the surface. Layers at or above the surface widen the
    /// range so both they and the surface stay in view.
    pub fn depth_range(&self) -> (f64, f64) {
        let last = self.layer_depths.last().copied().unwrap_or(0.0);
        let highest = self.layer_depths.iter().copied().fold(0.0, f64::max);
        (last.min(0.0) - 50.0, highest + 50.0)
    }

    /// Horizontal extent of the diagram.
    pub fn position_range(&self) -> (f64, f64) {
        (0.0, 1800.0)
    }
}

pub struct GeometryBuilder {
    num_geophones: Option<usize>,
    spread: Option<(f64, f64)>,
    source: Option<f64>,
    num_layers: Option<usize>,
    layer_depths: Option<Vec<f64>>,
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self {
            num_geophones: None,
            spread: None,
            source: None,
            num_layers: None,
            layer_depths: None,
        }
    }

    /// Default: 8
    pub fn geophones(mut self, n: usize) -> Self {
        self.num_geophones.replace(n);
        self
    }

    /// First and last geophone positions.
    /// Default: 300 to 1500
    pub fn spread(mut self, first: f64, last: f64) -> Self {
        self.spread.replace((first, last));
        self
    }

    /// Default: 50
    pub fn source(mut self, position: f64) -> Self {
        self.source.replace(position);
        self
    }

    /// Number of layers generated at 100 unit intervals when no
    /// explicit depths are given.
    /// Default: 3
    pub fn layers(mut self, n: usize) -> Self {
        self.num_layers.replace(n);
        self
    }

    /// Explicit layer depths; overrides `layers`.
    pub fn depths(mut self, depths: Vec<f64>) -> Self {
        self.layer_depths.replace(depths);
        self
    }

    pub fn build(self) -> Result<AcquisitionGeometry, GeometryError> {
        let n = self.num_geophones.unwrap_or(8);
        if n == 0 {
            return Err(GeometryError::NoGeophones);
        }
        let (first, last) = self.spread.unwrap_or((300.0, 1500.0));
        if first > last {
            return Err(GeometryError::InvertedSpread);
        }
        let layer_depths = match self.layer_depths {
            Some(depths) => depths,
            None => {
                let layers = self.num_layers.unwrap_or(3);
                (1..=layers).map(|i| -100.0 * i as f64).collect()
            }
        };
        if layer_depths.is_empty() {
            return Err(GeometryError::NoLayers);
        }
        Ok(AcquisitionGeometry {
            geophones: linspace(first, last, n),
            source: self.source.unwrap_or(50.0),
            layer_depths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let g = AcquisitionGeometry::builder().build().expect("build");
        assert_eq!(g.geophones.len(), 8);
        assert_eq!(g.geophones[0], 300.0);
        assert_eq!(g.geophones[7], 1500.0);
        for (i, x) in g.geophones.iter().enumerate() {
            assert!((x - (300.0 + 1200.0 * i as f64 / 7.0)).abs() < 1e-9);
        }
        assert_eq!(g.source, 50.0);
        assert_eq!(g.layer_depths, vec![-100.0, -200.0, -300.0]);
        assert_eq!(g.depth_range(), (-350.0, 50.0));
    }

    #[test]
    fn explicit_depths_win() {
        let g = GeometryBuilder::new()
            .layers(5)
            .depths(vec![-40.0, -90.0])
            .build()
            .expect("build");
        assert_eq!(g.layer_depths, vec![-40.0, -90.0]);
        assert_eq!(g.depth_range(), (-140.0, 50.0));
    }

    #[test]
    fn layer_above_surface_keeps_a_vertical_range() {
        let g = GeometryBuilder::new().depths(vec![100.0]).build().expect("build");
        assert_eq!(g.depth_range(), (-50.0, 150.0));
    }

    #[test]
    fn degenerate_layouts() {
        assert_eq!(
            GeometryBuilder::new().geophones(0).build(),
            Err(GeometryError::NoGeophones)
        );
        assert_eq!(
            GeometryBuilder::new().layers(0).build(),
            Err(GeometryError::NoLayers)
        );
        assert_eq!(
            GeometryBuilder::new().spread(10.0, 0.0).build(),
            Err(GeometryError::InvertedSpread)
        );
        let one = GeometryBuilder::new().geophones(1).build().expect("build");
        assert_eq!(one.geophones, vec![300.0]);
    }

    #[test]
    fn linspace_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
