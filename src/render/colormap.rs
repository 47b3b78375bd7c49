use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColormapError {
    #[error("unknown colormap '{0}'")]
    UnknownColormap(String),
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum Palette {
    Gray,
    Inferno,
    Magma,
    Viridis,
    Seismic,
    Jet,
}

// Anchor colours keyed by their position on [0, 1].
const GRAY: &[(f64, [u8; 3])] = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];

const INFERNO: &[(f64, [u8; 3])] = &[
    (0.0, [0, 0, 4]),
    (0.125, [31, 12, 72]),
    (0.25, [85, 15, 109]),
    (0.375, [136, 34, 106]),
    (0.5, [186, 54, 85]),
    (0.625, [227, 89, 51]),
    (0.75, [249, 140, 10]),
    (0.875, [249, 201, 50]),
    (1.0, [252, 255, 164]),
];

const MAGMA: &[(f64, [u8; 3])] = &[
    (0.0, [0, 0, 4]),
    (0.125, [28, 16, 68]),
    (0.25, [79, 18, 123]),
    (0.375, [129, 37, 129]),
    (0.5, [181, 54, 122]),
    (0.625, [229, 80, 100]),
    (0.75, [251, 135, 97]),
    (0.875, [254, 194, 135]),
    (1.0, [252, 253, 191]),
];

const VIRIDIS: &[(f64, [u8; 3])] = &[
    (0.0, [68, 1, 84]),
    (0.125, [72, 40, 120]),
    (0.25, [62, 74, 137]),
    (0.375, [49, 104, 142]),
    (0.5, [38, 130, 142]),
    (0.625, [31, 158, 137]),
    (0.75, [53, 183, 121]),
    (0.875, [110, 206, 88]),
    (1.0, [253, 231, 37]),
];

const SEISMIC: &[(f64, [u8; 3])] = &[
    (0.0, [0, 0, 76]),
    (0.25, [0, 0, 255]),
    (0.5, [255, 255, 255]),
    (0.75, [255, 0, 0]),
    (1.0, [128, 0, 0]),
];

const JET: &[(f64, [u8; 3])] = &[
    (0.0, [0, 0, 128]),
    (0.125, [0, 0, 255]),
    (0.375, [0, 255, 255]),
    (0.625, [255, 255, 0]),
    (0.875, [255, 0, 0]),
    (1.0, [128, 0, 0]),
];

/// A named continuous colour scale, optionally reversed with an `_r`
/// suffix (`inferno_r`).
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Colormap {
    palette: Palette,
    reversed: bool,
}

impl Colormap {
    pub const GRAY: Colormap = Colormap::plain(Palette::Gray);
    pub const INFERNO: Colormap = Colormap::plain(Palette::Inferno);

    const fn plain(palette: Palette) -> Self {
        Self {
            palette,
            reversed: false,
        }
    }

    fn anchors(&self) -> &'static [(f64, [u8; 3])] {
        match self.palette {
            Palette::Gray => GRAY,
            Palette::Inferno => INFERNO,
            Palette::Magma => MAGMA,
            Palette::Viridis => VIRIDIS,
            Palette::Seismic => SEISMIC,
            Palette::Jet => JET,
        }
    }

    /// Colour at `t` in [0, 1]; values outside are clamped and NaN maps
    /// to the low end.
    pub fn color(&self, t: f64) -> RGBColor {
        let mut t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if self.reversed {
            t = 1.0 - t;
        }
        let anchors = self.anchors();
        let upper = anchors
            .iter()
            .position(|&(pos, _)| pos >= t)
            .unwrap_or(anchors.len() - 1)
            .max(1);
        let (p0, c0) = anchors[upper - 1];
        let (p1, c1) = anchors[upper];
        let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
        RGBColor(mix(c0[0], c1[0]), mix(c0[1], c1[1]), mix(c0[2], c1[2]))
    }

    /// Colour for `value` scaled linearly between `lo` and `hi`.
    pub fn scaled(&self, value: f64, lo: f64, hi: f64) -> RGBColor {
        let span = hi - lo;
        let t = if span > 0.0 { (value - lo) / span } else { 0.5 };
        self.color(t)
    }
}

impl FromStr for Colormap {
    type Err = ColormapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, reversed) = match s.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (s, false),
        };
        let palette = match name {
            "gray" | "grey" => Palette::Gray,
            "inferno" => Palette::Inferno,
            "magma" => Palette::Magma,
            "viridis" => Palette::Viridis,
            "seismic" => Palette::Seismic,
            "jet" => Palette::Jet,
            _ => return Err(ColormapError::UnknownColormap(s.to_owned())),
        };
        Ok(Colormap { palette, reversed })
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.palette {
            Palette::Gray => "gray",
            Palette::Inferno => "inferno",
            Palette::Magma => "magma",
            Palette::Viridis => "viridis",
            Palette::Seismic => "seismic",
            Palette::Jet => "jet",
        };
        write!(f, "{name}{}", if self.reversed { "_r" } else { "" })
    }
}
