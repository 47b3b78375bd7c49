use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::collage::CollageParameters;
use crate::render::Colormap;

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("no such preset (expected quick, standard or pro)")]
    NoSuchPreset,
}

/// Named bundles of defaults. They differ only in the default colormap,
/// FFT window, whether the plot-type menu is offered and whether the
/// figure carries the source file name.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Collage only, short FFT window.
    Quick,
    #[default]
    Standard,
    /// Grayscale, captioned figures.
    Pro,
}

impl Preset {
    pub fn collage_defaults(self) -> CollageParameters {
        let (cmap, nfft) = match self {
            Preset::Quick => (Colormap::INFERNO, 800),
            Preset::Standard => (Colormap::INFERNO, 2000),
            Preset::Pro => (Colormap::GRAY, 2000),
        };
        CollageParameters {
            cmap,
            fs: 24.0,
            nfft,
            noverlap: 700,
        }
    }

    /// Whether the user chooses between collage and filtered plots.
    pub fn offers_plot_menu(self) -> bool {
        !matches!(self, Preset::Quick)
    }

    /// Whether the user picks the acquisition folder. Otherwise the
    /// active-source folder is browsed.
    pub fn asks_acquisition_mode(self) -> bool {
        !matches!(self, Preset::Quick)
    }

    /// Whether figures are captioned with the source file name.
    pub fn captions_figures(self) -> bool {
        matches!(self, Preset::Pro)
    }
}

impl FromStr for Preset {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let res = match s {
            "quick" => Preset::Quick,
            "standard" => Preset::Standard,
            "pro" => Preset::Pro,
            _ => return Err(PresetError::NoSuchPreset),
        };
        Ok(res)
    }
}
