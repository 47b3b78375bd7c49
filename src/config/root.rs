use super::preset::Preset;

use config::{ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("configuration error")]
    ParseError(#[from] ConfigError),
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Directory holding one subfolder per acquisition mode.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// Subfolder of `data_root` with active-source recordings.
    #[serde(default = "default_active_dir")]
    pub active_dir: String,

    /// Subfolder of `data_root` with passive recordings.
    #[serde(default = "default_passive_dir")]
    pub passive_dir: String,

    /// Named set of plot defaults and menu behaviour.
    #[serde(default)]
    pub preset: Preset,

    /// Program to launch with a rendered image path to display it.
    /// When absent, figures are only written to disk.
    pub viewer: Option<PathBuf>,

    /// Where the filtered trace figure is rendered before display.
    #[serde(default = "default_preview_path")]
    pub preview_path: PathBuf,

    /// Trace indices highlighted in the collage. The seventh entry picks
    /// the spectrogram trace.
    #[serde(default = "default_traces_to_plot")]
    pub traces_to_plot: Vec<usize>,

    /// Trace run through the band-pass/envelope flow.
    #[serde(default)]
    pub envelope_trace: usize,

    /// Sampling rate assumed by the band-pass/envelope flow, in hertz.
    /// Default: 24
    #[serde(default = "default_envelope_sample_rate")]
    pub envelope_sample_rate: f32,

    /// Figure size in pixels.
    #[serde(default = "default_figure_width")]
    pub figure_width: u32,
    #[serde(default = "default_figure_height")]
    pub figure_height: u32,
}

impl Config {
    /// Layer an optional JSON file under environment variables named
    /// `<prefix>_<KEY>`, nested keys joined by `env_separator`.
    pub fn new(
        path: Option<&Path>,
        env_prefix: &str,
        env_separator: &str,
    ) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Json));
        }
        builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator(env_separator)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("traces_to_plot"),
            )
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| e.into())
    }

    /// Directory for an acquisition mode.
    pub fn mode_dir(&self, active: bool) -> PathBuf {
        let sub = if active {
            &self.active_dir
        } else {
            &self.passive_dir
        };
        self.data_root.join(sub)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            active_dir: default_active_dir(),
            passive_dir: default_passive_dir(),
            preset: Preset::default(),
            viewer: None,
            preview_path: default_preview_path(),
            traces_to_plot: default_traces_to_plot(),
            envelope_trace: 0,
            envelope_sample_rate: default_envelope_sample_rate(),
            figure_width: default_figure_width(),
            figure_height: default_figure_height(),
        }
    }
}

fn default_data_root() -> PathBuf {
    PathBuf::from("Data")
}

fn default_active_dir() -> String {
    String::from("Sismica Ativa")
}

fn default_passive_dir() -> String {
    String::from("Sismica Passiva")
}

fn default_preview_path() -> PathBuf {
    std::env::temp_dir().join("segyview-envelope.png")
}

fn default_traces_to_plot() -> Vec<usize> {
    (0..=6).collect()
}

fn default_envelope_sample_rate() -> f32 {
    24.0
}

fn default_figure_width() -> u32 {
    1200
}

fn default_figure_height() -> u32 {
    1000
}
