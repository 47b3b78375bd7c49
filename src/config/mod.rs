mod collage;
mod filter;
mod preset;
mod root;

pub use collage::{CollageParameters, DEFAULT_OUTPUT_FILE};
pub use filter::{FilterParameters, TimeWindow};
pub use preset::{Preset, PresetError};
pub use root::{Config, ConfigurationError};
