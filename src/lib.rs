//! Browse folders of SEG-Y seismic recordings and render overview
//! figures: wiggle, intensity, trace overlay and spectrogram panels, or a
//! band-passed trace with its envelope.
pub mod catalog;
pub mod config;
pub mod geometry;
pub mod overrides;
pub mod prompt;
pub mod render;
pub mod segy;
pub mod session;
pub mod signal;
