use crate::render::Colormap;

/// Parameters for the four-panel collage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollageParameters {
    /// Colormap for the heat map and spectrogram.
    pub cmap: Colormap,

    /// Sampling frequency used for the spectrogram, in hertz.
    pub fs: f32,

    /// Spectrogram FFT window length, in samples.
    pub nfft: usize,

    /// Samples shared by consecutive FFT windows.
    pub noverlap: usize,
}

/// Output image used when none is given.
pub const DEFAULT_OUTPUT_FILE: &str = "SEIS.png";
