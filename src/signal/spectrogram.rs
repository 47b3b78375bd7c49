use std::f32::consts::PI;

use ndarray::{Array1, Array2, ArrayView1};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SpectrogramError {
    #[error("FFT window length must be positive")]
    EmptyWindow,
    #[error("overlap {noverlap} must be shorter than the FFT window {nfft}")]
    OverlapTooLong { nfft: usize, noverlap: usize },
    #[error("sampling frequency must be positive")]
    NonPositiveRate,
}

/// Short-time power spectral density of one trace.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Power in dB, frequencies × segments.
    pub power_db: Array2<f32>,
    /// Bin frequencies in hertz, `0..=fs/2`.
    pub freqs: Array1<f32>,
    /// Segment centres in seconds.
    pub times: Array1<f32>,
}

impl Spectrogram {
    pub fn num_freqs(&self) -> usize {
        self.freqs.len()
    }

    pub fn num_segments(&self) -> usize {
        self.times.len()
    }

    /// Smallest and largest finite dB values, for colour scaling.
    pub fn db_range(&self) -> (f32, f32) {
        self.power_db
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Symmetric Hann window of length `m`.
pub fn hann(m: usize) -> Array1<f32> {
    if m == 1 {
        return Array1::ones(1);
    }
    let denom = (m - 1) as f32;
    Array1::from_iter((0..m).map(|n| 0.5 - 0.5 * (2.0 * PI * n as f32 / denom).cos()))
}

/// One-sided spectrogram of `x`: Hann-windowed segments of `nfft`
/// samples overlapping by `noverlap`, PSD scaled by `fs · Σw²` and
/// reported in dB. Input shorter than one window is zero-padded.
pub fn spectrogram(
    x: ArrayView1<f32>,
    nfft: usize,
    fs: f32,
    noverlap: usize,
) -> Result<Spectrogram, SpectrogramError> {
    if nfft == 0 {
        return Err(SpectrogramError::EmptyWindow);
    }
    if noverlap >= nfft {
        return Err(SpectrogramError::OverlapTooLong { nfft, noverlap });
    }
    if fs <= 0.0 || !fs.is_finite() {
        return Err(SpectrogramError::NonPositiveRate);
    }

    let mut samples = x.to_vec();
    if samples.len() < nfft {
        samples.resize(nfft, 0.0);
    }
    let step = nfft - noverlap;
    let segments = (samples.len() - nfft) / step + 1;
    let bins = nfft / 2 + 1;

    let window = hann(nfft);
    let scale = fs * window.iter().map(|w| w * w).sum::<f32>();
    let fft = FftPlanner::<f32>::new().plan_fft_forward(nfft);

    let mut power_db = Array2::<f32>::zeros((bins, segments));
    let mut buffer = vec![Complex::new(0.0, 0.0); nfft];
    for seg in 0..segments {
        let start = seg * step;
        for (slot, (s, w)) in buffer
            .iter_mut()
            .zip(samples[start..start + nfft].iter().zip(window.iter()))
        {
            *slot = Complex::new(s * w, 0.0);
        }
        fft.process(&mut buffer);
        for k in 0..bins {
            let mut p = buffer[k].norm_sqr() / scale;
            let nyquist = nfft % 2 == 0 && k == nfft / 2;
            if k != 0 && !nyquist {
                p *= 2.0;
            }
            power_db[[k, seg]] = 10.0 * p.max(f32::MIN_POSITIVE).log10();
        }
    }

    let freqs = Array1::from_iter((0..bins).map(|k| k as f32 * fs / nfft as f32));
    let times =
        Array1::from_iter((0..segments).map(|seg| (seg * step) as f32 / fs + nfft as f32 / 2.0 / fs));
    Ok(Spectrogram {
        power_db,
        freqs,
        times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Axis;

    #[test]
    fn shape_follows_window_and_overlap() {
        let x = Array1::<f32>::zeros(2400);
        let s = spectrogram(x.view(), 800, 24.0, 700).expect("spectrogram");
        assert_eq!(s.num_segments(), 17);
        assert_eq!(s.num_freqs(), 401);
        assert_eq!(s.power_db.dim(), (401, 17));
        assert!((s.freqs[400] - 12.0).abs() < 1e-5);
        assert!((s.times[0] - 400.0 / 24.0).abs() < 1e-4);
        assert!((s.times[1] - s.times[0] - 100.0 / 24.0).abs() < 1e-4);
    }

    #[test]
    fn tone_peaks_at_its_frequency() {
        let fs = 64.0;
        let x = Array1::from_iter((0..1024).map(|i| (2.0 * PI * 5.0 * i as f32 / fs).sin()));
        let s = spectrogram(x.view(), 128, fs, 64).expect("spectrogram");
        let column = s.power_db.index_axis(Axis(1), 3);
        let peak = column
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (k, &v)| if v > best.1 { (k, v) } else { best });
        assert!((s.freqs[peak.0] - 5.0).abs() < 0.5);
    }

    #[test]
    fn short_input_is_padded_to_one_segment() {
        let x = Array1::<f32>::ones(10);
        let s = spectrogram(x.view(), 32, 24.0, 16).expect("spectrogram");
        assert_eq!(s.num_segments(), 1);
        assert_eq!(s.num_freqs(), 17);
    }

    #[test]
    fn bad_parameters() {
        let x = Array1::<f32>::zeros(100);
        assert_eq!(
            spectrogram(x.view(), 0, 24.0, 0).err(),
            Some(SpectrogramError::EmptyWindow)
        );
        assert_eq!(
            spectrogram(x.view(), 16, 24.0, 16).err(),
            Some(SpectrogramError::OverlapTooLong {
                nfft: 16,
                noverlap: 16
            })
        );
        assert_eq!(
            spectrogram(x.view(), 16, 0.0, 8).err(),
            Some(SpectrogramError::NonPositiveRate)
        );
    }

    #[test]
    fn hann_is_symmetric() {
        let w = hann(5);
        assert_eq!(w[0], 0.0);
        assert!((w[2] - 1.0).abs() < 1e-6);
        assert!((w[1] - w[3]).abs() < 1e-6);
    }
}
