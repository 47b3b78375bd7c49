use std::iter::Sum;

use log::warn;
use ndarray::{Array1, ScalarOperand};
use num_traits::{One, ToPrimitive};
use sci_rs::signal::filter::design::butter_dyn;
use sci_rs::signal::filter::design::DigitalFilter;
use sci_rs::signal::filter::design::FilterBandType;
use sci_rs::signal::filter::design::FilterOutputType;
use sci_rs::signal::filter::design::Sos;
use sci_rs::signal::filter::design::SosFormatFilter;
use sci_rs::signal::filter::sosfilt_dyn;
use thiserror::Error;

pub use num_traits::{Float, Zero};
pub use sci_rs::na::RealField;

use crate::signal::SignalBlock;

#[derive(Error, Debug)]
pub enum BandPassError {
    #[error("failed to create filter")]
    FilterFailure,
    #[error("band corners must both be given")]
    MissingCorner,
    #[error("lower corner must be above zero")]
    NonPositiveCorner,
    #[error("lower corner must be below upper corner")]
    InvertedBand,
    #[error("lower corner is at or above the Nyquist frequency")]
    CornerAboveNyquist,
}

/// Butterworth band-pass filter over whole traces.
///
/// Signal flow (per trace)
///
/// 1. Filter forward through the second-order sections.
/// 2. If zero-phase, filter the reversed result again and reverse it
///    back, cancelling the phase shift and squaring the magnitude response.
pub struct BandPassFilter<T>
where
    T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand,
{
    taps: Vec<Sos<T>>,
    zero_phase: bool,
}

impl<T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand> SignalBlock<T>
    for BandPassFilter<T>
{
    // Every call starts the sections from rest.
    fn reset(&mut self) {}

    fn process(&mut self, input: &Array1<T>) -> Array1<T> {
        let mut memory = self.taps.clone();
        let forward = Array1::from_iter(sosfilt_dyn(input, memory.as_mut_slice()));
        if !self.zero_phase {
            return forward;
        }
        let reversed: Array1<T> = forward.iter().rev().copied().collect();
        let mut memory = self.taps.clone();
        let mut backward: Vec<T> = sosfilt_dyn(&reversed, memory.as_mut_slice())
            .into_iter()
            .collect();
        backward.reverse();
        Array1::from_vec(backward)
    }
}

impl<T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand> BandPassFilter<T> {
    pub fn builder() -> BandPassFilterBuilder<T> {
        BandPassFilterBuilder::new()
    }
}

pub struct BandPassFilterBuilder<T> {
    sample_rate_hz: Option<T>,
    freqmin_hz: Option<T>,
    freqmax_hz: Option<T>,
    corners: Option<usize>,
    zero_phase: Option<bool>,
}

impl<T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand> Default
    for BandPassFilterBuilder<T>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand> BandPassFilterBuilder<T> {
    pub fn new() -> Self {
        Self {
            sample_rate_hz: None,
            freqmin_hz: None,
            freqmax_hz: None,
            corners: None,
            zero_phase: None,
        }
    }

    /// Interpret samples as coming in at a sample rate.
    pub fn sample_rate(mut self, hz: T) -> Self {
        self.sample_rate_hz.replace(hz);
        self
    }

    /// Pass band corners, in hertz.
    pub fn band(mut self, freqmin_hz: T, freqmax_hz: T) -> Self {
        self.freqmin_hz.replace(freqmin_hz);
        self.freqmax_hz.replace(freqmax_hz);
        self
    }

    /// Butterworth order of each band edge.
    /// Default: 2
    pub fn corners(mut self, corners: usize) -> Self {
        self.corners.replace(corners);
        self
    }

    /// Run the filter forwards and backwards.
    /// Default: true
    pub fn zero_phase(mut self, zero_phase: bool) -> Self {
        self.zero_phase.replace(zero_phase);
        self
    }

    /// Construct a band-pass filter block. An upper corner at or above
    /// Nyquist degrades the filter to a high-pass at the lower corner.
    pub fn build(self) -> Result<BandPassFilter<T>, BandPassError> {
        let (Some(freqmin), Some(freqmax)) = (self.freqmin_hz, self.freqmax_hz) else {
            return Err(BandPassError::MissingCorner);
        };
        let sample_rate_hz = self.sample_rate_hz.unwrap_or(T::one());
        let nyquist = sample_rate_hz / (T::one() + T::one());
        let edge = T::one() - T::from_f64(1e-6).unwrap_or_else(T::zero);

        if freqmin <= T::zero() {
            return Err(BandPassError::NonPositiveCorner);
        }
        if freqmin >= freqmax {
            return Err(BandPassError::InvertedBand);
        }
        if freqmin / nyquist >= edge {
            return Err(BandPassError::CornerAboveNyquist);
        }

        let (band, cutoffs) = if freqmax / nyquist > edge {
            warn!(
                "upper corner {:.2} Hz is at or above Nyquist ({:.2} Hz), applying a high-pass instead",
                ToPrimitive::to_f64(&freqmax).unwrap_or(f64::NAN),
                ToPrimitive::to_f64(&nyquist).unwrap_or(f64::NAN),
            );
            (FilterBandType::Highpass, vec![freqmin])
        } else {
            (FilterBandType::Bandpass, vec![freqmin, freqmax])
        };
        let filter = butter_dyn(
            self.corners.unwrap_or(2),
            cutoffs,
            Some(band),
            Some(false),
            Some(FilterOutputType::Sos),
            Some(sample_rate_hz),
        );
        let DigitalFilter::Sos(SosFormatFilter { sos }) = filter else {
            return Err(BandPassError::FilterFailure);
        };
        Ok(BandPassFilter {
            taps: sos,
            zero_phase: self.zero_phase.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(freq: f32, fs: f32, n: usize) -> Array1<f32> {
        Array1::from_iter((0..n).map(|i| (2.0 * PI * freq * i as f32 / fs).sin()))
    }

    fn middle_rms(x: &Array1<f32>) -> f32 {
        let n = x.len();
        let mid = x.slice(ndarray::s![n / 4..3 * n / 4]);
        (mid.iter().map(|v| v * v).sum::<f32>() / mid.len() as f32).sqrt()
    }

    #[test]
    fn test_one() {
        BandPassFilterBuilder::new()
            .sample_rate(100.0_f32)
            .band(1.0, 3.0)
            .corners(2)
            .build()
            .expect("works");
    }

    #[test]
    fn passes_in_band_and_rejects_out_of_band() {
        let mut filter = BandPassFilter::builder()
            .sample_rate(200.0_f32)
            .band(20.0, 60.0)
            .build()
            .expect("works");
        let passed = filter.process(&sine(40.0, 200.0, 4000));
        let rms = middle_rms(&passed);
        assert!(rms > 0.6 && rms < 0.75, "in-band rms {rms}");
        let rejected = filter.process(&sine(2.0, 200.0, 4000));
        assert!(middle_rms(&rejected) < 0.05);
    }

    #[test]
    fn output_has_input_length() {
        let mut filter = BandPassFilter::builder()
            .sample_rate(24.0_f32)
            .band(2.0, 6.0)
            .zero_phase(false)
            .build()
            .expect("works");
        assert_eq!(filter.process(&sine(3.0, 24.0, 123)).len(), 123);
    }

    #[test]
    fn upper_corner_above_nyquist_degrades_to_high_pass() {
        // Default parameters: 10-30 Hz on 24 Hz data.
        BandPassFilter::builder()
            .sample_rate(24.0_f32)
            .band(10.0, 30.0)
            .build()
            .expect("falls back to high-pass");
    }

    #[test]
    fn high_pass_fallback_keeps_upper_band() {
        let mut filter = BandPassFilter::builder()
            .sample_rate(24.0_f32)
            .band(10.0, 30.0)
            .build()
            .expect("works");
        let kept = middle_rms(&filter.process(&sine(11.0, 24.0, 4800)));
        assert!(kept > 0.5 && kept < 0.75, "11 Hz rms {kept}");
        let removed = middle_rms(&filter.process(&sine(2.0, 24.0, 4800)));
        assert!(removed < 0.01, "2 Hz rms {removed}");
    }

    #[test]
    fn zero_phase_response_is_symmetric() {
        let mut filter = BandPassFilter::builder()
            .sample_rate(100.0_f32)
            .band(5.0, 20.0)
            .build()
            .expect("works");
        let mut impulse = Array1::<f32>::zeros(401);
        impulse[200] = 1.0;
        let out = filter.process(&impulse);
        assert_eq!(out.len(), 401);
        let peak = out.iter().fold(0.0_f32, |m, v| m.max(v.abs()));
        for k in 1..150 {
            let asym = (out[200 - k] - out[200 + k]).abs();
            assert!(asym <= peak * 1e-3, "lag {k}: {asym}");
        }
    }

    #[test]
    fn rejects_bad_bands() {
        let err = |lo: f32, hi: f32| {
            BandPassFilter::builder()
                .sample_rate(24.0_f32)
                .band(lo, hi)
                .build()
                .err()
                .unwrap_or_else(|| panic!("expecting an error"))
        };
        assert!(matches!(err(0.0, 5.0), BandPassError::NonPositiveCorner));
        assert!(matches!(err(6.0, 5.0), BandPassError::InvertedBand));
        assert!(matches!(err(12.0, 20.0), BandPassError::CornerAboveNyquist));
        let missing = BandPassFilterBuilder::<f32>::new().build();
        assert!(matches!(missing, Err(BandPassError::MissingCorner)));
    }
}
