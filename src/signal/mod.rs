mod block;
mod debug;
mod spectrogram;

use std::iter::Sum;

use ndarray::{Array1, ScalarOperand};
use num_traits::{Float, One, Zero};
use rustfft::FftNum;
use sci_rs::na::RealField;

pub use block::affine::{AffineError, AffineTransform, AffineTransformBuilder};
pub use block::band_pass::{BandPassError, BandPassFilter, BandPassFilterBuilder};
pub use block::envelope::{Envelope, EnvelopeBuilder, EnvelopeError};
pub use debug::{FlowDumper, FlowObserver, FlowStep, ObserverError};
pub use spectrogram::{hann, spectrogram, Spectrogram, SpectrogramError};

/// A stage that maps a whole trace to a trace of the same length.
pub trait SignalBlock<T> {
    fn reset(&mut self);
    fn process(&mut self, input: &Array1<T>) -> Array1<T>;
}

/// Any of the signal blocks, so flows can hold a uniform chain.
pub enum ProcessingBlock<T>
where
    T: RealField + Float + FftNum + Copy + Sum + One + Zero + ScalarOperand,
{
    Affine(AffineTransform<T>),
    BandPass(BandPassFilter<T>),
    Envelope(Envelope<T>),
}

impl<T> SignalBlock<T> for ProcessingBlock<T>
where
    T: RealField + Float + FftNum + Copy + Sum + One + Zero + ScalarOperand,
{
    fn reset(&mut self) {
        match self {
            Self::Affine(b) => b.reset(),
            Self::BandPass(b) => b.reset(),
            Self::Envelope(b) => b.reset(),
        }
    }

    fn process(&mut self, input: &Array1<T>) -> Array1<T> {
        match self {
            Self::Affine(b) => b.process(input),
            Self::BandPass(b) => b.process(input),
            Self::Envelope(b) => b.process(input),
        }
    }
}

impl<T> From<AffineTransform<T>> for ProcessingBlock<T>
where
    T: RealField + Float + FftNum + Copy + Sum + One + Zero + ScalarOperand,
{
    fn from(b: AffineTransform<T>) -> Self {
        Self::Affine(b)
    }
}

impl<T> From<BandPassFilter<T>> for ProcessingBlock<T>
where
    T: RealField + Float + FftNum + Copy + Sum + One + Zero + ScalarOperand,
{
    fn from(b: BandPassFilter<T>) -> Self {
        Self::BandPass(b)
    }
}

impl<T> From<Envelope<T>> for ProcessingBlock<T>
where
    T: RealField + Float + FftNum + Copy + Sum + One + Zero + ScalarOperand,
{
    fn from(b: Envelope<T>) -> Self {
        Self::Envelope(b)
    }
}

/// Largest absolute sample, zero for empty input.
pub fn peak_amplitude<'a, I: IntoIterator<Item = &'a f32>>(samples: I) -> f32 {
    samples
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0, |acc, v| acc.max(v.abs()))
}
