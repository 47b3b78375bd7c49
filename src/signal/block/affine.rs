use std::iter::Sum;

use crate::signal::SignalBlock;
use ndarray::ScalarOperand;
use thiserror::Error;

pub use num_traits::{Float, One, Zero};
pub use sci_rs::na::RealField;

#[derive(Error, Debug)]
pub enum AffineError {
    #[error("gain must be finite")]
    NonFiniteGain,
}

/// Signal processor that performs an affine transform of its input.
/// The wiggle panel uses it to scale every trace by the file's peak
/// amplitude and lift it onto its own baseline.
///
/// Signal flow (per sample)
///
/// 1. Subtract "offset" from sample.
/// 2. Multiply result by "gain".
pub struct AffineTransform<T>
where
    T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand,
{
    offset: T,
    gain: T,
}

impl<T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand> SignalBlock<T>
    for AffineTransform<T>
{
    fn reset(&mut self) {}

    fn process(&mut self, input: &ndarray::Array1<T>) -> ndarray::Array1<T> {
        (input - self.offset) * self.gain
    }
}

impl<T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand> AffineTransform<T> {
    pub fn builder() -> AffineTransformBuilder<T> {
        AffineTransformBuilder::new()
    }

    /// Transform placing trace `index` on baseline `index`, scaled so the
    /// largest absolute sample of the whole file spans one unit. Silent
    /// data (peak of zero) is only shifted.
    pub fn wiggle(index: usize, peak: T) -> Result<AffineTransform<T>, AffineError> {
        let peak = Float::abs(peak);
        let (gain, scale) = if peak > T::zero() {
            (T::one() / peak, peak)
        } else {
            (T::one(), T::one())
        };
        let baseline = T::from_usize(index).unwrap_or_else(T::zero);
        Self::builder()
            .offset(-baseline * scale)
            .gain(gain)
            .build()
    }
}

pub struct AffineTransformBuilder<T> {
    offset: Option<T>,
    gain: Option<T>,
}

impl<T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand> Default
    for AffineTransformBuilder<T>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField + Float + Copy + Sum + One + Zero + ScalarOperand> AffineTransformBuilder<T> {
    pub fn new() -> Self {
        Self {
            offset: None,
            gain: None,
        }
    }

    /// Subtract this value from every input sample.
    pub fn offset(mut self, offset: T) -> Self {
        self.offset.replace(offset);
        self
    }

    /// Scale applied after the offset. Must be finite.
    pub fn gain(mut self, gain: T) -> Self {
        self.gain.replace(gain);
        self
    }

    /// Construct an affine transform.
    pub fn build(self) -> Result<AffineTransform<T>, AffineError> {
        let gain = self.gain.unwrap_or(T::one());
        if !Float::is_finite(gain) {
            return Err(AffineError::NonFiniteGain);
        }
        Ok(AffineTransform {
            offset: self.offset.unwrap_or(T::zero()),
            gain,
        })
    }
}
