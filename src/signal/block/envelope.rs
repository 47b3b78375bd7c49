use ndarray::Array1;
use num_traits::Float;
use rustfft::num_complex::Complex;
use rustfft::{FftNum, FftPlanner};
use thiserror::Error;

use crate::signal::SignalBlock;

#[derive(Error, Debug)]
pub enum EnvelopeError {}

/// Amplitude envelope: the magnitude of the analytic signal, built by
/// zeroing the negative frequencies of the trace's spectrum and doubling
/// the positive ones.
pub struct Envelope<T: FftNum> {
    planner: FftPlanner<T>,
}

impl<T: FftNum + Float> SignalBlock<T> for Envelope<T> {
    fn reset(&mut self) {}

    fn process(&mut self, input: &Array1<T>) -> Array1<T> {
        let n = input.len();
        if n == 0 {
            return Array1::from_vec(vec![]);
        }
        let mut spectrum: Vec<Complex<T>> =
            input.iter().map(|&x| Complex::new(x, T::zero())).collect();
        self.planner.plan_fft_forward(n).process(&mut spectrum);

        let two = T::one() + T::one();
        let positive_end = n.div_ceil(2);
        for (k, bin) in spectrum.iter_mut().enumerate() {
            let h = if k == 0 || (n % 2 == 0 && k == n / 2) {
                T::one()
            } else if k < positive_end {
                two
            } else {
                T::zero()
            };
            *bin = *bin * h;
        }

        self.planner.plan_fft_inverse(n).process(&mut spectrum);
        let scale = T::from_usize(n).unwrap_or_else(T::one);
        spectrum.iter().map(|c| c.norm() / scale).collect()
    }
}

impl<T: FftNum + Float> Envelope<T> {
    pub fn builder() -> EnvelopeBuilder<T> {
        EnvelopeBuilder::new()
    }
}

pub struct EnvelopeBuilder<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T: FftNum + Float> Default for EnvelopeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FftNum + Float> EnvelopeBuilder<T> {
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn build(self) -> Result<Envelope<T>, EnvelopeError> {
        Ok(Envelope {
            planner: FftPlanner::new(),
        })
    }
}
