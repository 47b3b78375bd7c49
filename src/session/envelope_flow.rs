use std::path::Path;

use ndarray::Array1;
use thiserror::Error;

use crate::config::FilterParameters;
use crate::signal::{
    BandPassError, BandPassFilter, Envelope, EnvelopeError, FlowObserver, FlowStep,
    ObserverError, ProcessingBlock, SignalBlock,
};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("can't construct band-pass filter")]
    BandPass(#[from] BandPassError),
    #[error("can't construct envelope detector")]
    Envelope(#[from] EnvelopeError),
    #[error("can't write debug dump")]
    DebugDumpError(#[from] ObserverError),
}

pub struct EnvelopeOutput {
    pub filtered: Array1<f32>,
    pub envelope: Array1<f32>,
}

/// Band-pass a trace, then take the envelope of the filtered result.
pub struct EnvelopeFlow {
    band_pass: ProcessingBlock<f32>,
    envelope: ProcessingBlock<f32>,
    dumper: FlowObserver<f32>,
}

impl EnvelopeFlow {
    pub fn new(
        band_pass: ProcessingBlock<f32>,
        envelope: ProcessingBlock<f32>,
        dumper: FlowObserver<f32>,
    ) -> Self {
        EnvelopeFlow {
            band_pass,
            envelope,
            dumper,
        }
    }

    pub fn from_parameters(
        sample_rate_hz: f32,
        params: &FilterParameters,
        dump_path: Option<&Path>,
    ) -> Result<EnvelopeFlow, FlowError> {
        let band_pass: ProcessingBlock<f32> = BandPassFilter::builder()
            .sample_rate(sample_rate_hz)
            .band(params.freqmin, params.freqmax)
            .corners(2)
            .zero_phase(true)
            .build()?
            .into();
        let envelope: ProcessingBlock<f32> = Envelope::builder().build()?.into();
        let dumper = match dump_path {
            Some(path) => FlowObserver::new_dumper(path, sample_rate_hz)?,
            None => FlowObserver::null(),
        };
        Ok(EnvelopeFlow::new(band_pass, envelope, dumper))
    }

    pub fn process(&mut self, input: &Array1<f32>) -> Result<EnvelopeOutput, FlowError> {
        self.dumper.observe(FlowStep::Input, input)?;
        let filtered = self.band_pass.process(input);
        self.dumper.observe(FlowStep::Filtered, &filtered)?;
        let envelope = self.envelope.process(&filtered);
        self.dumper.observe(FlowStep::Envelope, &envelope)?;
        Ok(EnvelopeOutput { filtered, envelope })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeWindow;
    use std::f32::consts::PI;

    fn params(freqmin: f32, freqmax: f32) -> FilterParameters {
        FilterParameters {
            freqmin,
            freqmax,
            time_window: TimeWindow {
                start: 0.0,
                end: 10.0,
            },
        }
    }

    #[test]
    fn envelope_follows_passed_tone() {
        let fs = 100.0;
        let x = Array1::from_iter((0..2000).map(|i| {
            let t = i as f32 / fs;
            2.0 * (2.0 * PI * 10.0 * t).sin() + 0.5 * (2.0 * PI * 0.5 * t).sin()
        }));
        let mut flow = EnvelopeFlow::from_parameters(fs, &params(5.0, 20.0), None).expect("flow");
        let out = flow.process(&x).expect("process");
        assert_eq!(out.filtered.len(), 2000);
        assert_eq!(out.envelope.len(), 2000);
        let mid = out.envelope.slice(ndarray::s![500..1500]);
        let mean = mid.sum() / mid.len() as f32;
        assert!(mean > 1.6 && mean < 2.2, "mean envelope {mean}");
    }

    #[test]
    fn bad_band_is_reported() {
        let res = EnvelopeFlow::from_parameters(24.0, &params(30.0, 10.0), None);
        assert!(matches!(res, Err(FlowError::BandPass(BandPassError::InvertedBand))));
    }

    #[test]
    fn dump_file_gets_one_row_per_sample() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flow.txt");
        let mut flow =
            EnvelopeFlow::from_parameters(24.0, &params(2.0, 6.0), Some(&path)).expect("flow");
        flow.process(&Array1::from_iter((0..48).map(|i| (i as f32).sin())))
            .expect("process");
        drop(flow);
        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text.lines().count(), 48);
        assert!(text.starts_with("0 0 "));
    }
}
