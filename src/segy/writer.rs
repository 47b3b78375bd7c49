use std::io::{self, Write};

use ndarray::Array2;
use thiserror::Error;

use super::format::SampleFormat;
use super::header::{textual_header, BinaryHeader, TraceHeader};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("write error")]
    Io(#[from] io::Error),
    #[error("trace {index} has {samples} samples, more than a SEG-Y header can hold")]
    TooManySamples { index: usize, samples: usize },
}

/// Writes well-formed big-endian SEG-Y (revision 1) streams.
pub struct SegyWriter {
    sample_interval_us: u16,
    format: SampleFormat,
    text: String,
}

impl SegyWriter {
    pub fn new(sample_interval_us: u16) -> Self {
        Self {
            sample_interval_us,
            format: SampleFormat::IeeeFloat,
            text: String::from("C 1 WRITTEN BY SEGY-VIEW"),
        }
    }

    /// Sample encoding to use. Integer formats round each sample.
    pub fn format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    /// Free text for the textual header, one card per line.
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    /// Write all traces, returning how many were written.
    pub fn write<W, I, T>(&self, mut out: W, traces: I) -> Result<usize, WriteError>
    where
        W: Write,
        I: IntoIterator<Item = T>,
        T: AsRef<[f32]>,
    {
        let mut traces = traces.into_iter().peekable();
        let first_len = traces.peek().map(|t| t.as_ref().len()).unwrap_or(0);
        let samples_per_trace = sample_count(0, first_len)?;

        let binary = BinaryHeader {
            job_id: 1,
            line_number: 1,
            reel_number: 1,
            traces_per_ensemble: 1,
            sample_interval_us: self.sample_interval_us,
            samples_per_trace,
            format_code: self.format.code(),
            ensemble_fold: 1,
            trace_sorting: 1,
            measurement_system: 1,
            revision: 0x0100,
            fixed_length: 1,
            ..Default::default()
        };
        out.write_all(&textual_header(&self.text))?;
        out.write_all(&binary.to_bytes())?;

        let mut written = 0;
        let mut payload = Vec::new();
        for (index, trace) in traces.enumerate() {
            let samples = trace.as_ref();
            let number = (index + 1) as i32;
            let header = TraceHeader {
                sequence_in_line: number,
                field_record: 1,
                trace_in_record: number,
                cdp: number,
                trace_id: 1,
                number_of_samples: sample_count(index, samples.len())?,
                sample_interval_us: self.sample_interval_us,
                ..Default::default()
            };
            out.write_all(&header.to_bytes())?;
            payload.clear();
            self.format.encode_into(samples, &mut payload);
            out.write_all(&payload)?;
            written += 1;
        }
        out.flush()?;
        Ok(written)
    }

    /// Write every row of a traces × samples array.
    pub fn write_array<W: Write>(&self, out: W, data: &Array2<f32>) -> Result<usize, WriteError> {
        self.write(out, data.outer_iter().map(|row| row.to_vec()))
    }
}

fn sample_count(index: usize, samples: usize) -> Result<u16, WriteError> {
    u16::try_from(samples).map_err(|_| WriteError::TooManySamples { index, samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segy::header::{BINARY_HEADER_LEN, TEXTUAL_HEADER_LEN, TRACE_HEADER_LEN};

    #[test]
    fn writes_expected_length() {
        let mut out = Vec::new();
        let n = SegyWriter::new(2000)
            .write(&mut out, [[0.5_f32; 10], [0.25; 10]].iter())
            .expect("write");
        assert_eq!(n, 2);
        assert_eq!(
            out.len(),
            TEXTUAL_HEADER_LEN + BINARY_HEADER_LEN + 2 * (TRACE_HEADER_LEN + 40)
        );
    }

    #[test]
    fn rejects_oversized_traces() {
        let long = vec![0.0_f32; 70_000];
        let err = SegyWriter::new(1000)
            .write(Vec::new(), [long].iter())
            .err()
            .unwrap_or_else(|| panic!("expecting an error"));
        assert!(matches!(err, WriteError::TooManySamples { index: 0, .. }));
    }

    #[test]
    fn int16_samples_are_two_bytes() {
        let mut out = Vec::new();
        SegyWriter::new(1000)
            .format(SampleFormat::Int16)
            .write(&mut out, [[1.4_f32, -2.6]].iter())
            .expect("write");
        let data = &out[TEXTUAL_HEADER_LEN + BINARY_HEADER_LEN + TRACE_HEADER_LEN..];
        assert_eq!(data, &[0x00, 0x01, 0xff, 0xfd]);
    }
}
