mod format;
mod header;
mod reader;
mod writer;

pub use format::{f32_to_ibm, ibm_to_f32, Endian, FormatError, SampleFormat};
pub use header::{textual_header, BinaryHeader, TraceHeader};
pub use reader::{SegyError, SegyReader};
pub use writer::{SegyWriter, WriteError};

use log::info;
use ndarray::{Array2, ArrayView1};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Quick metadata for a file: how many traces it has and how long the
/// first one is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceSummary {
    pub trace_count: usize,
    pub samples_per_trace: usize,
}

/// A fully decoded file. `data` is traces × samples.
#[derive(Debug, Clone)]
pub struct TraceSet {
    pub data: Array2<f32>,
    pub headers: Vec<TraceHeader>,
    pub sample_interval_us: u16,
}

impl TraceSet {
    pub fn num_traces(&self) -> usize {
        self.data.nrows()
    }

    pub fn num_samples(&self) -> usize {
        self.data.ncols()
    }

    pub fn trace(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.num_traces()).then(|| self.data.row(index))
    }

    /// Sample rate implied by the binary header, if it records one.
    pub fn sample_rate_hz(&self) -> Option<f32> {
        (self.sample_interval_us > 0).then(|| 1_000_000.0 / self.sample_interval_us as f32)
    }
}

/// Anything that can turn a path into seismic traces.
pub trait TraceDecoder {
    /// Count traces and report the first trace's length without decoding
    /// any samples.
    fn probe(&self, path: &Path) -> Result<TraceSummary, SegyError>;

    /// Decode every trace into a dense array.
    fn decode(&self, path: &Path) -> Result<TraceSet, SegyError>;
}

/// File-backed SEG-Y decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct SegyDecoder;

impl SegyDecoder {
    fn open(path: &Path) -> Result<SegyReader<BufReader<File>>, SegyError> {
        let f = File::open(path).map_err(SegyError::FileOpenFailed)?;
        SegyReader::new(BufReader::new(f))
    }
}

impl TraceDecoder for SegyDecoder {
    fn probe(&self, path: &Path) -> Result<TraceSummary, SegyError> {
        let mut reader = Self::open(path)?;
        let mut summary = TraceSummary::default();
        while let Some(header) = reader.next_header()? {
            if summary.trace_count == 0 {
                summary.samples_per_trace = reader.samples_in(&header);
            }
            reader.skip_samples(&header)?;
            summary.trace_count += 1;
        }
        Ok(summary)
    }

    fn decode(&self, path: &Path) -> Result<TraceSet, SegyError> {
        let mut reader = Self::open(path)?;
        let sample_interval_us = reader.binary_header().sample_interval_us;
        collect_traces(&mut reader, sample_interval_us).inspect(|set| {
            info!(
                "decoded {}: {} traces x {} samples",
                path.display(),
                set.num_traces(),
                set.num_samples()
            )
        })
    }
}

/// Drain a reader into a dense trace array. Every trace must share the
/// first trace's length.
pub fn collect_traces<R: std::io::Read + std::io::Seek>(
    reader: &mut SegyReader<R>,
    sample_interval_us: u16,
) -> Result<TraceSet, SegyError> {
    let mut headers = Vec::new();
    let mut flat: Vec<f32> = Vec::new();
    let mut width = 0;
    while let Some((header, samples)) = reader.next_trace()? {
        if headers.is_empty() {
            width = samples.len();
        } else if samples.len() != width {
            return Err(SegyError::RaggedTraces {
                index: headers.len(),
                found: samples.len(),
                expected: width,
            });
        }
        flat.extend_from_slice(&samples);
        headers.push(header);
    }
    let data = Array2::from_shape_vec((headers.len(), width), flat)?;
    Ok(TraceSet {
        data,
        headers,
        sample_interval_us,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn ragged_traces_are_rejected() {
        let mut bytes = Vec::new();
        SegyWriter::new(1000)
            .write(&mut bytes, [vec![1.0_f32; 4], vec![1.0; 5]].iter())
            .expect("write");
        let mut reader = SegyReader::new(Cursor::new(bytes)).expect("open");
        let err = collect_traces(&mut reader, 1000).err().unwrap();
        assert!(matches!(
            err,
            SegyError::RaggedTraces {
                index: 1,
                found: 5,
                expected: 4
            }
        ));
    }

    #[test]
    fn empty_file_is_zero_by_zero() {
        let mut bytes = Vec::new();
        SegyWriter::new(1000)
            .write(&mut bytes, Vec::<Vec<f32>>::new())
            .expect("write");
        let mut reader = SegyReader::new(Cursor::new(bytes)).expect("open");
        let set = collect_traces(&mut reader, 1000).expect("decode");
        assert_eq!(set.data.dim(), (0, 0));
        assert_eq!(set.sample_rate_hz(), Some(1000.0));
        assert!(set.trace(0).is_none());
    }

    #[test]
    fn shape_errors_are_reported() {
        let res: Result<Array2<f32>, SegyError> =
            Array2::from_shape_vec((2, 3), vec![0.0_f32; 5]).map_err(SegyError::from);
        assert!(matches!(res, Err(SegyError::Shape(_))));
    }

    #[test]
    fn uniform_traces_fill_the_array() {
        let mut bytes = Vec::new();
        SegyWriter::new(1000)
            .write(&mut bytes, [vec![1.0_f32; 4], vec![2.0; 4], vec![3.0; 4]].iter())
            .expect("write");
        let mut reader = SegyReader::new(Cursor::new(bytes)).expect("open");
        let set = collect_traces(&mut reader, 1000).expect("decode");
        assert_eq!(set.data.dim(), (3, 4));
        assert_eq!(set.data[[2, 3]], 3.0);
    }
}
