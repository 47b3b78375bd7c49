use std::io::{self, Read, Seek, SeekFrom};

use log::debug;
use thiserror::Error;

use super::format::{Endian, FormatError, SampleFormat};
use super::header::{
    BinaryHeader, TraceHeader, BINARY_HEADER_LEN, TEXTUAL_HEADER_LEN, TRACE_HEADER_LEN,
};

#[derive(Error, Debug)]
pub enum SegyError {
    #[error("unable to open file")]
    FileOpenFailed(#[source] io::Error),
    #[error("read error")]
    Read(#[from] io::Error),
    #[error("file is shorter than the SEG-Y file headers")]
    TruncatedFileHeader,
    #[error("no supported sample format code in either byte order")]
    UnknownByteOrder,
    #[error("bad sample format")]
    Format(#[from] FormatError),
    #[error("header of trace {0} is truncated")]
    TruncatedTraceHeader(usize),
    #[error("trace {index} is too short, expected {expected} samples")]
    TruncatedTraceData { index: usize, expected: usize },
    #[error("trace {index} has {found} samples, expected {expected}")]
    RaggedTraces {
        index: usize,
        found: usize,
        expected: usize,
    },
    #[error("decoded samples do not fill a traces x samples array")]
    Shape(#[from] ndarray::ShapeError),
}

/// Sequential reader over the traces of a SEG-Y stream.
pub struct SegyReader<R> {
    inner: R,
    endian: Endian,
    format: SampleFormat,
    binary_header: BinaryHeader,
    remaining: u64,
    index: usize,
}

impl<R: Read + Seek> SegyReader<R> {
    /// Read the file headers and position the stream on the first trace.
    pub fn new(mut inner: R) -> Result<SegyReader<R>, SegyError> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;

        // The textual header is only skipped.
        let mut text = [0_u8; TEXTUAL_HEADER_LEN];
        let mut binary = [0_u8; BINARY_HEADER_LEN];
        if read_full(&mut inner, &mut text)? != TEXTUAL_HEADER_LEN
            || read_full(&mut inner, &mut binary)? != BINARY_HEADER_LEN
        {
            return Err(SegyError::TruncatedFileHeader);
        }
        let endian = BinaryHeader::detect_endian(&binary).ok_or(SegyError::UnknownByteOrder)?;
        let binary_header = BinaryHeader::parse(&binary, endian);
        let format = SampleFormat::try_from(binary_header.format_code)?;

        let extended = binary_header.extended_headers.max(0) as u64 * TEXTUAL_HEADER_LEN as u64;
        let consumed = (TEXTUAL_HEADER_LEN + BINARY_HEADER_LEN) as u64 + extended;
        if consumed > len {
            return Err(SegyError::TruncatedFileHeader);
        }
        inner.seek(SeekFrom::Start(consumed))?;
        debug!(
            "segy headers: {:?} {:?}, {} samples/trace",
            endian, format, binary_header.samples_per_trace
        );

        Ok(SegyReader {
            inner,
            endian,
            format,
            binary_header,
            remaining: len - consumed,
            index: 0,
        })
    }

    pub fn binary_header(&self) -> &BinaryHeader {
        &self.binary_header
    }

    /// Samples in a trace, falling back to the binary header when the
    /// trace header leaves the count at zero.
    pub fn samples_in(&self, header: &TraceHeader) -> usize {
        match header.number_of_samples {
            0 => self.binary_header.samples_per_trace as usize,
            n => n as usize,
        }
    }

    /// Read the next trace header, or `None` at a clean end of file.
    pub fn next_header(&mut self) -> Result<Option<TraceHeader>, SegyError> {
        let mut buf = [0_u8; TRACE_HEADER_LEN];
        match read_full(&mut self.inner, &mut buf)? {
            0 => Ok(None),
            TRACE_HEADER_LEN => {
                self.remaining = self.remaining.saturating_sub(TRACE_HEADER_LEN as u64);
                Ok(Some(TraceHeader::parse(&buf, self.endian)))
            }
            _ => Err(SegyError::TruncatedTraceHeader(self.index)),
        }
    }

    /// Skip over the samples belonging to `header`.
    pub fn skip_samples(&mut self, header: &TraceHeader) -> Result<(), SegyError> {
        let expected = self.samples_in(header);
        let bytes = (expected * self.format.width()) as u64;
        if bytes > self.remaining {
            return Err(SegyError::TruncatedTraceData {
                index: self.index,
                expected,
            });
        }
        self.inner.seek(SeekFrom::Current(bytes as i64))?;
        self.remaining -= bytes;
        self.index += 1;
        Ok(())
    }

    /// Read and decode the samples belonging to `header`.
    pub fn read_samples(&mut self, header: &TraceHeader) -> Result<Vec<f32>, SegyError> {
        let expected = self.samples_in(header);
        let mut raw = vec![0_u8; expected * self.format.width()];
        if read_full(&mut self.inner, &mut raw)? != raw.len() {
            return Err(SegyError::TruncatedTraceData {
                index: self.index,
                expected,
            });
        }
        self.remaining = self.remaining.saturating_sub(raw.len() as u64);
        let mut samples = vec![0.0_f32; expected];
        self.format.decode_into(&raw, self.endian, &mut samples);
        self.index += 1;
        Ok(samples)
    }

    /// Read the next complete trace.
    pub fn next_trace(&mut self) -> Result<Option<(TraceHeader, Vec<f32>)>, SegyError> {
        let Some(header) = self.next_header()? else {
            return Ok(None);
        };
        let samples = self.read_samples(&header)?;
        Ok(Some((header, samples)))
    }
}

// Fill as much of `buf` as the stream allows, returning the byte count.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::segy::writer::SegyWriter;

    fn two_trace_file() -> Vec<u8> {
        let mut out = Vec::new();
        SegyWriter::new(4000)
            .write(&mut out, [vec![1.0, 2.0, 3.0], vec![-1.0, -2.0, -3.0]].iter())
            .expect("write");
        out
    }

    #[test]
    fn reads_traces_in_order() {
        let mut reader = SegyReader::new(Cursor::new(two_trace_file())).expect("open");
        assert_eq!(reader.binary_header().sample_interval_us, 4000);
        let (header, first) = reader.next_trace().unwrap().unwrap();
        assert_eq!(header.number_of_samples, 3);
        assert_eq!(first, vec![1.0, 2.0, 3.0]);
        let (_, second) = reader.next_trace().unwrap().unwrap();
        assert_eq!(second, vec![-1.0, -2.0, -3.0]);
        assert!(reader.next_trace().unwrap().is_none());
    }

    #[test]
    fn truncated_trace_is_reported() {
        let mut bytes = two_trace_file();
        bytes.truncate(bytes.len() - 2);
        let mut reader = SegyReader::new(Cursor::new(bytes)).expect("open");
        reader.next_trace().unwrap();
        let err = reader.next_trace().err().unwrap_or_else(|| panic!("expecting an error"));
        assert!(matches!(err, SegyError::TruncatedTraceData { index: 1, .. }));
    }

    #[test]
    fn short_file_is_rejected() {
        let err = SegyReader::new(Cursor::new(vec![0_u8; 100])).err().unwrap();
        assert!(matches!(err, SegyError::TruncatedFileHeader));
    }

    #[test]
    fn zero_sample_header_uses_binary_count() {
        let mut bytes = two_trace_file();
        // Clear the first trace's sample count (bytes 115-116).
        let at = TEXTUAL_HEADER_LEN + BINARY_HEADER_LEN + 114;
        bytes[at] = 0;
        bytes[at + 1] = 0;
        let mut reader = SegyReader::new(Cursor::new(bytes)).expect("open");
        let (_, first) = reader.next_trace().unwrap().unwrap();
        assert_eq!(first.len(), 3);
    }
}
