use byteorder::{BigEndian, ByteOrder};

use super::format::{Endian, SampleFormat};

pub const TEXTUAL_HEADER_LEN: usize = 3200;
pub const BINARY_HEADER_LEN: usize = 400;
pub const TRACE_HEADER_LEN: usize = 240;

// Byte offsets inside the 400 byte binary header.
const BH_JOB_ID: usize = 0;
const BH_LINE_NUMBER: usize = 4;
const BH_REEL_NUMBER: usize = 8;
const BH_TRACES_PER_ENSEMBLE: usize = 12;
const BH_AUX_TRACES_PER_ENSEMBLE: usize = 14;
const BH_SAMPLE_INTERVAL: usize = 16;
const BH_SAMPLES_PER_TRACE: usize = 20;
const BH_FORMAT_CODE: usize = 24;
const BH_ENSEMBLE_FOLD: usize = 26;
const BH_TRACE_SORTING: usize = 28;
const BH_MEASUREMENT_SYSTEM: usize = 54;
const BH_REVISION: usize = 300;
const BH_FIXED_LENGTH: usize = 302;
const BH_EXTENDED_HEADERS: usize = 304;

// Byte offsets inside each 240 byte trace header.
const TH_SEQUENCE_IN_LINE: usize = 0;
const TH_FIELD_RECORD: usize = 8;
const TH_TRACE_IN_RECORD: usize = 12;
const TH_CDP: usize = 20;
const TH_TRACE_ID: usize = 28;
const TH_OFFSET: usize = 36;
const TH_COORD_SCALAR: usize = 70;
const TH_SOURCE_X: usize = 72;
const TH_SOURCE_Y: usize = 76;
const TH_GROUP_X: usize = 80;
const TH_GROUP_Y: usize = 84;
const TH_DELAY: usize = 108;
const TH_SAMPLES: usize = 114;
const TH_SAMPLE_INTERVAL: usize = 116;

/// File-wide binary header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinaryHeader {
    pub job_id: i32,
    pub line_number: i32,
    pub reel_number: i32,
    pub traces_per_ensemble: i16,
    pub aux_traces_per_ensemble: i16,
    /// Sample interval in microseconds.
    pub sample_interval_us: u16,
    pub samples_per_trace: u16,
    pub format_code: i16,
    pub ensemble_fold: i16,
    pub trace_sorting: i16,
    pub measurement_system: i16,
    pub revision: u16,
    pub fixed_length: i16,
    /// Number of 3200 byte extended textual headers following this one.
    pub extended_headers: i16,
}

impl BinaryHeader {
    /// Guess the byte order of a binary header from its format code.
    /// Big-endian is preferred when both readings are plausible.
    pub fn detect_endian(buf: &[u8]) -> Option<Endian> {
        [Endian::Big, Endian::Little].into_iter().find(|endian| {
            SampleFormat::try_from(endian.i16(&buf[BH_FORMAT_CODE..])).is_ok()
        })
    }

    pub fn parse(buf: &[u8], endian: Endian) -> Self {
        Self {
            job_id: endian.i32(&buf[BH_JOB_ID..]),
            line_number: endian.i32(&buf[BH_LINE_NUMBER..]),
            reel_number: endian.i32(&buf[BH_REEL_NUMBER..]),
            traces_per_ensemble: endian.i16(&buf[BH_TRACES_PER_ENSEMBLE..]),
            aux_traces_per_ensemble: endian.i16(&buf[BH_AUX_TRACES_PER_ENSEMBLE..]),
            sample_interval_us: endian.u16(&buf[BH_SAMPLE_INTERVAL..]),
            samples_per_trace: endian.u16(&buf[BH_SAMPLES_PER_TRACE..]),
            format_code: endian.i16(&buf[BH_FORMAT_CODE..]),
            ensemble_fold: endian.i16(&buf[BH_ENSEMBLE_FOLD..]),
            trace_sorting: endian.i16(&buf[BH_TRACE_SORTING..]),
            measurement_system: endian.i16(&buf[BH_MEASUREMENT_SYSTEM..]),
            revision: endian.u16(&buf[BH_REVISION..]),
            fixed_length: endian.i16(&buf[BH_FIXED_LENGTH..]),
            extended_headers: endian.i16(&buf[BH_EXTENDED_HEADERS..]),
        }
    }

    /// Serialize big-endian.
    pub fn to_bytes(&self) -> [u8; BINARY_HEADER_LEN] {
        let mut buf = [0_u8; BINARY_HEADER_LEN];
        BigEndian::write_i32(&mut buf[BH_JOB_ID..], self.job_id);
        BigEndian::write_i32(&mut buf[BH_LINE_NUMBER..], self.line_number);
        BigEndian::write_i32(&mut buf[BH_REEL_NUMBER..], self.reel_number);
        BigEndian::write_i16(&mut buf[BH_TRACES_PER_ENSEMBLE..], self.traces_per_ensemble);
        BigEndian::write_i16(
            &mut buf[BH_AUX_TRACES_PER_ENSEMBLE..],
            self.aux_traces_per_ensemble,
        );
        BigEndian::write_u16(&mut buf[BH_SAMPLE_INTERVAL..], self.sample_interval_us);
        BigEndian::write_u16(&mut buf[BH_SAMPLES_PER_TRACE..], self.samples_per_trace);
        BigEndian::write_i16(&mut buf[BH_FORMAT_CODE..], self.format_code);
        BigEndian::write_i16(&mut buf[BH_ENSEMBLE_FOLD..], self.ensemble_fold);
        BigEndian::write_i16(&mut buf[BH_TRACE_SORTING..], self.trace_sorting);
        BigEndian::write_i16(&mut buf[BH_MEASUREMENT_SYSTEM..], self.measurement_system);
        BigEndian::write_u16(&mut buf[BH_REVISION..], self.revision);
        BigEndian::write_i16(&mut buf[BH_FIXED_LENGTH..], self.fixed_length);
        BigEndian::write_i16(&mut buf[BH_EXTENDED_HEADERS..], self.extended_headers);
        buf
    }
}

/// Per-trace header. Only the commonly used fields are kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraceHeader {
    pub sequence_in_line: i32,
    pub field_record: i32,
    pub trace_in_record: i32,
    pub cdp: i32,
    pub trace_id: i16,
    pub offset: i32,
    pub coordinate_scalar: i16,
    pub source_x: i32,
    pub source_y: i32,
    pub group_x: i32,
    pub group_y: i32,
    /// Delay recording time in milliseconds.
    pub delay_ms: i16,
    pub number_of_samples: u16,
    pub sample_interval_us: u16,
}

impl TraceHeader {
    pub fn parse(buf: &[u8], endian: Endian) -> Self {
        Self {
            sequence_in_line: endian.i32(&buf[TH_SEQUENCE_IN_LINE..]),
            field_record: endian.i32(&buf[TH_FIELD_RECORD..]),
            trace_in_record: endian.i32(&buf[TH_TRACE_IN_RECORD..]),
            cdp: endian.i32(&buf[TH_CDP..]),
            trace_id: endian.i16(&buf[TH_TRACE_ID..]),
            offset: endian.i32(&buf[TH_OFFSET..]),
            coordinate_scalar: endian.i16(&buf[TH_COORD_SCALAR..]),
            source_x: endian.i32(&buf[TH_SOURCE_X..]),
            source_y: endian.i32(&buf[TH_SOURCE_Y..]),
            group_x: endian.i32(&buf[TH_GROUP_X..]),
            group_y: endian.i32(&buf[TH_GROUP_Y..]),
            delay_ms: endian.i16(&buf[TH_DELAY..]),
            number_of_samples: endian.u16(&buf[TH_SAMPLES..]),
            sample_interval_us: endian.u16(&buf[TH_SAMPLE_INTERVAL..]),
        }
    }

    /// Serialize big-endian.
    pub fn to_bytes(&self) -> [u8; TRACE_HEADER_LEN] {
        let mut buf = [0_u8; TRACE_HEADER_LEN];
        BigEndian::write_i32(&mut buf[TH_SEQUENCE_IN_LINE..], self.sequence_in_line);
        BigEndian::write_i32(&mut buf[TH_FIELD_RECORD..], self.field_record);
        BigEndian::write_i32(&mut buf[TH_TRACE_IN_RECORD..], self.trace_in_record);
        BigEndian::write_i32(&mut buf[TH_CDP..], self.cdp);
        BigEndian::write_i16(&mut buf[TH_TRACE_ID..], self.trace_id);
        BigEndian::write_i32(&mut buf[TH_OFFSET..], self.offset);
        BigEndian::write_i16(&mut buf[TH_COORD_SCALAR..], self.coordinate_scalar);
        BigEndian::write_i32(&mut buf[TH_SOURCE_X..], self.source_x);
        BigEndian::write_i32(&mut buf[TH_SOURCE_Y..], self.source_y);
        BigEndian::write_i32(&mut buf[TH_GROUP_X..], self.group_x);
        BigEndian::write_i32(&mut buf[TH_GROUP_Y..], self.group_y);
        BigEndian::write_i16(&mut buf[TH_DELAY..], self.delay_ms);
        BigEndian::write_u16(&mut buf[TH_SAMPLES..], self.number_of_samples);
        BigEndian::write_u16(&mut buf[TH_SAMPLE_INTERVAL..], self.sample_interval_us);
        buf
    }
}

/// Build a 3200 byte ASCII textual header from free text, one 80 column
/// card per line, padded with spaces.
pub fn textual_header(text: &str) -> [u8; TEXTUAL_HEADER_LEN] {
    let mut buf = [b' '; TEXTUAL_HEADER_LEN];
    for (card, line) in buf.chunks_exact_mut(80).zip(text.lines()) {
        for (dst, byte) in card.iter_mut().zip(line.bytes().filter(u8::is_ascii)) {
            *dst = byte;
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_little_endian_format_code() {
        let mut buf = [0_u8; BINARY_HEADER_LEN];
        buf[BH_FORMAT_CODE] = 5;
        assert_eq!(BinaryHeader::detect_endian(&buf), Some(Endian::Little));
        buf[BH_FORMAT_CODE] = 0;
        buf[BH_FORMAT_CODE + 1] = 1;
        assert_eq!(BinaryHeader::detect_endian(&buf), Some(Endian::Big));
        buf[BH_FORMAT_CODE + 1] = 9;
        assert_eq!(BinaryHeader::detect_endian(&buf), None);
    }

    #[test]
    fn trace_header_sample_count_position() {
        let header = TraceHeader {
            number_of_samples: 1500,
            sample_interval_us: 4000,
            ..Default::default()
        };
        let bytes = header.to_bytes();
        // Bytes 115-116 (1-based) carry the sample count.
        assert_eq!(&bytes[114..116], &1500_u16.to_be_bytes());
        assert_eq!(TraceHeader::parse(&bytes, Endian::Big), header);
    }

    #[test]
    fn textual_header_cards() {
        let text = textual_header("C 1 CLIENT\nC 2 LINE");
        assert_eq!(&text[0..10], b"C 1 CLIENT");
        assert_eq!(&text[80..88], b"C 2 LINE");
        assert_eq!(text[3199], b' ');
    }
}
