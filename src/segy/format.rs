use byteorder::{BigEndian, ByteOrder, LittleEndian};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("unsupported sample format code {0}")]
    UnsupportedFormat(i16),
}

/// Byte order of the header words and samples in a file.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

impl Endian {
    pub fn i16(self, buf: &[u8]) -> i16 {
        match self {
            Endian::Big => BigEndian::read_i16(buf),
            Endian::Little => LittleEndian::read_i16(buf),
        }
    }

    pub fn u16(self, buf: &[u8]) -> u16 {
        match self {
            Endian::Big => BigEndian::read_u16(buf),
            Endian::Little => LittleEndian::read_u16(buf),
        }
    }

    pub fn i32(self, buf: &[u8]) -> i32 {
        match self {
            Endian::Big => BigEndian::read_i32(buf),
            Endian::Little => LittleEndian::read_i32(buf),
        }
    }

    pub fn u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Big => BigEndian::read_u32(buf),
            Endian::Little => LittleEndian::read_u32(buf),
        }
    }
}

/// Data sample encodings understood by the codec, keyed by the binary
/// header's format code.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SampleFormat {
    IbmFloat,
    Int32,
    Int16,
    IeeeFloat,
    Int8,
}

impl SampleFormat {
    pub const fn code(self) -> i16 {
        match self {
            SampleFormat::IbmFloat => 1,
            SampleFormat::Int32 => 2,
            SampleFormat::Int16 => 3,
            SampleFormat::IeeeFloat => 5,
            SampleFormat::Int8 => 8,
        }
    }

    /// Bytes occupied by one sample.
    pub const fn width(self) -> usize {
        match self {
            SampleFormat::IbmFloat | SampleFormat::Int32 | SampleFormat::IeeeFloat => 4,
            SampleFormat::Int16 => 2,
            SampleFormat::Int8 => 1,
        }
    }

    /// Decode `out.len()` samples from `raw`, which must hold exactly
    /// `out.len() * width()` bytes.
    pub fn decode_into(self, raw: &[u8], endian: Endian, out: &mut [f32]) {
        let chunks = raw.chunks_exact(self.width());
        for (dst, word) in out.iter_mut().zip(chunks) {
            *dst = match self {
                SampleFormat::IbmFloat => ibm_to_f32(endian.u32(word)),
                SampleFormat::Int32 => endian.i32(word) as f32,
                SampleFormat::Int16 => endian.i16(word) as f32,
                SampleFormat::IeeeFloat => f32::from_bits(endian.u32(word)),
                SampleFormat::Int8 => word[0] as i8 as f32,
            };
        }
    }

    /// Encode samples big-endian, appending to `out`.
    pub fn encode_into(self, samples: &[f32], out: &mut Vec<u8>) {
        let mut word = [0_u8; 4];
        for &v in samples {
            match self {
                SampleFormat::IbmFloat => BigEndian::write_u32(&mut word, f32_to_ibm(v)),
                SampleFormat::Int32 => BigEndian::write_i32(&mut word, v.round() as i32),
                SampleFormat::IeeeFloat => BigEndian::write_u32(&mut word, v.to_bits()),
                SampleFormat::Int16 => {
                    let mut half = [0_u8; 2];
                    BigEndian::write_i16(&mut half, v.round() as i16);
                    out.extend_from_slice(&half);
                    continue;
                }
                SampleFormat::Int8 => {
                    out.push(v.round() as i8 as u8);
                    continue;
                }
            }
            out.extend_from_slice(&word);
        }
    }
}

impl TryFrom<i16> for SampleFormat {
    type Error = FormatError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        let res = match value {
            1 => SampleFormat::IbmFloat,
            2 => SampleFormat::Int32,
            3 => SampleFormat::Int16,
            5 => SampleFormat::IeeeFloat,
            8 => SampleFormat::Int8,
            _ => return Err(FormatError::UnsupportedFormat(value)),
        };
        Ok(res)
    }
}

/// Convert an IBM System/360 single precision word to an IEEE float.
pub fn ibm_to_f32(bits: u32) -> f32 {
    let mantissa = bits & 0x00ff_ffff;
    if mantissa == 0 {
        return 0.0;
    }
    let sign = if bits & 0x8000_0000 == 0 { 1.0 } else { -1.0 };
    let exponent = ((bits >> 24) & 0x7f) as i32 - 64;
    let fraction = mantissa as f64 / 16_777_216.0;
    (sign * fraction * 16_f64.powi(exponent)) as f32
}

/// Convert an IEEE float to an IBM System/360 single precision word.
/// Values outside the IBM range saturate.
pub fn f32_to_ibm(value: f32) -> u32 {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }
    let sign: u32 = if value < 0.0 { 0x8000_0000 } else { 0 };
    let mut fraction = (value as f64).abs();
    let mut exponent: i32 = 64;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0.0625 {
        fraction *= 16.0;
        exponent -= 1;
    }
    let mut mantissa = (fraction * 16_777_216.0).round() as u32;
    if mantissa > 0x00ff_ffff {
        mantissa >>= 4;
        exponent += 1;
    }
    if exponent > 127 {
        return sign | 0x7fff_ffff;
    }
    if exponent < 0 {
        return 0;
    }
    sign | ((exponent as u32) << 24) | mantissa
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ibm_known_value() {
        // -118.625 is the canonical IBM float example.
        assert_eq!(ibm_to_f32(0xC276_A000), -118.625);
        assert_eq!(f32_to_ibm(-118.625), 0xC276_A000);
    }

    #[test]
    fn ibm_zero_and_small() {
        assert_eq!(ibm_to_f32(0), 0.0);
        assert_eq!(f32_to_ibm(0.0), 0);
        let v = 0.001_f32;
        let back = ibm_to_f32(f32_to_ibm(v));
        assert!((back - v).abs() < 1e-9);
    }

    #[test]
    fn format_codes() {
        assert_eq!(SampleFormat::try_from(5).unwrap(), SampleFormat::IeeeFloat);
        assert!(SampleFormat::try_from(4).is_err());
        assert_eq!(SampleFormat::Int16.width(), 2);
    }

    #[test]
    fn decodes_little_endian_ints() {
        let raw = [0x10_u8, 0x00, 0xff, 0xff];
        let mut out = [0.0_f32; 2];
        SampleFormat::Int16.decode_into(&raw, Endian::Little, &mut out);
        assert_eq!(out, [16.0, -1.0]);
    }
}
