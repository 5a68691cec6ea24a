//! Scalar parameter types and the value codec
//!
//! Each cell stores an 8-byte payload. Only the leading bytes matching the
//! type's width are meaningful; the rest are zero. Multi-byte values are
//! little-endian so ROM images move between architectures unchanged.

use super::error::ParamError;

/// Size of the payload field in a cell
pub const DATA_LEN: usize = 8;

/// Scalar type tag stored in each cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ParamType {
    U8 = 1,
    I8 = 2,
    U16 = 3,
    I16 = 4,
    U32 = 5,
    I32 = 6,
    U64 = 7,
    I64 = 8,
    F32 = 9,
    F64 = 10,
}

impl ParamType {
    /// On-disk type tag
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a type tag, `None` if unrecognized
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ParamType::U8),
            2 => Some(ParamType::I8),
            3 => Some(ParamType::U16),
            4 => Some(ParamType::I16),
            5 => Some(ParamType::U32),
            6 => Some(ParamType::I32),
            7 => Some(ParamType::U64),
            8 => Some(ParamType::I64),
            9 => Some(ParamType::F32),
            10 => Some(ParamType::F64),
            _ => None,
        }
    }

    /// Number of meaningful payload bytes
    pub const fn width(self) -> usize {
        match self {
            ParamType::U8 | ParamType::I8 => 1,
            ParamType::U16 | ParamType::I16 => 2,
            ParamType::U32 | ParamType::I32 | ParamType::F32 => 4,
            ParamType::U64 | ParamType::I64 | ParamType::F64 => 8,
        }
    }
}

/// Typed parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
}

fn take<const W: usize>(data: &[u8; DATA_LEN]) -> [u8; W] {
    let mut out = [0u8; W];
    out.copy_from_slice(&data[..W]);
    out
}

impl ParamValue {
    /// Get parameter type
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::U8(_) => ParamType::U8,
            ParamValue::I8(_) => ParamType::I8,
            ParamValue::U16(_) => ParamType::U16,
            ParamValue::I16(_) => ParamType::I16,
            ParamValue::U32(_) => ParamType::U32,
            ParamValue::I32(_) => ParamType::I32,
            ParamValue::U64(_) => ParamType::U64,
            ParamValue::I64(_) => ParamType::I64,
            ParamValue::F32(_) => ParamType::F32,
            ParamValue::F64(_) => ParamType::F64,
        }
    }

    /// Encode into a cell payload (little-endian, zero padded)
    pub fn to_bytes(&self) -> [u8; DATA_LEN] {
        let mut buf = [0u8; DATA_LEN];
        match *self {
            ParamValue::U8(v) => buf[..1].copy_from_slice(&v.to_le_bytes()),
            ParamValue::I8(v) => buf[..1].copy_from_slice(&v.to_le_bytes()),
            ParamValue::U16(v) => buf[..2].copy_from_slice(&v.to_le_bytes()),
            ParamValue::I16(v) => buf[..2].copy_from_slice(&v.to_le_bytes()),
            ParamValue::U32(v) => buf[..4].copy_from_slice(&v.to_le_bytes()),
            ParamValue::I32(v) => buf[..4].copy_from_slice(&v.to_le_bytes()),
            ParamValue::U64(v) => buf.copy_from_slice(&v.to_le_bytes()),
            ParamValue::I64(v) => buf.copy_from_slice(&v.to_le_bytes()),
            ParamValue::F32(v) => buf[..4].copy_from_slice(&v.to_bits().to_le_bytes()),
            ParamValue::F64(v) => buf.copy_from_slice(&v.to_bits().to_le_bytes()),
        }
        buf
    }

    /// Decode a cell payload of a known type
    pub fn from_bytes(param_type: ParamType, data: &[u8; DATA_LEN]) -> Self {
        match param_type {
            ParamType::U8 => ParamValue::U8(data[0]),
            ParamType::I8 => ParamValue::I8(i8::from_le_bytes(take(data))),
            ParamType::U16 => ParamValue::U16(u16::from_le_bytes(take(data))),
            ParamType::I16 => ParamValue::I16(i16::from_le_bytes(take(data))),
            ParamType::U32 => ParamValue::U32(u32::from_le_bytes(take(data))),
            ParamType::I32 => ParamValue::I32(i32::from_le_bytes(take(data))),
            ParamType::U64 => ParamValue::U64(u64::from_le_bytes(take(data))),
            ParamType::I64 => ParamValue::I64(i64::from_le_bytes(take(data))),
            ParamType::F32 => ParamValue::F32(f32::from_bits(u32::from_le_bytes(take(data)))),
            ParamType::F64 => ParamValue::F64(f64::from_bits(u64::from_le_bytes(take(data)))),
        }
    }

    /// Decode a cell payload by raw type tag
    pub fn decode(tag: u8, data: &[u8; DATA_LEN]) -> Result<Self, ParamError> {
        let param_type = ParamType::from_tag(tag).ok_or(ParamError::TypeMismatch { tag })?;
        Ok(Self::from_bytes(param_type, data))
    }

    pub fn as_u8(&self) -> Option<u8> {
        match *self {
            ParamValue::U8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match *self {
            ParamValue::I8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match *self {
            ParamValue::U16(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match *self {
            ParamValue::I16(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            ParamValue::U32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            ParamValue::I32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            ParamValue::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ParamValue::I64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            ParamValue::F32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ParamValue::F64(v) => Some(v),
            _ => None,
        }
    }
}

impl From<u8> for ParamValue {
    fn from(v: u8) -> Self {
        ParamValue::U8(v)
    }
}

impl From<i8> for ParamValue {
    fn from(v: i8) -> Self {
        ParamValue::I8(v)
    }
}

impl From<u16> for ParamValue {
    fn from(v: u16) -> Self {
        ParamValue::U16(v)
    }
}

impl From<i16> for ParamValue {
    fn from(v: i16) -> Self {
        ParamValue::I16(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::U32(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::I32(v)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::U64(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::I64(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::F32(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::F64(v)
    }
}

/// Copy the bytes of a raw value into a cell payload
///
/// Copies exactly the width selected by `tag` from `src` and zeroes the rest
/// of `dst`. Returns the number of bytes copied.
///
/// # Errors
///
/// `TypeMismatch` if `tag` is unrecognized or `src` is shorter than the
/// type's width. `dst` is left untouched in that case.
pub fn load_value(dst: &mut [u8; DATA_LEN], src: &[u8], tag: u8) -> Result<usize, ParamError> {
    let width = ParamType::from_tag(tag)
        .ok_or(ParamError::TypeMismatch { tag })?
        .width();
    if src.len() < width {
        return Err(ParamError::TypeMismatch { tag });
    }

    dst[..width].copy_from_slice(&src[..width]);
    dst[width..].fill(0);
    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_table() {
        let expected = [
            (1, ParamType::U8, 1),
            (2, ParamType::I8, 1),
            (3, ParamType::U16, 2),
            (4, ParamType::I16, 2),
            (5, ParamType::U32, 4),
            (6, ParamType::I32, 4),
            (7, ParamType::U64, 8),
            (8, ParamType::I64, 8),
            (9, ParamType::F32, 4),
            (10, ParamType::F64, 8),
        ];

        for (tag, param_type, width) in expected {
            assert_eq!(ParamType::from_tag(tag), Some(param_type));
            assert_eq!(param_type.tag(), tag);
            assert_eq!(param_type.width(), width);
        }
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(ParamType::from_tag(0), None);
        assert_eq!(ParamType::from_tag(11), None);
        assert_eq!(ParamType::from_tag(0xFF), None);
    }

    #[test]
    fn test_encoding_is_little_endian_and_padded() {
        assert_eq!(
            ParamValue::U16(0x1234).to_bytes(),
            [0x34, 0x12, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            ParamValue::I32(-2).to_bytes(),
            [0xFE, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]
        );
        assert_eq!(
            ParamValue::F64(1024.0).to_bytes(),
            1024.0f64.to_bits().to_le_bytes()
        );
    }

    #[test]
    fn test_decode_known_payloads() {
        let data = [0x00, 0x00, 0x80, 0x3F, 0, 0, 0, 0];
        assert_eq!(
            ParamValue::from_bytes(ParamType::F32, &data),
            ParamValue::F32(1.0)
        );

        let data = [0xFF, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(ParamValue::decode(2, &data), Ok(ParamValue::I8(-1)));
        assert_eq!(ParamValue::decode(1, &data), Ok(ParamValue::U8(255)));
        assert_eq!(
            ParamValue::decode(42, &data),
            Err(ParamError::TypeMismatch { tag: 42 })
        );
    }

    #[test]
    fn test_extremes_survive_codec() {
        let values = [
            ParamValue::I8(i8::MIN),
            ParamValue::U16(u16::MAX),
            ParamValue::I16(i16::MIN),
            ParamValue::U64(u64::MAX),
            ParamValue::I64(i64::MIN),
            ParamValue::F32(f32::MIN_POSITIVE),
            ParamValue::F64(-0.0),
        ];
        for value in values {
            let decoded = ParamValue::from_bytes(value.param_type(), &value.to_bytes());
            assert_eq!(decoded.to_bytes(), value.to_bytes());
        }
    }

    #[test]
    fn test_load_value_copies_width_only() {
        let mut dst = [0xEE; DATA_LEN];
        let src = [1, 2, 3, 4, 5, 6, 7, 8];

        assert_eq!(load_value(&mut dst, &src, ParamType::U16.tag()), Ok(2));
        assert_eq!(dst, [1, 2, 0, 0, 0, 0, 0, 0]);

        assert_eq!(load_value(&mut dst, &src, ParamType::F64.tag()), Ok(8));
        assert_eq!(dst, src);
    }

    #[test]
    fn test_load_value_rejects_bad_input() {
        let mut dst = [0xEE; DATA_LEN];

        assert_eq!(
            load_value(&mut dst, &[1, 2, 3, 4], 0),
            Err(ParamError::TypeMismatch { tag: 0 })
        );
        assert_eq!(
            load_value(&mut dst, &[1, 2, 3], ParamType::U32.tag()),
            Err(ParamError::TypeMismatch { tag: 5 })
        );
        assert_eq!(dst, [0xEE; DATA_LEN]);
    }

    #[test]
    fn test_accessors_are_strict() {
        let value = ParamValue::from(42u32);
        assert_eq!(value.as_u32(), Some(42));
        assert_eq!(value.as_i32(), None);
        assert_eq!(value.as_f32(), None);

        assert_eq!(ParamValue::from(2.5f64).as_f64(), Some(2.5));
        assert_eq!(ParamValue::from(-3i16).as_i16(), Some(-3));
    }
}
