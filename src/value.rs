//! IFD value types
//!
//! Every IFD entry carries a typed array. TIFF 6.0 defines twelve element
//! types and TIFF/EP adds a thirteenth (`IFD`) for pointers to other
//! directories. [`IfdValue`] is a closed sum over all of them, so encoding,
//! size accounting and coercion are exhaustive matches.
//!
//! Unit sizes:
//!
//! | type | code | bytes |
//! |------|------|-------|
//! | BYTE, ASCII, SBYTE, UNDEFINED | 1, 2, 6, 7 | 1 |
//! | SHORT, SSHORT | 3, 8 | 2 |
//! | LONG, SLONG, FLOAT, IFD | 4, 9, 11, 13 | 4 |
//! | RATIONAL, SRATIONAL, DOUBLE | 5, 10, 12 | 8 |

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::error::{Error, Result};
use std::fmt;

/// On-disk element type of an IFD entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum IfdValueType {
    /// Unsigned 8-bit integer
    Byte = 1,
    /// NUL-terminated 8-bit text
    Ascii = 2,
    /// Unsigned 16-bit integer
    Short = 3,
    /// Unsigned 32-bit integer
    Long = 4,
    /// Two unsigned 32-bit integers: numerator, denominator
    Rational = 5,
    /// Signed 8-bit integer
    SByte = 6,
    /// Opaque byte
    Undefined = 7,
    /// Signed 16-bit integer
    SShort = 8,
    /// Signed 32-bit integer
    SLong = 9,
    /// Two signed 32-bit integers: numerator, denominator
    SRational = 10,
    /// IEEE 754 single precision float
    Single = 11,
    /// IEEE 754 double precision float
    Double = 12,
    /// 32-bit offset of another IFD
    Ifd = 13,
}

impl IfdValueType {
    /// Map an on-disk type code, `None` for codes outside 1..=13
    pub const fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => Self::Byte,
            2 => Self::Ascii,
            3 => Self::Short,
            4 => Self::Long,
            5 => Self::Rational,
            6 => Self::SByte,
            7 => Self::Undefined,
            8 => Self::SShort,
            9 => Self::SLong,
            10 => Self::SRational,
            11 => Self::Single,
            12 => Self::Double,
            13 => Self::Ifd,
            _ => return None,
        })
    }

    /// On-disk type code
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Size of one element in bytes
    pub const fn unit_size(self) -> usize {
        match self {
            Self::Byte | Self::Ascii | Self::SByte | Self::Undefined => 1,
            Self::Short | Self::SShort => 2,
            Self::Long | Self::SLong | Self::Single | Self::Ifd => 4,
            Self::Rational | Self::SRational | Self::Double => 8,
        }
    }

    /// Lower-case type name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Ascii => "ascii",
            Self::Short => "short",
            Self::Long => "long",
            Self::Rational => "rational",
            Self::SByte => "sbyte",
            Self::Undefined => "undefined",
            Self::SShort => "sshort",
            Self::SLong => "slong",
            Self::SRational => "srational",
            Self::Single => "single",
            Self::Double => "double",
            Self::Ifd => "ifd",
        }
    }
}

impl fmt::Display for IfdValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fraction as stored by RATIONAL and SRATIONAL entries
///
/// The fields are wide enough for both the unsigned and the signed encoding.
/// Writing fails with [`Error::ValueOutOfRange`] when either half does not fit
/// the 32-bit field of the value's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub numerator: i64,
    pub denominator: i64,
}

impl Rational {
    /// Create a fraction
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Value as a float, 0.0 for a zero denominator
    pub fn to_f64(self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            self.numerator as f64 / self.denominator as f64
        }
    }

    /// Value truncated toward zero, 0 for a zero denominator
    pub fn to_i64(self) -> i64 {
        if self.denominator == 0 {
            0
        } else {
            self.numerator / self.denominator
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl From<(u32, u32)> for Rational {
    fn from((numerator, denominator): (u32, u32)) -> Self {
        Self::new(numerator as i64, denominator as i64)
    }
}

impl From<(i32, i32)> for Rational {
    fn from((numerator, denominator): (i32, i32)) -> Self {
        Self::new(numerator as i64, denominator as i64)
    }
}

impl From<(i64, i64)> for Rational {
    fn from((numerator, denominator): (i64, i64)) -> Self {
        Self::new(numerator, denominator)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Typed payload of an IFD entry
///
/// ASCII text is kept without its terminator; the NUL is added on write and
/// counted by [`IfdValue::count`].
#[derive(Debug, Clone, PartialEq)]
pub enum IfdValue {
    Byte(Vec<u8>),
    Ascii(Vec<u8>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<Rational>),
    Single(Vec<f32>),
    Double(Vec<f64>),
    /// Offset of another directory, always exactly one element
    Ifd(u32),
}

impl IfdValue {
    /// ASCII value from text, one byte per character
    ///
    /// Characters outside 7-bit ASCII are stored as `?`.
    pub fn ascii(text: &str) -> Self {
        Self::Ascii(
            text.chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        )
    }

    /// Single RATIONAL
    pub fn rational(numerator: u32, denominator: u32) -> Self {
        Self::Rational(vec![Rational::from((numerator, denominator))])
    }

    /// Single SRATIONAL
    pub fn srational(numerator: i32, denominator: i32) -> Self {
        Self::SRational(vec![Rational::from((numerator, denominator))])
    }

    /// Element type
    pub fn kind(&self) -> IfdValueType {
        match self {
            Self::Byte(_) => IfdValueType::Byte,
            Self::Ascii(_) => IfdValueType::Ascii,
            Self::Short(_) => IfdValueType::Short,
            Self::Long(_) => IfdValueType::Long,
            Self::Rational(_) => IfdValueType::Rational,
            Self::SByte(_) => IfdValueType::SByte,
            Self::Undefined(_) => IfdValueType::Undefined,
            Self::SShort(_) => IfdValueType::SShort,
            Self::SLong(_) => IfdValueType::SLong,
            Self::SRational(_) => IfdValueType::SRational,
            Self::Single(_) => IfdValueType::Single,
            Self::Double(_) => IfdValueType::Double,
            Self::Ifd(_) => IfdValueType::Ifd,
        }
    }

    /// Element count as written to the entry's count field
    pub fn count(&self) -> usize {
        match self {
            Self::Byte(v) | Self::Undefined(v) => v.len(),
            Self::Ascii(v) => v.len() + 1,
            Self::Short(v) => v.len(),
            Self::Long(v) => v.len(),
            Self::Rational(v) | Self::SRational(v) => v.len(),
            Self::SByte(v) => v.len(),
            Self::SShort(v) => v.len(),
            Self::SLong(v) => v.len(),
            Self::Single(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Ifd(_) => 1,
        }
    }

    /// Encoded size in bytes
    pub fn byte_size(&self) -> usize {
        self.kind().unit_size() * self.count()
    }

    /// Whether the value fits the 4-byte slot of its entry
    pub fn is_inline(&self) -> bool {
        self.byte_size() <= 4
    }

    /// Decode `count` elements of `kind` at the cursor position
    ///
    /// The whole payload is bounds-checked before anything is allocated.
    pub fn read(kind: IfdValueType, count: u32, input: &mut InputBuffer) -> Result<Self> {
        let count = count as usize;
        let size = kind
            .unit_size()
            .checked_mul(count)
            .filter(|&size| input.has_range(input.offset(), size))
            .ok_or(Error::UnexpectedEof {
                offset: input.offset(),
                needed: kind.unit_size().saturating_mul(count),
            })?;

        Ok(match kind {
            IfdValueType::Byte => Self::Byte(input.read_bytes(size)?.to_vec()),
            IfdValueType::Undefined => Self::Undefined(input.read_bytes(size)?.to_vec()),
            IfdValueType::Ascii => {
                let bytes = input.read_bytes(size)?;
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |last| last + 1);
                Self::Ascii(bytes[..end].to_vec())
            }
            IfdValueType::SByte => Self::SByte(
                input
                    .read_bytes(size)?
                    .iter()
                    .map(|&b| b as i8)
                    .collect(),
            ),
            IfdValueType::Short => Self::Short(read_array(count, || input.read_u16())?),
            IfdValueType::SShort => Self::SShort(read_array(count, || input.read_i16())?),
            IfdValueType::Long => Self::Long(read_array(count, || input.read_u32())?),
            IfdValueType::SLong => Self::SLong(read_array(count, || input.read_i32())?),
            IfdValueType::Single => Self::Single(read_array(count, || input.read_f32())?),
            IfdValueType::Double => Self::Double(read_array(count, || input.read_f64())?),
            IfdValueType::Rational => Self::Rational(read_array(count, || {
                let numerator = input.read_u32()?;
                let denominator = input.read_u32()?;
                Ok(Rational::new(numerator as i64, denominator as i64))
            })?),
            IfdValueType::SRational => Self::SRational(read_array(count, || {
                let numerator = input.read_i32()?;
                let denominator = input.read_i32()?;
                Ok(Rational::new(numerator as i64, denominator as i64))
            })?),
            IfdValueType::Ifd => {
                if count != 1 {
                    return Err(Error::InvalidFormat(format!(
                        "IFD pointer with {} elements",
                        count
                    )));
                }
                Self::Ifd(input.read_u32()?)
            }
        })
    }

    /// Encode the payload in the buffer's byte order
    pub fn write(&self, out: &mut OutputBuffer) -> Result<()> {
        match self {
            Self::Byte(v) | Self::Undefined(v) => out.write_bytes(v)?,
            Self::Ascii(v) => {
                out.write_bytes(v)?;
                out.write_u8(0)?;
            }
            Self::SByte(v) => v.iter().try_for_each(|&x| out.write_i8(x))?,
            Self::Short(v) => v.iter().try_for_each(|&x| out.write_u16(x))?,
            Self::SShort(v) => v.iter().try_for_each(|&x| out.write_i16(x))?,
            Self::Long(v) => v.iter().try_for_each(|&x| out.write_u32(x))?,
            Self::SLong(v) => v.iter().try_for_each(|&x| out.write_i32(x))?,
            Self::Single(v) => v.iter().try_for_each(|&x| out.write_f32(x))?,
            Self::Double(v) => v.iter().try_for_each(|&x| out.write_f64(x))?,
            Self::Rational(v) => v.iter().try_for_each(|r| {
                let (numerator, denominator) = unsigned_halves(r)?;
                out.write_u32(numerator)?;
                out.write_u32(denominator)
            })?,
            Self::SRational(v) => v.iter().try_for_each(|r| {
                let (numerator, denominator) = signed_halves(r)?;
                out.write_i32(numerator)?;
                out.write_i32(denominator)
            })?,
            Self::Ifd(offset) => out.write_u32(*offset)?,
        }
        Ok(())
    }

    /// Check that every element fits its on-disk field
    ///
    /// Only rational kinds can hold out-of-range elements.
    pub fn check_range(&self) -> Result<()> {
        match self {
            Self::Rational(v) => v.iter().try_for_each(|r| unsigned_halves(r).map(drop)),
            Self::SRational(v) => v.iter().try_for_each(|r| signed_halves(r).map(drop)),
            _ => Ok(()),
        }
    }

    /// Element `index` as an integer
    ///
    /// Returns 0 for text/opaque kinds and out-of-range indices.
    ///
    /// # Panics
    /// If `index` is not 0 on an [`IfdValue::Ifd`].
    pub fn to_int(&self, index: usize) -> i64 {
        match self {
            Self::Byte(v) => v.get(index).map_or(0, |&x| x as i64),
            Self::Short(v) => v.get(index).map_or(0, |&x| x as i64),
            Self::Long(v) => v.get(index).map_or(0, |&x| x as i64),
            Self::SByte(v) => v.get(index).map_or(0, |&x| x as i64),
            Self::SShort(v) => v.get(index).map_or(0, |&x| x as i64),
            Self::SLong(v) => v.get(index).map_or(0, |&x| x as i64),
            Self::Single(v) => v.get(index).map_or(0, |&x| x as i64),
            Self::Double(v) => v.get(index).map_or(0, |&x| x as i64),
            Self::Rational(v) | Self::SRational(v) => v.get(index).map_or(0, |r| r.to_i64()),
            Self::Ifd(offset) => {
                check_ifd_index(index);
                *offset as i64
            }
            Self::Ascii(_) | Self::Undefined(_) => 0,
        }
    }

    /// Element `index` as a float
    ///
    /// Same defaults and panics as [`IfdValue::to_int`].
    pub fn to_double(&self, index: usize) -> f64 {
        match self {
            Self::Single(v) => v.get(index).map_or(0.0, |&x| x as f64),
            Self::Double(v) => v.get(index).copied().unwrap_or(0.0),
            Self::Rational(v) | Self::SRational(v) => v.get(index).map_or(0.0, |r| r.to_f64()),
            _ => self.to_int(index) as f64,
        }
    }

    /// Element `index` as a fraction
    ///
    /// Integers become `n/1`; text, opaque and float kinds give `0/1`.
    pub fn to_rational(&self, index: usize) -> Rational {
        match self {
            Self::Rational(v) | Self::SRational(v) => v.get(index).copied().unwrap_or_default(),
            Self::Ascii(_) | Self::Undefined(_) | Self::Single(_) | Self::Double(_) => {
                Rational::default()
            }
            _ => Rational::new(self.to_int(index), 1),
        }
    }

    /// All elements as integers, empty for text and opaque kinds
    pub fn to_ints(&self) -> Vec<i64> {
        match self {
            Self::Ascii(_) | Self::Undefined(_) => Vec::new(),
            _ => (0..self.count()).map(|i| self.to_int(i)).collect(),
        }
    }

    /// Text content of ASCII and UNDEFINED values, empty otherwise
    pub fn to_text(&self) -> String {
        match self {
            Self::Ascii(v) | Self::Undefined(v) => String::from_utf8_lossy(v)
                .trim_end_matches('\0')
                .to_string(),
            _ => String::new(),
        }
    }

    /// Raw bytes of BYTE, ASCII and UNDEFINED values, empty otherwise
    pub fn to_data(&self) -> &[u8] {
        match self {
            Self::Byte(v) | Self::Ascii(v) | Self::Undefined(v) => v,
            _ => &[],
        }
    }
}

fn check_ifd_index(index: usize) {
    assert!(
        index == 0,
        "IFD pointer value has a single element, index {} requested",
        index
    );
}

fn read_array<T>(count: usize, mut next: impl FnMut() -> Result<T>) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(next()?);
    }
    Ok(values)
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    if let [single] = items {
        return write!(f, "{}", single);
    }
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

impl fmt::Display for IfdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascii(v) => write!(f, "{}", String::from_utf8_lossy(v)),
            Self::Undefined(v) => {
                if !v.is_empty() && v.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
                    write!(f, "{}", String::from_utf8_lossy(v))
                } else {
                    write!(f, "<{} bytes>", v.len())
                }
            }
            Self::Byte(v) => write_list(f, v),
            Self::Short(v) => write_list(f, v),
            Self::Long(v) => write_list(f, v),
            Self::SByte(v) => write_list(f, v),
            Self::SShort(v) => write_list(f, v),
            Self::SLong(v) => write_list(f, v),
            Self::Single(v) => write_list(f, v),
            Self::Double(v) => write_list(f, v),
            Self::Rational(v) | Self::SRational(v) => write_list(f, v),
            Self::Ifd(offset) => write!(f, "@{}", offset),
        }
    }
}

fn unsigned_halves(r: &Rational) -> Result<(u32, u32)> {
    match (u32::try_from(r.numerator), u32::try_from(r.denominator)) {
        (Ok(numerator), Ok(denominator)) => Ok((numerator, denominator)),
        _ => Err(out_of_range(IfdValueType::Rational, r)),
    }
}

fn signed_halves(r: &Rational) -> Result<(i32, i32)> {
    match (i32::try_from(r.numerator), i32::try_from(r.denominator)) {
        (Ok(numerator), Ok(denominator)) => Ok((numerator, denominator)),
        _ => Err(out_of_range(IfdValueType::SRational, r)),
    }
}

fn out_of_range(kind: IfdValueType, r: &Rational) -> Error {
    Error::ValueOutOfRange {
        kind: kind.name(),
        value: r.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Endian;

    fn encode(value: &IfdValue, big_endian: bool) -> Vec<u8> {
        let mut out = OutputBuffer::new();
        out.set_big_endian(big_endian);
        value.write(&mut out).unwrap();
        out.into_bytes()
    }

    #[test]
    fn test_type_codes() {
        for code in 1..=13 {
            let kind = IfdValueType::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(IfdValueType::from_code(0), None);
        assert_eq!(IfdValueType::from_code(14), None);
        assert_eq!(IfdValueType::Rational.unit_size(), 8);
        assert_eq!(IfdValueType::Ifd.unit_size(), 4);
    }

    #[test]
    fn test_byte_size_matches_encoding() {
        let values = [
            IfdValue::Byte(vec![1, 2, 3]),
            IfdValue::ascii("Canon"),
            IfdValue::Short(vec![1, 2, 3]),
            IfdValue::Long(vec![7]),
            IfdValue::rational(72, 1),
            IfdValue::SByte(vec![-1]),
            IfdValue::Undefined(b"0231".to_vec()),
            IfdValue::SShort(vec![-5, 5]),
            IfdValue::SLong(vec![-9, 9, 0]),
            IfdValue::srational(-1, 3),
            IfdValue::Single(vec![1.5]),
            IfdValue::Double(vec![2.25, -1.0]),
            IfdValue::Ifd(1234),
        ];
        for value in &values {
            assert_eq!(encode(value, true).len(), value.byte_size(), "{:?}", value);
        }
    }

    #[test]
    fn test_ascii_terminator() {
        let value = IfdValue::ascii("Nikon");
        let bytes = encode(&value, true);
        assert_eq!(bytes.len(), "Nikon".chars().count() + 1);
        assert_eq!(bytes.last(), Some(&0));
        assert_eq!(value.count(), 6);

        let empty = IfdValue::ascii("");
        assert_eq!(encode(&empty, false), vec![0]);
    }

    #[test]
    fn test_ascii_non_ascii_text() {
        for text in ["café", "東京", "Ångström 🙂", "plain"] {
            let value = IfdValue::ascii(text);
            let bytes = encode(&value, true);
            assert_eq!(bytes.len(), text.chars().count() + 1, "{}", text);
            assert_eq!(value.byte_size(), bytes.len());
            assert_eq!(bytes.last(), Some(&0));
            assert!(bytes.iter().all(u8::is_ascii));
        }
        assert_eq!(IfdValue::ascii("café").to_text(), "caf?");
    }

    #[test]
    fn test_ascii_read_strips_padding() {
        let data = b"abc\0\0";
        let mut input = InputBuffer::new(data);
        let value = IfdValue::read(IfdValueType::Ascii, 5, &mut input).unwrap();
        assert_eq!(value, IfdValue::ascii("abc"));
        assert_eq!(value.to_text(), "abc");
        assert_eq!(input.offset(), 5);
    }

    #[test]
    fn test_rational_numerator_first() {
        let value = IfdValue::rational(300, 7);
        assert_eq!(encode(&value, true), vec![0, 0, 1, 44, 0, 0, 0, 7]);
        assert_eq!(encode(&value, false), vec![44, 1, 0, 0, 7, 0, 0, 0]);

        let bytes = encode(&value, false);
        let mut input = InputBuffer::new(&bytes);
        let decoded = IfdValue::read(IfdValueType::Rational, 1, &mut input).unwrap();
        assert_eq!(decoded.to_rational(0), Rational::new(300, 7));
    }

    #[test]
    fn test_rational_range_checked_on_write() {
        let negative = IfdValue::Rational(vec![Rational::new(-1, 2)]);
        assert!(matches!(
            negative.check_range(),
            Err(Error::ValueOutOfRange { kind: "rational", .. })
        ));
        let mut out = OutputBuffer::new();
        assert!(matches!(
            negative.write(&mut out),
            Err(Error::ValueOutOfRange { .. })
        ));

        let wide = IfdValue::SRational(vec![
            Rational::new(1, 2),
            Rational::new(i64::from(i32::MAX) + 1, 1),
        ]);
        assert!(matches!(
            wide.check_range(),
            Err(Error::ValueOutOfRange { kind: "srational", value }) if value == "2147483648/1"
        ));

        let edge = IfdValue::Rational(vec![Rational::new(u32::MAX as i64, 1)]);
        edge.check_range().unwrap();
        assert_eq!(encode(&edge, true), vec![0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 1]);
    }

    #[test]
    fn test_signed_round_trip() {
        let value = IfdValue::SRational(vec![Rational::new(-7, 2), Rational::new(3, -4)]);
        let bytes = encode(&value, true);
        let mut input = InputBuffer::with_endian(&bytes, true);
        let decoded = IfdValue::read(IfdValueType::SRational, 2, &mut input).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(decoded.to_double(0), -3.5);
    }

    #[test]
    fn test_read_rejects_truncated_payload() {
        let data = [0u8; 6];
        let mut input = InputBuffer::new(&data);
        assert!(IfdValue::read(IfdValueType::Long, 2, &mut input).is_err());
        assert!(IfdValue::read(IfdValueType::Double, u32::MAX, &mut input).is_err());
        assert_eq!(input.offset(), 0);
    }

    #[test]
    fn test_ifd_pointer_count() {
        let data = [0u8; 8];
        let mut input = InputBuffer::new(&data);
        assert!(IfdValue::read(IfdValueType::Ifd, 2, &mut input).is_err());
        let value = IfdValue::read(IfdValueType::Ifd, 1, &mut input).unwrap();
        assert_eq!(value, IfdValue::Ifd(0));
    }

    #[test]
    #[should_panic(expected = "single element")]
    fn test_ifd_index_out_of_range_panics() {
        IfdValue::Ifd(8).to_int(1);
    }

    #[test]
    fn test_coercion_defaults() {
        let text = IfdValue::ascii("hello");
        assert_eq!(text.to_int(0), 0);
        assert_eq!(text.to_rational(0), Rational::new(0, 1));
        assert!(text.to_ints().is_empty());

        let shorts = IfdValue::Short(vec![8, 8, 8]);
        assert_eq!(shorts.to_int(2), 8);
        assert_eq!(shorts.to_int(3), 0);
        assert_eq!(shorts.to_rational(0), Rational::new(8, 1));
        assert_eq!(shorts.to_text(), "");
        assert!(shorts.to_data().is_empty());
        assert_eq!(shorts.to_ints(), vec![8, 8, 8]);

        let zero_den = IfdValue::rational(5, 0);
        assert_eq!(zero_den.to_double(0), 0.0);
        assert_eq!(zero_den.to_int(0), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(IfdValue::Short(vec![100]).to_string(), "100");
        assert_eq!(IfdValue::Short(vec![8, 8, 8]).to_string(), "[8, 8, 8]");
        assert_eq!(IfdValue::rational(72, 1).to_string(), "72/1");
        assert_eq!(IfdValue::ascii("Canon").to_string(), "Canon");
        assert_eq!(IfdValue::Undefined(b"0231".to_vec()).to_string(), "0231");
        assert_eq!(IfdValue::Undefined(vec![0, 1, 2]).to_string(), "<3 bytes>");
    }
}
