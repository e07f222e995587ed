//! Endian-aware byte cursors
//!
//! [`InputBuffer`] walks a borrowed byte slice, [`OutputBuffer`] grows an owned
//! `Vec<u8>`. Both carry a byte-order flag that decides how multi-byte fields
//! are encoded. Readers and writers that need a specific byte order for the
//! duration of one operation take an [`EndianScope`], which puts the caller's
//! setting back when it is dropped, including on early returns.

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;
use std::ops::{Deref, DerefMut};

/// Anything with a switchable byte order
pub trait Endian {
    /// `true` when multi-byte fields are big-endian ("MM")
    fn is_big_endian(&self) -> bool;

    /// Switch the byte order
    fn set_big_endian(&mut self, big_endian: bool);
}

/// Temporary byte-order override
///
/// Dereferences to the wrapped cursor. The previous byte order is restored
/// when the scope is dropped.
pub struct EndianScope<'a, T: Endian> {
    target: &'a mut T,
    saved: bool,
}

impl<'a, T: Endian> EndianScope<'a, T> {
    /// Override the byte order of `target` until the scope ends
    pub fn new(target: &'a mut T, big_endian: bool) -> Self {
        let saved = target.is_big_endian();
        target.set_big_endian(big_endian);
        Self { target, saved }
    }
}

impl<T: Endian> Deref for EndianScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: Endian> DerefMut for EndianScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: Endian> Drop for EndianScope<'_, T> {
    fn drop(&mut self) {
        self.target.set_big_endian(self.saved);
    }
}

/// Read cursor over a byte slice
#[derive(Debug, Clone)]
pub struct InputBuffer<'a> {
    data: &'a [u8],
    offset: usize,
    big_endian: bool,
}

macro_rules! read_number {
    ($name:ident, $ty:ty, $size:expr, $read:ident) => {
        #[doc = concat!("Read a `", stringify!($ty), "` in the active byte order")]
        pub fn $name(&mut self) -> Result<$ty> {
            let bytes = self.take($size)?;
            Ok(if self.big_endian {
                BigEndian::$read(bytes)
            } else {
                LittleEndian::$read(bytes)
            })
        }
    };
}

impl<'a> InputBuffer<'a> {
    /// Create a little-endian cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            big_endian: false,
        }
    }

    /// Create a cursor with an explicit byte order
    pub fn with_endian(data: &'a [u8], big_endian: bool) -> Self {
        Self {
            data,
            offset: 0,
            big_endian,
        }
    }

    /// Total length of the underlying data
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the underlying data is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current position
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// The whole underlying slice
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move to an absolute position
    ///
    /// Seeking past the end is allowed; the next read fails instead.
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Advance by `count` bytes
    pub fn skip(&mut self, count: usize) {
        self.offset = self.offset.saturating_add(count);
    }

    /// Check that `count` bytes are readable at `offset`
    pub fn has_range(&self, offset: usize, count: usize) -> bool {
        offset
            .checked_add(count)
            .is_some_and(|end| end <= self.data.len())
    }

    /// Consume `count` bytes
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.take(count)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a single signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    read_number!(read_u16, u16, 2, read_u16);
    read_number!(read_i16, i16, 2, read_i16);
    read_number!(read_u32, u32, 4, read_u32);
    read_number!(read_i32, i32, 4, read_i32);
    read_number!(read_f32, f32, 4, read_f32);
    read_number!(read_f64, f64, 8, read_f64);

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if !self.has_range(self.offset, count) {
            return Err(Error::UnexpectedEof {
                offset: self.offset,
                needed: count,
            });
        }
        let bytes = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(bytes)
    }
}

impl Endian for InputBuffer<'_> {
    fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    fn set_big_endian(&mut self, big_endian: bool) {
        self.big_endian = big_endian;
    }
}

/// Growable write buffer
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
    big_endian: bool,
}

macro_rules! write_number {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Write a `", stringify!($ty), "` in the active byte order")]
        pub fn $name(&mut self, value: $ty) -> Result<()> {
            if self.big_endian {
                self.bytes.$name::<BigEndian>(value)?;
            } else {
                self.bytes.$name::<LittleEndian>(value)?;
            }
            Ok(())
        }
    };
}

impl OutputBuffer {
    /// Create an empty little-endian buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            big_endian: false,
        }
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Written bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the written bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write a single byte
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.bytes.write_u8(value)?;
        Ok(())
    }

    /// Write a single signed byte
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.bytes.write_i8(value)?;
        Ok(())
    }

    write_number!(write_u16, u16);
    write_number!(write_i16, i16);
    write_number!(write_u32, u32);
    write_number!(write_i32, i32);
    write_number!(write_f32, f32);
    write_number!(write_f64, f64);

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.bytes.write_all(bytes)?;
        Ok(())
    }

    /// Write `count` zero bytes
    pub fn pad(&mut self, count: usize) -> Result<()> {
        self.bytes.resize(self.bytes.len() + count, 0);
        Ok(())
    }
}

impl Endian for OutputBuffer {
    fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    fn set_big_endian(&mut self, big_endian: bool) {
        self.big_endian = big_endian;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order() {
        let mut be = InputBuffer::with_endian(&[0x12, 0x34, 0x12, 0x34, 0x56, 0x78], true);
        assert_eq!(be.read_u16().unwrap(), 0x1234);
        assert_eq!(be.read_u32().unwrap(), 0x12345678);

        let mut le = InputBuffer::new(&[0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(le.read_u16().unwrap(), 0x1234);
        assert_eq!(le.read_u32().unwrap(), 0x12345678);
    }

    #[test]
    fn test_read_past_end() {
        let mut input = InputBuffer::new(&[1, 2, 3]);
        input.seek(2);
        let err = input.read_u16().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEof {
                offset: 2,
                needed: 2
            }
        ));
        // A failed read leaves the position untouched
        assert_eq!(input.offset(), 2);
        assert_eq!(input.read_u8().unwrap(), 3);
    }

    #[test]
    fn test_has_range_overflow() {
        let input = InputBuffer::new(&[0; 8]);
        assert!(input.has_range(4, 4));
        assert!(!input.has_range(5, 4));
        assert!(!input.has_range(usize::MAX, 2));
    }

    #[test]
    fn test_write_endianness() {
        let mut out = OutputBuffer::new();
        out.write_u16(0x1234).unwrap();
        out.set_big_endian(true);
        out.write_u16(0x1234).unwrap();
        out.write_i32(-2).unwrap();
        assert_eq!(
            out.as_bytes(),
            &[0x34, 0x12, 0x12, 0x34, 0xFF, 0xFF, 0xFF, 0xFE]
        );
    }

    #[test]
    fn test_endian_scope_restores() {
        let mut out = OutputBuffer::new();
        {
            let mut scoped = EndianScope::new(&mut out, true);
            assert!(scoped.is_big_endian());
            scoped.write_u16(1).unwrap();
        }
        assert!(!out.is_big_endian());
        assert_eq!(out.as_bytes(), &[0, 1]);
    }

    #[test]
    fn test_endian_scope_restores_on_error() {
        fn failing(input: &mut InputBuffer) -> Result<u32> {
            let mut scoped = EndianScope::new(input, true);
            scoped.read_u32()
        }

        let data = [0u8; 2];
        let mut input = InputBuffer::new(&data);
        assert!(failing(&mut input).is_err());
        assert!(!input.is_big_endian());
    }
}
