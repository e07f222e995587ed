//! Test helpers for building IFD data in memory.
//!
//! - [`RawTiff`] hand-assembles TIFF bytes entry by entry, including the
//!   malformed layouts (cycles, unknown types, dangling offsets) the writer
//!   never produces
//! - [`sample_exif`] builds a tree that touches every directory and most
//!   value kinds
//!
//! # Usage
//!
//! ```
//! use exif_io::test_utils::{Next, RawTiff};
//! use exif_io::ExifData;
//!
//! let bytes = RawTiff::big_endian()
//!     .ifd(vec![RawTiff::short(0x0112, 6)], Next::Ifd(0)) // points at itself
//!     .build();
//! let data = ExifData::from_bytes(&bytes).unwrap();
//! assert_eq!(data.len(), 1);
//! ```

use crate::{
    buffer::{Endian, OutputBuffer},
    directory::SubDirectory,
    exif::ExifData,
    layout::{HEADER_SIZE, TIFF_MAGIC},
    tags,
    value::{IfdValue, Rational},
};

/// Next-IFD pointer of a hand-built directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Zero, ending the chain
    End,
    /// Offset of the directory with this index in the builder
    Ifd(usize),
    /// Arbitrary offset
    Offset(u32),
}

#[derive(Debug, Clone)]
enum Field {
    Raw([u8; 4]),
    Short(u16),
    Long(u32),
    Ifd(usize),
    Data(Vec<u8>),
}

/// One hand-built 12-byte entry
#[derive(Debug, Clone)]
pub struct RawEntry {
    tag: u16,
    kind: u16,
    count: u32,
    field: Field,
}

/// Hand assembler for TIFF byte streams
///
/// Directories are laid out back to back after the header, followed by the
/// out-of-line data of [`RawTiff::data`] entries. Every directory gets a
/// next-IFD slot.
#[derive(Debug, Clone)]
pub struct RawTiff {
    big_endian: bool,
    magic: u16,
    first: Option<u32>,
    ifds: Vec<(Vec<RawEntry>, Next)>,
}

impl RawTiff {
    pub fn big_endian() -> Self {
        Self::with_endian(true)
    }

    pub fn little_endian() -> Self {
        Self::with_endian(false)
    }

    fn with_endian(big_endian: bool) -> Self {
        Self {
            big_endian,
            magic: TIFF_MAGIC,
            first: None,
            ifds: Vec::new(),
        }
    }

    /// Override the magic number
    pub fn with_magic(mut self, magic: u16) -> Self {
        self.magic = magic;
        self
    }

    /// Override the first-IFD offset in the header
    pub fn with_first_offset(mut self, offset: u32) -> Self {
        self.first = Some(offset);
        self
    }

    /// Append a directory
    pub fn ifd(mut self, entries: Vec<RawEntry>, next: Next) -> Self {
        self.ifds.push((entries, next));
        self
    }

    /// Offset the directory at `index` will be written at
    pub fn ifd_offset(&self, index: usize) -> u32 {
        let size: usize = self.ifds[..index]
            .iter()
            .map(|(entries, _)| 2 + 12 * entries.len() + 4)
            .sum();
        (HEADER_SIZE + size) as u32
    }

    /// Entry with a raw 4-byte value field, copied as-is
    pub fn entry(tag: u16, kind: u16, count: u32, field: [u8; 4]) -> RawEntry {
        RawEntry {
            tag,
            kind,
            count,
            field: Field::Raw(field),
        }
    }

    /// Single SHORT entry
    pub fn short(tag: u16, value: u16) -> RawEntry {
        RawEntry {
            tag,
            kind: 3,
            count: 1,
            field: Field::Short(value),
        }
    }

    /// Single LONG entry
    pub fn long(tag: u16, value: u32) -> RawEntry {
        RawEntry {
            tag,
            kind: 4,
            count: 1,
            field: Field::Long(value),
        }
    }

    /// LONG entry holding the offset of directory `index`
    pub fn pointer(tag: u16, index: usize) -> RawEntry {
        RawEntry {
            tag,
            kind: 4,
            count: 1,
            field: Field::Ifd(index),
        }
    }

    /// Entry whose payload is stored after the directories
    ///
    /// `bytes` are written verbatim, so multi-byte elements must already be
    /// in the stream's byte order.
    pub fn data(tag: u16, kind: u16, count: u32, bytes: Vec<u8>) -> RawEntry {
        RawEntry {
            tag,
            kind,
            count,
            field: Field::Data(bytes),
        }
    }

    /// ASCII entry, inline when it fits
    pub fn ascii(tag: u16, text: &str) -> RawEntry {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        let count = bytes.len() as u32;
        if bytes.len() <= 4 {
            bytes.resize(4, 0);
            Self::entry(tag, 2, count, [bytes[0], bytes[1], bytes[2], bytes[3]])
        } else {
            Self::data(tag, 2, count, bytes)
        }
    }

    /// Assemble the stream
    pub fn build(&self) -> Vec<u8> {
        let mut out = OutputBuffer::new();
        out.set_big_endian(self.big_endian);
        // Writes to a Vec cannot fail
        self.write(&mut out).unwrap_or_default();
        out.into_bytes()
    }

    fn write(&self, out: &mut OutputBuffer) -> crate::Result<()> {
        out.write_bytes(if self.big_endian { b"MM" } else { b"II" })?;
        out.write_u16(self.magic)?;
        let first = if self.ifds.is_empty() { 0 } else { self.ifd_offset(0) };
        out.write_u32(self.first.unwrap_or(first))?;

        let mut data_offset = self.ifd_offset(self.ifds.len());
        let mut blobs = Vec::new();

        for (entries, next) in &self.ifds {
            out.write_u16(entries.len() as u16)?;
            for entry in entries {
                out.write_u16(entry.tag)?;
                out.write_u16(entry.kind)?;
                out.write_u32(entry.count)?;
                match &entry.field {
                    Field::Raw(bytes) => out.write_bytes(bytes)?,
                    Field::Short(value) => {
                        out.write_u16(*value)?;
                        out.pad(2)?;
                    }
                    Field::Long(value) => out.write_u32(*value)?,
                    Field::Ifd(index) => out.write_u32(self.ifd_offset(*index))?,
                    Field::Data(bytes) => {
                        out.write_u32(data_offset)?;
                        data_offset += bytes.len() as u32;
                        blobs.push(bytes);
                    }
                }
            }
            out.write_u32(match next {
                Next::End => 0,
                Next::Ifd(index) => self.ifd_offset(*index),
                Next::Offset(offset) => *offset,
            })?;
        }

        for blob in blobs {
            out.write_bytes(blob)?;
        }
        Ok(())
    }
}

/// Tree with ifd0, ifd1 and all three sub-directories
///
/// Interop sits inside the Exif directory, where cameras put it.
pub fn sample_exif() -> ExifData {
    let mut data = ExifData::new();

    let ifd0 = data.image_directory_mut();
    ifd0.set_image_width(4000);
    ifd0.set_image_height(3000);
    ifd0.set_make("Canon");
    ifd0.set_model("EOS R5");
    ifd0.set_orientation(1);
    ifd0.set_resolution_x((72u32, 1u32));
    ifd0.set_resolution_y((72u32, 1u32));
    ifd0.set_resolution_unit(2);
    ifd0.set_software("exif-io");
    ifd0.set_date_time("2024:05:06 07:08:09");
    ifd0.set("BitsPerSample", [8u16, 8, 8]);
    // Unregistered tags keep their explicit types
    ifd0.insert(0xC000, IfdValue::SByte(vec![-1, 2, -3]));
    ifd0.insert(0xC001, IfdValue::SShort(vec![-300]));
    ifd0.insert(0xC002, IfdValue::SLong(vec![-70_000, 70_000]));
    ifd0.insert(0xC003, IfdValue::Single(vec![1.5]));
    ifd0.insert(0xC004, IfdValue::Double(vec![-0.25, 1e10]));

    let exif = ifd0.sub_mut(SubDirectory::Exif);
    exif.set("ExposureTime", (1u32, 250u32));
    exif.set("FNumber", (28u32, 10u32));
    exif.set("ISOSpeedRatings", 400u16);
    exif.set("ExifVersion", "0231");
    exif.set("DateTimeOriginal", "2024:05:06 07:08:09");
    exif.set("ExposureBiasValue", Rational::new(-2, 3));
    exif.set("FocalLength", (50u32, 1u32));
    exif.set(
        tags::USER_COMMENT,
        IfdValue::Undefined(b"ASCII\0\0\0hello".to_vec()),
    );
    exif.sub_mut(SubDirectory::Interop).set("InteropIndex", "R98");

    let gps = ifd0.sub_mut(SubDirectory::Gps);
    gps.set("GPSVersionID", [2u8, 3, 0, 0]);
    gps.set_gps_latitude(48.8584);
    gps.set_gps_longitude(2.2945);

    let ifd1 = data.thumbnail_directory_mut();
    ifd1.set("Compression", 6u16);
    ifd1.set_image_width(160);
    ifd1.set_image_height(120);
    ifd1.set("JPEGInterchangeFormat", 0u32);
    ifd1.set("JPEGInterchangeFormatLength", 0u32);

    data
}
