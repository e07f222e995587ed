//! EXIF inside JPEG APP1 segments
//!
//! A JPEG stores EXIF as an APP1 segment whose body is `Exif\0\0` followed by
//! a complete TIFF stream. Offsets inside that stream are relative to the
//! TIFF header, not to the JPEG file.

use crate::{
    buffer::InputBuffer,
    error::{Error, Result},
    exif::ExifData,
};

// JPEG markers
const SOI: u8 = 0xD8; // Start of Image
const EOI: u8 = 0xD9; // End of Image
const APP1: u8 = 0xE1; // EXIF / XMP
const SOS: u8 = 0xDA; // Start of Scan (image data follows)
const TEM: u8 = 0x01;

// Markers without a length field
const RST0: u8 = 0xD0;
const RST7: u8 = 0xD7;

/// Signature opening an EXIF APP1 body
pub const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// Largest segment body a JPEG length field can describe
pub const MAX_MARKER_SIZE: usize = 65533;

/// Parse an APP1 body that starts with [`EXIF_SIGNATURE`]
pub fn exif_from_app1(payload: &[u8]) -> Result<ExifData> {
    let tiff = payload
        .strip_prefix(EXIF_SIGNATURE)
        .ok_or_else(|| Error::InvalidFormat("APP1 payload lacks the Exif signature".into()))?;
    ExifData::try_from_bytes(tiff)
}

/// Encode an APP1 body: signature plus big-endian TIFF stream
pub fn exif_to_app1(data: &mut ExifData) -> Result<Vec<u8>> {
    let tiff = data.to_bytes()?;
    let mut payload = Vec::with_capacity(EXIF_SIGNATURE.len() + tiff.len());
    payload.extend_from_slice(EXIF_SIGNATURE);
    payload.extend_from_slice(&tiff);
    Ok(payload)
}

/// Encode a complete APP1 segment (marker, length, body)
pub fn exif_to_app1_segment(data: &mut ExifData) -> Result<Vec<u8>> {
    let payload = exif_to_app1(data)?;
    if payload.len() > MAX_MARKER_SIZE {
        return Err(Error::TooLarge {
            size: payload.len(),
        });
    }

    let mut segment = Vec::with_capacity(payload.len() + 4);
    segment.extend_from_slice(&[0xFF, APP1]);
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    Ok(segment)
}

/// Find the TIFF stream of the first EXIF APP1 segment in a JPEG file
///
/// Scanning stops at the start of the image data.
pub fn find_exif(jpeg: &[u8]) -> Result<Option<&[u8]>> {
    let mut input = InputBuffer::with_endian(jpeg, true);

    if input.read_u8()? != 0xFF || input.read_u8()? != SOI {
        return Err(Error::InvalidFormat("Not a JPEG file".into()));
    }

    loop {
        let offset = input.offset();
        let prefix = input.read_u8()?;
        if prefix != 0xFF {
            return Err(Error::InvalidFormat(format!(
                "Expected 0xFF at offset {}, got 0x{:02X}",
                offset, prefix
            )));
        }

        // Fill bytes
        let mut marker = input.read_u8()?;
        while marker == 0xFF {
            marker = input.read_u8()?;
        }

        match marker {
            SOS | EOI => return Ok(None),
            TEM | RST0..=RST7 => continue,
            _ => {}
        }

        let size = input.read_u16()? as usize;
        if size < 2 {
            return Err(Error::InvalidFormat(format!(
                "Segment at offset {} has invalid length {}",
                offset, size
            )));
        }
        let body = input.read_bytes(size - 2)?;
        if marker == APP1 {
            if let Some(tiff) = body.strip_prefix(EXIF_SIGNATURE) {
                return Ok(Some(tiff));
            }
        }
    }
}

/// Parse the EXIF metadata of a JPEG file, if it has any
pub fn read_exif(jpeg: &[u8]) -> Result<Option<ExifData>> {
    find_exif(jpeg)?
        .map(ExifData::try_from_bytes)
        .transpose()
}
