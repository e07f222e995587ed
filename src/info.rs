//! Metadata summaries
//!
//! Quick answers for callers that only want the common fields: who made the
//! image, when, and where the embedded thumbnail is. Everything here reads
//! from a parsed [`ExifData`].

use crate::{directory::IfdDirectory, exif::ExifData, tags};
use std::fmt;

/// Location of an embedded JPEG thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailInfo {
    /// Offset of the thumbnail JPEG data from the start of the TIFF header
    pub offset: u32,
    /// Size of the thumbnail JPEG data in bytes
    pub size: u32,
    /// Width in pixels (if present)
    pub width: Option<u32>,
    /// Height in pixels (if present)
    pub height: Option<u32>,
}

impl ThumbnailInfo {
    /// Thumbnail location from `ifd1`
    ///
    /// Both JPEGInterchangeFormat and JPEGInterchangeFormatLength are
    /// required, and the length must be non-zero.
    pub fn from_exif(data: &ExifData) -> Option<Self> {
        let ifd1 = data.thumbnail_directory()?;
        let offset = u32_tag(ifd1, tags::JPEG_INTERCHANGE_FORMAT)?;
        let size = u32_tag(ifd1, tags::JPEG_INTERCHANGE_FORMAT_LENGTH)?;
        if size == 0 {
            return None;
        }
        Some(Self {
            offset,
            size,
            width: ifd1.image_width(),
            height: ifd1.image_height(),
        })
    }

    /// Slice the thumbnail out of the TIFF stream it was read from
    pub fn bytes<'a>(&self, tiff: &'a [u8]) -> Option<&'a [u8]> {
        let start = self.offset as usize;
        let end = start.checked_add(self.size as usize)?;
        tiff.get(start..end)
    }
}

fn u32_tag(dir: &IfdDirectory, tag: u16) -> Option<u32> {
    u32::try_from(dir.get(tag)?.to_int(0)).ok()
}

/// Authorship and timing fields of an image
///
/// Text comes from `ifd0`, except the capture time which lives in the Exif
/// directory. Displays as make, model and the best known time joined by
/// ` | `.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifInfo {
    /// `Make` tag
    pub make: Option<String>,
    /// `Model` tag
    pub model: Option<String>,
    /// `Orientation` code, 1 when the image is stored upright
    pub orientation: Option<u16>,
    /// `Software` tag
    pub software: Option<String>,
    /// `DateTime`, when the file was last changed
    pub date_time: Option<String>,
    /// `DateTimeOriginal`, when the picture was taken
    pub date_time_original: Option<String>,
    /// `Artist` tag
    pub artist: Option<String>,
    /// `Copyright` tag
    pub copyright: Option<String>,
}

impl ExifInfo {
    /// Collect the summary fields; absent or blank text fields are `None`
    pub fn from_exif(data: &ExifData) -> Self {
        let Some(ifd0) = data.image_directory() else {
            return Self::default();
        };
        Self {
            make: clean(ifd0.make()),
            model: clean(ifd0.model()),
            orientation: ifd0.orientation(),
            software: clean(ifd0.software()),
            date_time: clean(ifd0.date_time()),
            date_time_original: clean(
                data.exif_directory()
                    .and_then(|exif| exif.get(tags::DATE_TIME_ORIGINAL))
                    .map(|value| value.to_text()),
            ),
            artist: clean(ifd0.artist()),
            copyright: clean(ifd0.copyright()),
        }
    }
}

fn clean(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl fmt::Display for ExifInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let taken = self
            .date_time_original
            .as_deref()
            .or(self.date_time.as_deref());
        let fields: Vec<&str> = [self.make.as_deref(), self.model.as_deref(), taken]
            .into_iter()
            .flatten()
            .collect();
        if fields.is_empty() {
            f.write_str("(no metadata)")
        } else {
            f.write_str(&fields.join(" | "))
        }
    }
}

/// Parse a TIFF stream and summarize it; `None` when the header is invalid
pub fn parse_exif_info(tiff: &[u8]) -> Option<ExifInfo> {
    ExifData::from_bytes(tiff).map(|data| ExifInfo::from_exif(&data))
}

/// Parse a TIFF stream and locate its thumbnail
pub fn parse_thumbnail_info(tiff: &[u8]) -> Option<ThumbnailInfo> {
    ThumbnailInfo::from_exif(&ExifData::from_bytes(tiff)?)
}

/// Embedded thumbnail bytes of a TIFF stream
pub fn thumbnail_bytes(tiff: &[u8]) -> Option<&[u8]> {
    parse_thumbnail_info(tiff)?.bytes(tiff)
}
