//! EXIF/TIFF container
//!
//! [`ExifData`] holds the top-level directories of a TIFF stream (`ifd0`,
//! `ifd1`, ...) in chain order. `ifd0` describes the main image and carries
//! the Exif, GPS and Interop sub-directories; `ifd1` usually describes the
//! embedded thumbnail.

use crate::{
    buffer::{EndianScope, InputBuffer, OutputBuffer},
    directory::{IfdDirectory, SubDirectory},
    error::Result,
    layout::{self, HEADER_SIZE},
    reader::{self, ReadOptions},
    tags,
};
use std::fmt;

/// Name of the main image directory
pub const IMAGE_DIRECTORY: &str = "ifd0";
/// Name of the thumbnail directory
pub const THUMBNAIL_DIRECTORY: &str = "ifd1";

/// Ordered set of named top-level directories
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExifData {
    directories: Vec<(String, IfdDirectory)>,
}

impl ExifData {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TIFF stream, returning `None` when the header is invalid
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        Self::from_bytes_with(data, &ReadOptions::default())
    }

    /// [`ExifData::from_bytes`] with explicit limits
    pub fn from_bytes_with(data: &[u8], options: &ReadOptions) -> Option<Self> {
        let mut exif = Self::new();
        exif.read_with(&mut InputBuffer::new(data), options)
            .then_some(exif)
    }

    /// Parse a TIFF stream, reporting why the header was rejected
    pub fn try_from_bytes(data: &[u8]) -> Result<Self> {
        let directories = reader::read_tiff(&mut InputBuffer::new(data), &ReadOptions::default())?;
        Ok(Self { directories })
    }

    /// Replace the contents with the TIFF stream at the cursor position
    ///
    /// Returns `false`, leaving the container unchanged, when the header is
    /// invalid. The cursor's byte order is the same afterwards.
    pub fn read(&mut self, input: &mut InputBuffer) -> bool {
        self.read_with(input, &ReadOptions::default())
    }

    /// [`ExifData::read`] with explicit limits
    pub fn read_with(&mut self, input: &mut InputBuffer, options: &ReadOptions) -> bool {
        match reader::read_tiff(input, options) {
            Ok(directories) => {
                self.directories = directories;
                true
            }
            Err(e) => {
                log::debug!("not a TIFF stream: {}", e);
                false
            }
        }
    }

    /// Encode the tree as a big-endian TIFF stream
    ///
    /// Adds `ifd0` if missing and updates the sub-directory pointer tags to
    /// their written offsets. The output's byte order is restored afterwards.
    pub fn write(&mut self, out: &mut OutputBuffer) -> Result<()> {
        self.prepare();
        let plan = layout::compute_layout(self)?;
        layout::apply_layout(self, &plan);
        let mut out = EndianScope::new(out, true);
        layout::emit(self, &plan, &mut out)
    }

    /// Encode the tree into a new buffer
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut out = OutputBuffer::with_capacity(self.byte_size());
        self.write(&mut out)?;
        Ok(out.into_bytes())
    }

    /// Make the tree writable: `ifd0` comes first and every directory's
    /// pointer tags match its sub-directories
    pub fn prepare(&mut self) {
        match self.position(IMAGE_DIRECTORY) {
            Some(0) => {}
            Some(index) => {
                let ifd0 = self.directories.remove(index);
                self.directories.insert(0, ifd0);
            }
            None => self
                .directories
                .insert(0, (IMAGE_DIRECTORY.to_string(), IfdDirectory::new())),
        }
        for (_, dir) in self.directories.iter_mut() {
            dir.sync_sub_pointers();
        }
    }

    /// Encoded size, assuming [`ExifData::prepare`] has run
    pub fn byte_size(&self) -> usize {
        HEADER_SIZE + self.directories.iter().map(|(_, dir)| dir.byte_size()).sum::<usize>()
    }

    /// Number of top-level directories
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    /// True when no directory holds an entry
    pub fn is_empty(&self) -> bool {
        self.directories.iter().all(|(_, dir)| dir.is_empty())
    }

    /// Top-level directories in chain order
    pub fn directories(&self) -> impl Iterator<Item = (&str, &IfdDirectory)> {
        self.directories.iter().map(|(name, dir)| (name.as_str(), dir))
    }

    pub(crate) fn directories_mut(&mut self) -> impl Iterator<Item = (&str, &mut IfdDirectory)> {
        self.directories
            .iter_mut()
            .map(|(name, dir)| (name.as_str(), dir))
    }

    /// Directory names in chain order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.directories.iter().map(|(name, _)| name.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.directories.iter().position(|(n, _)| n == name)
    }

    /// Check whether a directory exists
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Directory by name, without creating it
    pub fn lookup(&self, name: &str) -> Option<&IfdDirectory> {
        self.directories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, dir)| dir)
    }

    /// Mutable directory by name, without creating it
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut IfdDirectory> {
        self.directories
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, dir)| dir)
    }

    /// Directory by name, appended empty if absent
    pub fn get_or_create(&mut self, name: &str) -> &mut IfdDirectory {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.directories.push((name.to_string(), IfdDirectory::new()));
                self.directories.len() - 1
            }
        };
        &mut self.directories[index].1
    }

    /// Store a directory, replacing one with the same name in place
    pub fn insert(&mut self, name: &str, directory: IfdDirectory) -> Option<IfdDirectory> {
        match self.position(name) {
            Some(index) => Some(std::mem::replace(&mut self.directories[index].1, directory)),
            None => {
                self.directories.push((name.to_string(), directory));
                None
            }
        }
    }

    /// Remove a directory
    pub fn remove(&mut self, name: &str) -> Option<IfdDirectory> {
        let index = self.position(name)?;
        Some(self.directories.remove(index).1)
    }

    /// Remove all directories
    pub fn clear(&mut self) {
        self.directories.clear();
    }

    /// Deep-copy every directory of `other` into this container
    pub fn copy_from(&mut self, other: &ExifData) {
        for (name, dir) in &other.directories {
            self.get_or_create(name).copy_from(dir);
        }
    }

    /// `ifd0`
    pub fn image_directory(&self) -> Option<&IfdDirectory> {
        self.lookup(IMAGE_DIRECTORY)
    }

    /// `ifd0`, created if absent
    pub fn image_directory_mut(&mut self) -> &mut IfdDirectory {
        self.get_or_create(IMAGE_DIRECTORY)
    }

    /// `ifd1`
    pub fn thumbnail_directory(&self) -> Option<&IfdDirectory> {
        self.lookup(THUMBNAIL_DIRECTORY)
    }

    /// `ifd1`, created if absent (along with `ifd0`, so it stays second)
    pub fn thumbnail_directory_mut(&mut self) -> &mut IfdDirectory {
        if !self.has(THUMBNAIL_DIRECTORY) {
            self.image_directory_mut();
        }
        self.get_or_create(THUMBNAIL_DIRECTORY)
    }

    /// Exif sub-directory of `ifd0`
    pub fn exif_directory(&self) -> Option<&IfdDirectory> {
        self.image_directory()?.sub(SubDirectory::Exif)
    }

    pub fn exif_directory_mut(&mut self) -> &mut IfdDirectory {
        self.image_directory_mut().sub_mut(SubDirectory::Exif)
    }

    /// GPS sub-directory of `ifd0`
    pub fn gps_directory(&self) -> Option<&IfdDirectory> {
        self.image_directory()?.sub(SubDirectory::Gps)
    }

    pub fn gps_directory_mut(&mut self) -> &mut IfdDirectory {
        self.image_directory_mut().sub_mut(SubDirectory::Gps)
    }

    /// Interop sub-directory, from `ifd0` or else from the Exif directory
    pub fn interop_directory(&self) -> Option<&IfdDirectory> {
        let ifd0 = self.image_directory()?;
        ifd0.sub(SubDirectory::Interop).or_else(|| {
            ifd0.sub(SubDirectory::Exif)?
                .sub(SubDirectory::Interop)
        })
    }

    /// Interop sub-directory of `ifd0`, created if absent
    pub fn interop_directory_mut(&mut self) -> &mut IfdDirectory {
        self.image_directory_mut().sub_mut(SubDirectory::Interop)
    }
}

impl fmt::Display for ExifData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, dir) in &self.directories {
            writeln!(f, "{}:", name)?;
            write_directory(f, dir, 1)?;
        }
        Ok(())
    }
}

fn write_directory(f: &mut fmt::Formatter<'_>, dir: &IfdDirectory, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    for entry in dir.entries() {
        let name = tags::tag_name(dir.group(), entry.tag).unwrap_or("<unknown>");
        match &entry.value {
            Some(value) => writeln!(f, "{}{} (0x{:04X}): {}", indent, name, entry.tag, value)?,
            None => writeln!(f, "{}{} (0x{:04X}): <unreadable>", indent, name, entry.tag)?,
        }
    }
    for (kind, sub) in dir.subs() {
        writeln!(f, "{}{}:", indent, kind)?;
        write_directory(f, sub, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buffer::Endian, value::IfdValue};

    #[test]
    fn test_lookup_does_not_create() {
        let data = ExifData::new();
        assert!(data.lookup("ifd0").is_none());
        assert!(data.image_directory().is_none());
        assert!(data.exif_directory().is_none());
        assert_eq!(data.len(), 0);
    }

    #[test]
    fn test_get_or_create() {
        let mut data = ExifData::new();
        data.get_or_create("ifd0").set_make("Canon");
        data.get_or_create("ifd0").set_model("EOS");
        assert_eq!(data.len(), 1);
        assert_eq!(data.image_directory().unwrap().len(), 2);
    }

    #[test]
    fn test_thumbnail_creates_image_first() {
        let mut data = ExifData::new();
        data.thumbnail_directory_mut().set_image_width(160);
        assert_eq!(data.names().collect::<Vec<_>>(), vec!["ifd0", "ifd1"]);
    }

    #[test]
    fn test_prepare_moves_ifd0_first() {
        let mut data = ExifData::new();
        data.get_or_create("ifd1");
        data.get_or_create("ifd0").sub_mut(SubDirectory::Gps).set_gps_latitude(1.0);
        data.prepare();
        assert_eq!(data.names().collect::<Vec<_>>(), vec!["ifd0", "ifd1"]);
        assert!(data.image_directory().unwrap().has(tags::GPS_OFFSET));

        let mut empty = ExifData::new();
        empty.prepare();
        assert!(empty.has("ifd0"));
    }

    #[test]
    fn test_write_restores_endianness() {
        let mut data = ExifData::new();
        data.image_directory_mut().set_orientation(1);
        let mut out = OutputBuffer::new();
        data.write(&mut out).unwrap();
        assert!(!out.is_big_endian());
        assert_eq!(&out.as_bytes()[..2], b"MM");
        assert_eq!(out.len(), data.byte_size());
    }

    #[test]
    fn test_read_failure_keeps_contents() {
        let mut data = ExifData::new();
        data.image_directory_mut().set_make("Canon");
        let mut input = InputBuffer::with_endian(b"not a tiff", true);
        assert!(!data.read(&mut input));
        assert!(input.is_big_endian());
        assert_eq!(data.image_directory().unwrap().make().as_deref(), Some("Canon"));
        assert!(ExifData::from_bytes(b"II").is_none());
        assert!(ExifData::try_from_bytes(b"MM\x00\x2B\x00\x00\x00\x08").is_err());
    }

    #[test]
    fn test_interop_lookup_falls_back_to_exif() {
        let mut data = ExifData::new();
        data.exif_directory_mut()
            .sub_mut(SubDirectory::Interop)
            .set("InteropIndex", "R98");
        assert_eq!(
            data.interop_directory().unwrap().get("InteropIndex"),
            Some(&IfdValue::ascii("R98"))
        );
    }

    #[test]
    fn test_copy_from() {
        let mut source = ExifData::new();
        source.image_directory_mut().set_make("Nikon");
        source.gps_directory_mut().set_gps_longitude(-1.5);

        let mut target = ExifData::new();
        target.copy_from(&source);
        assert_eq!(target, source);

        source.image_directory_mut().set_make("Sony");
        assert_eq!(target.image_directory().unwrap().make().as_deref(), Some("Nikon"));
    }

    #[test]
    fn test_display() {
        let mut data = ExifData::new();
        data.image_directory_mut().set_make("Canon");
        data.exif_directory_mut().set("ExifVersion", "0231");
        let text = data.to_string();
        assert!(text.contains("ifd0:"));
        assert!(text.contains("Make (0x010F): Canon"));
        assert!(text.contains("  exif:"));
        assert!(text.contains("ExifVersion (0x9000): 0231"));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut data = ExifData::new();
        assert!(data.insert("ifd0", IfdDirectory::new()).is_none());
        assert!(data.insert("ifd0", IfdDirectory::new()).is_some());
        assert!(data.remove("ifd0").is_some());
        assert!(data.is_empty());
    }
}
