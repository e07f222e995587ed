//! Tolerant TIFF/IFD reader
//!
//! Third-party files are often damaged in small ways, so the reader keeps
//! whatever it can decode:
//!
//! - an entry with an unknown type, or a payload outside the buffer, is kept
//!   as a tag-only entry and the next entry is read from its fixed 12-byte
//!   slot
//! - a truncated entry table keeps the entries read so far
//! - the IFD chain stops at a zero next offset, a revisited offset, or after
//!   [`ReadOptions::max_ifd_chain`] directories
//!
//! Only a bad header is an error.

use crate::{
    buffer::{EndianScope, InputBuffer},
    directory::{IfdDirectory, IfdEntry, SubDirectory, ENTRY_COUNT_SIZE, ENTRY_SIZE},
    error::{Error, Result},
    layout::TIFF_MAGIC,
    tags::TagGroup,
    value::{IfdValue, IfdValueType},
};
use std::collections::HashSet;

/// Default limit on the number of directories in the IFD chain
pub const DEFAULT_MAX_IFD_CHAIN: usize = 64;

/// Default limit on sub-directory nesting
pub const DEFAULT_MAX_SUB_DEPTH: usize = 4;

/// Limits applied while parsing untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Maximum number of top-level directories to follow
    pub max_ifd_chain: usize,
    /// Maximum sub-directory nesting depth (1 = only sub-directories of
    /// top-level directories)
    pub max_sub_depth: usize,
    /// Follow pointer tags found inside sub-directories, such as the Interop
    /// pointer inside the Exif directory
    pub follow_nested: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_ifd_chain: DEFAULT_MAX_IFD_CHAIN,
            max_sub_depth: DEFAULT_MAX_SUB_DEPTH,
            follow_nested: true,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_ifd_chain(mut self, max_ifd_chain: usize) -> Self {
        self.max_ifd_chain = max_ifd_chain;
        self
    }

    pub fn with_max_sub_depth(mut self, max_sub_depth: usize) -> Self {
        self.max_sub_depth = max_sub_depth;
        self
    }

    pub fn with_follow_nested(mut self, follow_nested: bool) -> Self {
        self.follow_nested = follow_nested;
        self
    }
}

/// Read the byte order marker and magic at the cursor position
///
/// Returns the byte order (`true` for big-endian) and the first IFD offset.
pub fn read_header(input: &mut InputBuffer) -> Result<(bool, u32)> {
    let big_endian = match input.read_bytes(2)? {
        b"II" => false,
        b"MM" => true,
        other => {
            return Err(Error::InvalidFormat(format!(
                "Invalid byte order marker {:02X?}",
                other
            )))
        }
    };

    let mut input = EndianScope::new(input, big_endian);
    let magic = input.read_u16()?;
    if magic != TIFF_MAGIC {
        return Err(Error::InvalidFormat(format!("Invalid TIFF magic 0x{:04X}", magic)));
    }
    let first = input.read_u32()?;
    Ok((big_endian, first))
}

/// Parse a TIFF stream starting at the cursor position
///
/// Offsets inside the stream are relative to the header. Directories are
/// named `ifd0`, `ifd1`, ... in chain order. The cursor's byte order is
/// restored before returning.
pub fn read_tiff(
    input: &mut InputBuffer,
    options: &ReadOptions,
) -> Result<Vec<(String, IfdDirectory)>> {
    let base = input.offset();
    let (big_endian, first) = read_header(input)?;
    let mut scoped = EndianScope::new(input, big_endian);

    let mut reader = IfdReader {
        input: &mut *scoped,
        base,
        options,
        visited: HashSet::new(),
    };
    let mut directories = reader.read_chain(first);
    for (_, dir) in directories.iter_mut() {
        reader.read_subs(dir, 1);
    }

    log::debug!(
        "parsed {} directories ({})",
        directories.len(),
        if big_endian { "MM" } else { "II" }
    );
    Ok(directories)
}

struct IfdReader<'r, 'a> {
    input: &'r mut InputBuffer<'a>,
    base: usize,
    options: &'r ReadOptions,
    visited: HashSet<u32>,
}

impl IfdReader<'_, '_> {
    fn read_chain(&mut self, first: u32) -> Vec<(String, IfdDirectory)> {
        let mut directories = Vec::new();
        let mut offset = first;

        while offset != 0 {
            if directories.len() >= self.options.max_ifd_chain {
                log::warn!(
                    "IFD chain longer than {} directories, stopping",
                    self.options.max_ifd_chain
                );
                break;
            }
            if !self.visited.insert(offset) {
                log::warn!("IFD chain revisits offset {}, stopping", offset);
                break;
            }
            let Some((dir, next)) = self.read_directory(offset, TagGroup::Image, true) else {
                break;
            };
            directories.push((format!("ifd{}", directories.len()), dir));
            offset = next;
        }
        directories
    }

    /// Attach the sub-directories named by `dir`'s pointer tags
    fn read_subs(&mut self, dir: &mut IfdDirectory, depth: usize) {
        if depth > self.options.max_sub_depth {
            log::warn!("sub-directory nesting deeper than {}, skipping", self.options.max_sub_depth);
            return;
        }

        let pointers: Vec<(SubDirectory, u32)> = SubDirectory::ALL
            .into_iter()
            .filter_map(|kind| {
                let offset = sub_offset(dir.get(kind.pointer_tag())?)?;
                Some((kind, offset))
            })
            .collect();

        for (kind, offset) in pointers {
            if !self.visited.insert(offset) {
                log::warn!("{} pointer revisits offset {}, skipping", kind, offset);
                continue;
            }
            let Some((mut sub, _)) = self.read_directory(offset, kind.group(), false) else {
                continue;
            };
            if self.options.follow_nested {
                self.read_subs(&mut sub, depth + 1);
            }
            dir.insert_sub(kind, sub);
        }
    }

    /// Read one directory block, returning it with its next offset
    fn read_directory(
        &mut self,
        offset: u32,
        group: TagGroup,
        has_next: bool,
    ) -> Option<(IfdDirectory, u32)> {
        let start = self.base.checked_add(offset as usize)?;
        if !self.input.has_range(start, ENTRY_COUNT_SIZE) {
            log::warn!("IFD offset {} is outside the data", offset);
            return None;
        }
        self.input.seek(start);
        let count = self.input.read_u16().ok()? as usize;

        let mut dir = IfdDirectory::with_group(group);
        let table = start + ENTRY_COUNT_SIZE;
        for index in 0..count {
            let entry_start = table + index * ENTRY_SIZE;
            if !self.input.has_range(entry_start, ENTRY_SIZE) {
                log::warn!(
                    "IFD at {} truncated after {} of {} entries",
                    offset,
                    index,
                    count
                );
                return Some((dir, 0));
            }
            dir.insert_entry(self.read_entry(entry_start));
        }

        let next = if has_next {
            self.input.seek(table + count * ENTRY_SIZE);
            self.input.read_u32().unwrap_or(0)
        } else {
            0
        };
        Some((dir, next))
    }

    /// Decode the entry at `entry_start`; undecodable payloads become tag-only
    fn read_entry(&mut self, entry_start: usize) -> IfdEntry {
        self.input.seek(entry_start);
        // The caller checked that the whole entry is in range
        let tag = self.input.read_u16().unwrap_or(0);
        let code = self.input.read_u16().unwrap_or(0);
        let count = self.input.read_u32().unwrap_or(0);

        IfdEntry {
            tag,
            value: self.read_payload(tag, code, count),
        }
    }

    fn read_payload(&mut self, tag: u16, code: u16, count: u32) -> Option<IfdValue> {
        let Some(kind) = IfdValueType::from_code(code) else {
            log::warn!("tag 0x{:04X} has unknown type {}, keeping tag only", tag, code);
            return None;
        };

        let size = (count as usize).checked_mul(kind.unit_size())?;
        if size > 4 {
            let offset = self.input.read_u32().ok()?;
            let position = self.base.checked_add(offset as usize)?;
            self.input.seek(position);
        }

        match IfdValue::read(kind, count, self.input) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("tag 0x{:04X}: {}, keeping tag only", tag, e);
                None
            }
        }
    }
}

fn sub_offset(pointer: &IfdValue) -> Option<u32> {
    match pointer {
        IfdValue::Long(values) => values.first().copied(),
        IfdValue::Ifd(offset) => Some(*offset),
        IfdValue::Short(values) => values.first().map(|&v| v as u32),
        _ => None,
    }
    .filter(|&offset| offset != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buffer::Endian,
        tags,
        test_utils::{Next, RawTiff},
    };

    #[test]
    fn test_read_header() {
        let mut input = InputBuffer::new(b"MM\x00\x2A\x00\x00\x00\x08");
        assert_eq!(read_header(&mut input).unwrap(), (true, 8));
        assert!(!input.is_big_endian());

        let mut input = InputBuffer::new(b"II\x2A\x00\x08\x00\x00\x00");
        assert_eq!(read_header(&mut input).unwrap(), (false, 8));

        let mut input = InputBuffer::new(b"XX\x00\x2A\x00\x00\x00\x08");
        assert!(matches!(read_header(&mut input), Err(Error::InvalidFormat(_))));

        let mut input = InputBuffer::new(b"MM\x00\x2B\x00\x00\x00\x08");
        assert!(matches!(read_header(&mut input), Err(Error::InvalidFormat(_))));

        let mut input = InputBuffer::new(b"MM\x00");
        assert!(matches!(read_header(&mut input), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn test_read_at_offset() {
        let tiff = RawTiff::big_endian()
            .ifd(vec![RawTiff::short(tags::ORIENTATION, 6)], Next::End)
            .build();
        let mut data = vec![0xAA; 5];
        data.extend_from_slice(&tiff);

        let mut input = InputBuffer::new(&data);
        input.seek(5);
        let dirs = read_tiff(&mut input, &ReadOptions::default()).unwrap();
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].0, "ifd0");
        assert_eq!(dirs[0].1.orientation(), Some(6));
    }

    #[test]
    fn test_unknown_type_keeps_tag() {
        let tiff = RawTiff::little_endian()
            .ifd(
                vec![
                    RawTiff::entry(0x1234, 99, 1, [1, 2, 3, 4]),
                    RawTiff::short(tags::ORIENTATION, 3),
                ],
                Next::End,
            )
            .build();
        let dirs = read_tiff(&mut InputBuffer::new(&tiff), &ReadOptions::default()).unwrap();
        let ifd0 = &dirs[0].1;
        assert_eq!(ifd0.len(), 2);
        assert!(ifd0.has(0x1234u16));
        assert!(ifd0.get(0x1234u16).is_none());
        assert_eq!(ifd0.orientation(), Some(3));
    }

    #[test]
    fn test_payload_out_of_range_keeps_tag() {
        // 100 LONGs at an offset far past the end
        let tiff = RawTiff::big_endian()
            .ifd(
                vec![
                    RawTiff::entry(0x0111, 4, 100, 0x0000_FF00u32.to_be_bytes()),
                    RawTiff::short(tags::IMAGE_WIDTH, 10),
                ],
                Next::End,
            )
            .build();
        let dirs = read_tiff(&mut InputBuffer::new(&tiff), &ReadOptions::default()).unwrap();
        let ifd0 = &dirs[0].1;
        assert_eq!(ifd0.get_entry(0x0111u16).unwrap().value, None);
        assert_eq!(ifd0.image_width(), Some(10));
    }

    #[test]
    fn test_chain_limit() {
        let mut raw = RawTiff::big_endian();
        for index in 0..5 {
            let next = if index < 4 { Next::Ifd(index + 1) } else { Next::End };
            raw = raw.ifd(vec![RawTiff::short(tags::ORIENTATION, 1)], next);
        }
        let tiff = raw.build();

        let options = ReadOptions::new().with_max_ifd_chain(3);
        let dirs = read_tiff(&mut InputBuffer::new(&tiff), &options).unwrap();
        assert_eq!(dirs.len(), 3);

        let dirs = read_tiff(&mut InputBuffer::new(&tiff), &ReadOptions::default()).unwrap();
        assert_eq!(dirs.len(), 5);
    }

    #[test]
    fn test_nested_depth() {
        let mut data = crate::ExifData::new();
        data.interop_directory_mut().set("InteropIndex", "R98");
        data.exif_directory_mut()
            .sub_mut(SubDirectory::Interop)
            .set("InteropIndex", "R03");
        let bytes = data.to_bytes().unwrap();

        let flat = ReadOptions::new().with_follow_nested(false);
        let dirs = read_tiff(&mut InputBuffer::new(&bytes), &flat).unwrap();
        let ifd0 = &dirs[0].1;
        assert!(ifd0.has_sub(SubDirectory::Interop));
        assert!(!ifd0.sub(SubDirectory::Exif).unwrap().has_sub(SubDirectory::Interop));

        let dirs = read_tiff(&mut InputBuffer::new(&bytes), &ReadOptions::default()).unwrap();
        let exif = dirs[0].1.sub(SubDirectory::Exif).unwrap();
        assert_eq!(
            exif.sub(SubDirectory::Interop).unwrap().get("InteropIndex").unwrap().to_text(),
            "R03"
        );
    }

    #[test]
    fn test_sub_offset() {
        assert_eq!(sub_offset(&IfdValue::Long(vec![26])), Some(26));
        assert_eq!(sub_offset(&IfdValue::Ifd(40)), Some(40));
        assert_eq!(sub_offset(&IfdValue::Long(vec![0])), None);
        assert_eq!(sub_offset(&IfdValue::Long(vec![])), None);
        assert_eq!(sub_offset(&IfdValue::ascii("26")), None);
    }
}
