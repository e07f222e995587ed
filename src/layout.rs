//! Two-stage IFD writer
//!
//! [`compute_layout`] walks the tree once and assigns every directory block an
//! absolute offset. [`apply_layout`] patches the sub-directory pointer tags to
//! those offsets and [`emit`] writes the bytes, checking that every block
//! starts where the plan put it.
//!
//! ```text
//! header (8) | ifd0 | ifd0 subs, depth first | ifd1 | ifd1 subs | ...
//! ```
//!
//! Each top-level directory and its nested directories form one contiguous
//! region of [`IfdDirectory::byte_size`] bytes, so the next top-level block
//! starts at the previous one's offset plus its `byte_size`. Top-level
//! blocks carry a next-IFD pointer, sub-directory blocks do not.
//! Values larger than four bytes follow their block's entry table in entry
//! order.

use crate::{
    buffer::{Endian, OutputBuffer},
    directory::{IfdDirectory, SubDirectory, ENTRY_COUNT_SIZE, ENTRY_SIZE, NEXT_POINTER_SIZE},
    error::{Error, Result},
    exif::ExifData,
    value::IfdValue,
};

/// TIFF magic number following the byte order marker
pub const TIFF_MAGIC: u16 = 0x002A;

/// Size of the TIFF header
pub const HEADER_SIZE: usize = 8;

/// Where one directory block lands in the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Absolute offset from the start of the TIFF header
    pub offset: u32,
    /// Block size including overflow data
    pub size: usize,
    /// Nested directory blocks
    pub subs: Vec<(SubDirectory, Placement)>,
}

impl Placement {
    /// Placement of a nested directory
    pub fn sub(&self, kind: SubDirectory) -> Option<&Placement> {
        self.subs
            .iter()
            .find(|(sub_kind, _)| *sub_kind == kind)
            .map(|(_, placement)| placement)
    }
}

/// Offsets of every directory block of an [`ExifData`] tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutPlan {
    directories: Vec<(String, Placement)>,
    total_size: usize,
}

impl LayoutPlan {
    /// Placement of a top-level directory
    pub fn directory(&self, name: &str) -> Option<&Placement> {
        self.directories
            .iter()
            .find(|(dir_name, _)| dir_name == name)
            .map(|(_, placement)| placement)
    }

    /// Top-level placements in chain order
    pub fn directories(&self) -> impl Iterator<Item = (&str, &Placement)> {
        self.directories
            .iter()
            .map(|(name, placement)| (name.as_str(), placement))
    }

    /// Offset stored in the header
    pub fn first_offset(&self) -> u32 {
        self.directories
            .first()
            .map_or(0, |(_, placement)| placement.offset)
    }

    /// Total encoded size including the header
    pub fn total_size(&self) -> usize {
        self.total_size
    }
}

fn to_offset(position: usize) -> Result<u32> {
    u32::try_from(position).map_err(|_| Error::TooLarge { size: position })
}

fn entry_count(dir: &IfdDirectory) -> Result<u16> {
    let count = dir.value_count();
    u16::try_from(count).map_err(|_| Error::TooLarge { size: count })
}

/// Reject blocks that cannot be encoded before any byte is written
fn check_block(dir: &IfdDirectory) -> Result<()> {
    entry_count(dir)?;
    dir.iter().try_for_each(|(_, value)| value.check_range())
}

fn element_count(value: &IfdValue) -> Result<u32> {
    let count = value.count();
    u32::try_from(count).map_err(|_| Error::TooLarge { size: count })
}

/// Assign offsets to every directory block
///
/// Sizes are taken from the tree as it is, so pointer tags for attached
/// sub-directories must already be present (see
/// [`IfdDirectory::sync_sub_pointers`]).
pub fn compute_layout(data: &ExifData) -> Result<LayoutPlan> {
    let mut cursor = HEADER_SIZE;
    let mut directories = Vec::with_capacity(data.len());

    for (name, dir) in data.directories() {
        check_block(dir)?;
        let offset = to_offset(cursor)?;
        let size = dir.block_size(true);
        cursor += size;
        let subs = place_subs(dir, &mut cursor)?;
        directories.push((name.to_string(), Placement { offset, size, subs }));
    }

    to_offset(cursor)?;
    log::debug!(
        "planned {} top-level directories, {} bytes",
        directories.len(),
        cursor
    );

    Ok(LayoutPlan {
        directories,
        total_size: cursor,
    })
}

fn place_subs(dir: &IfdDirectory, cursor: &mut usize) -> Result<Vec<(SubDirectory, Placement)>> {
    let mut subs = Vec::new();
    for (kind, sub) in dir.subs() {
        check_block(sub)?;
        let offset = to_offset(*cursor)?;
        let size = sub.block_size(false);
        *cursor += size;
        let nested = place_subs(sub, cursor)?;
        subs.push((
            kind,
            Placement {
                offset,
                size,
                subs: nested,
            },
        ));
    }
    Ok(subs)
}

/// Point every sub-directory pointer tag at its planned offset
pub fn apply_layout(data: &mut ExifData, plan: &LayoutPlan) {
    for ((_, dir), (_, placement)) in data.directories_mut().zip(&plan.directories) {
        patch_pointers(dir, &placement.subs);
    }
}

fn patch_pointers(dir: &mut IfdDirectory, subs: &[(SubDirectory, Placement)]) {
    for (kind, placement) in subs {
        dir.set_sub_pointer(*kind, placement.offset);
        if let Some(sub) = dir.lookup_sub_mut(*kind) {
            patch_pointers(sub, &placement.subs);
        }
    }
}

/// Write the header and every directory block in the output's byte order
///
/// Offsets are relative to the output position at the time of the call.
pub fn emit(data: &ExifData, plan: &LayoutPlan, out: &mut OutputBuffer) -> Result<()> {
    if data.len() != plan.directories.len() {
        return Err(Error::InvalidFormat(format!(
            "layout plan covers {} directories, tree has {}",
            plan.directories.len(),
            data.len()
        )));
    }

    let base = out.len();
    let marker: &[u8] = if out.is_big_endian() { b"MM" } else { b"II" };
    out.write_bytes(marker)?;
    out.write_u16(TIFF_MAGIC)?;
    out.write_u32(plan.first_offset())?;

    let placements = &plan.directories;
    for (index, ((_, dir), (_, placement))) in data.directories().zip(placements).enumerate() {
        let next = placements.get(index + 1).map_or(0, |(_, next)| next.offset);
        emit_block(dir, placement.offset, Some(next), out, base)?;
        emit_subs(dir, &placement.subs, out, base)?;
    }

    check_position(out, base, plan.total_size)
}

fn emit_subs(
    dir: &IfdDirectory,
    subs: &[(SubDirectory, Placement)],
    out: &mut OutputBuffer,
    base: usize,
) -> Result<()> {
    for (kind, placement) in subs {
        let sub = dir.sub(*kind).ok_or_else(|| {
            Error::InvalidFormat(format!("layout plan names a missing {} directory", kind))
        })?;
        emit_block(sub, placement.offset, None, out, base)?;
        emit_subs(sub, &placement.subs, out, base)?;
    }
    Ok(())
}

fn emit_block(
    dir: &IfdDirectory,
    offset: u32,
    next: Option<u32>,
    out: &mut OutputBuffer,
    base: usize,
) -> Result<()> {
    check_position(out, base, offset as usize)?;

    let count = entry_count(dir)?;
    out.write_u16(count)?;

    let pointer = if next.is_some() { NEXT_POINTER_SIZE } else { 0 };
    let mut overflow = offset as usize + ENTRY_COUNT_SIZE + ENTRY_SIZE * count as usize + pointer;

    for (tag, value) in dir.iter() {
        out.write_u16(tag)?;
        out.write_u16(value.kind().code())?;
        out.write_u32(element_count(value)?)?;
        let size = value.byte_size();
        if value.is_inline() {
            value.write(out)?;
            out.pad(4 - size)?;
        } else {
            out.write_u32(to_offset(overflow)?)?;
            overflow += size;
        }
    }

    if let Some(next) = next {
        out.write_u32(next)?;
    }

    for (_, value) in dir.iter().filter(|(_, value)| !value.is_inline()) {
        value.write(out)?;
    }
    Ok(())
}

fn check_position(out: &OutputBuffer, base: usize, expected: usize) -> Result<()> {
    let actual = out.len() - base;
    if actual != expected {
        return Err(Error::LayoutMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tags, value::Rational};

    fn sample() -> ExifData {
        let mut data = ExifData::new();
        let ifd0 = data.image_directory_mut();
        ifd0.set_image_width(640);
        ifd0.set_make("Canon");
        ifd0.set_resolution_x(Rational::new(72, 1));
        let exif = ifd0.sub_mut(SubDirectory::Exif);
        exif.set("ExifVersion", "0231");
        exif.set("DateTimeOriginal", "2024:01:02 03:04:05");
        exif.sub_mut(SubDirectory::Interop).set("InteropIndex", "R98");
        ifd0.sub_mut(SubDirectory::Gps).set_gps_latitude(12.5);
        data.thumbnail_directory_mut().set_image_width(160);
        data.prepare();
        data
    }

    #[test]
    fn test_layout_offsets() {
        let data = sample();
        let plan = compute_layout(&data).unwrap();
        let ifd0 = data.image_directory().unwrap();
        let ifd1 = data.thumbnail_directory().unwrap();
        let exif = data.exif_directory().unwrap();
        let interop = exif.sub(SubDirectory::Interop).unwrap();

        let p0 = plan.directory("ifd0").unwrap();
        let p1 = plan.directory("ifd1").unwrap();
        assert_eq!(p0.offset, 8);

        // ifd0's sub-directories follow its block, depth first
        let pe = p0.sub(SubDirectory::Exif).unwrap();
        let pi = pe.sub(SubDirectory::Interop).unwrap();
        let pg = p0.sub(SubDirectory::Gps).unwrap();
        assert_eq!(pe.offset as usize, 8 + ifd0.block_size(true));
        assert_eq!(pi.offset as usize, pe.offset as usize + exif.block_size(false));
        assert_eq!(pg.offset as usize, pi.offset as usize + interop.block_size(false));

        // ifd1 starts after everything ifd0 owns
        assert_eq!(p1.offset as usize, 8 + ifd0.byte_size());
        assert_eq!(
            p1.offset as usize,
            pg.offset as usize + data.gps_directory().unwrap().block_size(false)
        );
        assert_eq!(p1.size, ifd1.block_size(true));

        assert_eq!(
            plan.total_size(),
            8 + ifd0.byte_size() + ifd1.byte_size()
        );
    }

    #[test]
    fn test_emit_matches_plan() {
        let mut data = sample();
        let plan = compute_layout(&data).unwrap();
        apply_layout(&mut data, &plan);

        let exif_offset = plan.directory("ifd0").unwrap().sub(SubDirectory::Exif).unwrap().offset;
        assert_eq!(
            data.image_directory().unwrap().get(tags::EXIF_OFFSET),
            Some(&IfdValue::Long(vec![exif_offset]))
        );

        let mut out = OutputBuffer::new();
        out.set_big_endian(true);
        emit(&data, &plan, &mut out).unwrap();

        let bytes = out.as_bytes();
        assert_eq!(bytes.len(), plan.total_size());
        assert_eq!(&bytes[..8], &[b'M', b'M', 0x00, 0x2A, 0, 0, 0, 8]);
        // Entry count of ifd0
        let count = data.image_directory().unwrap().value_count() as u16;
        assert_eq!(&bytes[8..10], &count.to_be_bytes());
    }

    #[test]
    fn test_top_level_region_is_contiguous() {
        let mut data = ExifData::new();
        let ifd0 = data.image_directory_mut();
        ifd0.set_image_width(640);
        let exif = ifd0.sub_mut(SubDirectory::Exif);
        exif.set("ExifVersion", "0231");
        exif.set("DateTimeOriginal", "2024:01:02 03:04:05");
        data.thumbnail_directory_mut().set_image_width(160);
        data.prepare();

        let plan = compute_layout(&data).unwrap();
        apply_layout(&mut data, &plan);
        let mut out = OutputBuffer::new();
        out.set_big_endian(true);
        emit(&data, &plan, &mut out).unwrap();
        let bytes = out.as_bytes();

        let ifd0 = data.image_directory().unwrap();
        let ifd1_offset = 8 + ifd0.byte_size();
        assert_eq!(plan.directory("ifd1").unwrap().offset as usize, ifd1_offset);
        assert_eq!(
            plan.directory("ifd0").unwrap().sub(SubDirectory::Exif).unwrap().offset as usize,
            8 + ifd0.block_size(true)
        );

        // ifd0's next pointer sits after its two entries
        let next_at = 8 + 2 + 2 * ENTRY_SIZE;
        assert_eq!(&bytes[next_at..next_at + 4], &(ifd1_offset as u32).to_be_bytes());
        // ifd1 holds a single entry
        assert_eq!(&bytes[ifd1_offset..ifd1_offset + 2], &[0, 1]);
        assert_eq!(bytes.len(), ifd1_offset + data.thumbnail_directory().unwrap().byte_size());
    }

    #[test]
    fn test_single_directory_size() {
        let mut data = ExifData::new();
        let ifd0 = data.image_directory_mut();
        ifd0.set_image_width(100);
        ifd0.set_software("exif-io");
        ifd0.insert(0x9999, IfdValue::Double(vec![1.5, 2.5]));
        data.prepare();

        let plan = compute_layout(&data).unwrap();
        apply_layout(&mut data, &plan);
        let mut out = OutputBuffer::new();
        emit(&data, &plan, &mut out).unwrap();

        let ifd0 = data.image_directory().unwrap();
        assert_eq!(out.len() - HEADER_SIZE, ifd0.byte_size());
        assert_eq!(&out.as_bytes()[..4], b"II\x2A\x00");
    }

    #[test]
    fn test_overflow_offsets() {
        let mut data = ExifData::new();
        let ifd0 = data.image_directory_mut();
        ifd0.set_make("Canon"); // 6 bytes
        ifd0.set_model("EOS R5"); // 7 bytes
        data.prepare();

        let plan = compute_layout(&data).unwrap();
        let mut out = OutputBuffer::new();
        out.set_big_endian(true);
        emit(&data, &plan, &mut out).unwrap();
        let bytes = out.as_bytes();

        // Overflow starts after count, two entries and the next pointer
        let first = 8 + 2 + 24 + 4;
        assert_eq!(&bytes[8 + 2 + 8..8 + 2 + 12], &(first as u32).to_be_bytes());
        assert_eq!(&bytes[8 + 14 + 8..8 + 14 + 12], &(first as u32 + 6).to_be_bytes());
        assert_eq!(&bytes[first..first + 6], b"Canon\0");
        assert_eq!(&bytes[first + 6..], b"EOS R5\0");
    }

    #[test]
    fn test_drift_is_reported() {
        let mut data = ExifData::new();
        data.image_directory_mut()
            .sub_mut(SubDirectory::Exif)
            .set("ExifVersion", "0231");

        // Planning without pointer tags, then patching adds an entry
        let plan = compute_layout(&data).unwrap();
        apply_layout(&mut data, &plan);
        let mut out = OutputBuffer::new();
        let err = emit(&data, &plan, &mut out).unwrap_err();
        assert!(matches!(err, Error::LayoutMismatch { .. }));
    }

    #[test]
    fn test_plan_must_cover_tree() {
        let mut data = ExifData::new();
        data.image_directory_mut();
        let plan = compute_layout(&data).unwrap();
        data.thumbnail_directory_mut();
        let err = emit(&data, &plan, &mut OutputBuffer::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn test_out_of_range_rational_fails_planning() {
        let mut data = ExifData::new();
        data.image_directory_mut()
            .sub_mut(SubDirectory::Exif)
            .insert(tags::EXPOSURE_TIME, IfdValue::Rational(vec![Rational::new(1, 1 << 33)]));
        data.prepare();
        assert!(matches!(
            compute_layout(&data),
            Err(Error::ValueOutOfRange { kind: "rational", .. })
        ));
        assert!(matches!(data.to_bytes(), Err(Error::ValueOutOfRange { .. })));
    }

    #[test]
    fn test_offset_limit() {
        assert_eq!(to_offset(8).unwrap(), 8);
        let too_far = u32::MAX as usize + 1;
        assert!(matches!(
            to_offset(too_far),
            Err(Error::TooLarge { size }) if size == too_far
        ));
    }
}
