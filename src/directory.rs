//! Image File Directory
//!
//! An [`IfdDirectory`] is an ordered list of tagged entries plus up to three
//! nested directories reached through the well-known pointer tags:
//!
//! | sub-directory | pointer tag |
//! |---------------|-------------|
//! | `exif`        | `0x8769`    |
//! | `gps`         | `0x8825`    |
//! | `interop`     | `0xA005`    |
//!
//! Entries keep insertion order; that is the order they are written in.
//! Call [`IfdDirectory::sort_entries`] before writing for strict ascending
//! tag order.

use crate::{
    error::{Error, Result},
    tags::{self, ExifTag, TagGroup},
    value::{IfdValue, IfdValueType, Rational},
};
use std::collections::BTreeMap;
use std::fmt;

/// Size of the entry count field
pub const ENTRY_COUNT_SIZE: usize = 2;
/// Size of one directory entry
pub const ENTRY_SIZE: usize = 12;
/// Size of the next-IFD pointer
pub const NEXT_POINTER_SIZE: usize = 4;

/// Well-known nested directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubDirectory {
    /// Exif private tags
    Exif,
    /// GPS tags
    Gps,
    /// Interoperability tags
    Interop,
}

impl SubDirectory {
    /// All sub-directories in write order
    pub const ALL: [SubDirectory; 3] = [Self::Exif, Self::Gps, Self::Interop];

    /// Name used by the container (`"exif"`, `"gps"`, `"interop"`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exif => "exif",
            Self::Gps => "gps",
            Self::Interop => "interop",
        }
    }

    /// Parse a sub-directory name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Tag holding the offset of this sub-directory in its parent
    pub fn pointer_tag(&self) -> u16 {
        match self {
            Self::Exif => tags::EXIF_OFFSET,
            Self::Gps => tags::GPS_OFFSET,
            Self::Interop => tags::INTEROP_OFFSET,
        }
    }

    /// Tag namespace of the sub-directory's entries
    pub fn group(&self) -> TagGroup {
        match self {
            Self::Exif => TagGroup::Exif,
            Self::Gps => TagGroup::Gps,
            Self::Interop => TagGroup::Interop,
        }
    }
}

impl fmt::Display for SubDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tagged entry
///
/// `value` is `None` when the entry was present on disk but its payload could
/// not be decoded (unknown type, or data outside the buffer).
#[derive(Debug, Clone, PartialEq)]
pub struct IfdEntry {
    pub tag: u16,
    pub value: Option<IfdValue>,
}

/// Tag reference by numeric ID or registry name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKey<'a> {
    Id(u16),
    Name(&'a str),
}

impl From<u16> for TagKey<'_> {
    fn from(id: u16) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a str> for TagKey<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for TagKey<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for TagKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "0x{:04X}", id),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Loosely typed setter input
///
/// Anything other than [`TagInput::Value`] is coerced to the element type
/// the registry lists for the tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TagInput {
    /// Already typed, stored as-is
    Value(IfdValue),
    Int(i64),
    Float(f64),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Rational(Rational),
    Rationals(Vec<Rational>),
    Text(String),
    Bytes(Vec<u8>),
}

macro_rules! int_inputs {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TagInput {
                fn from(value: $ty) -> Self {
                    Self::Int(value as i64)
                }
            }

            impl From<Vec<$ty>> for TagInput {
                fn from(values: Vec<$ty>) -> Self {
                    Self::Ints(values.into_iter().map(|v| v as i64).collect())
                }
            }

            impl From<&[$ty]> for TagInput {
                fn from(values: &[$ty]) -> Self {
                    Self::Ints(values.iter().map(|&v| v as i64).collect())
                }
            }

            impl<const N: usize> From<[$ty; N]> for TagInput {
                fn from(values: [$ty; N]) -> Self {
                    Self::Ints(values.iter().map(|&v| v as i64).collect())
                }
            }
        )*
    };
}

int_inputs!(u16, u32, i8, i16, i32, i64);

impl From<u8> for TagInput {
    fn from(value: u8) -> Self {
        Self::Int(value as i64)
    }
}

impl From<Vec<u8>> for TagInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for TagInput {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for TagInput {
    fn from(bytes: [u8; N]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<f32> for TagInput {
    fn from(value: f32) -> Self {
        Self::Float(value as f64)
    }
}

impl From<f64> for TagInput {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<f64>> for TagInput {
    fn from(values: Vec<f64>) -> Self {
        Self::Floats(values)
    }
}

impl From<IfdValue> for TagInput {
    fn from(value: IfdValue) -> Self {
        Self::Value(value)
    }
}

impl From<Rational> for TagInput {
    fn from(value: Rational) -> Self {
        Self::Rational(value)
    }
}

impl From<Vec<Rational>> for TagInput {
    fn from(values: Vec<Rational>) -> Self {
        Self::Rationals(values)
    }
}

impl From<(u32, u32)> for TagInput {
    fn from(pair: (u32, u32)) -> Self {
        Self::Rational(pair.into())
    }
}

impl From<(i32, i32)> for TagInput {
    fn from(pair: (i32, i32)) -> Self {
        Self::Rational(pair.into())
    }
}

impl From<Vec<(u32, u32)>> for TagInput {
    fn from(pairs: Vec<(u32, u32)>) -> Self {
        Self::Rationals(pairs.into_iter().map(Rational::from).collect())
    }
}

impl From<&str> for TagInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TagInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Ordered tag map with nested Exif/GPS/Interop directories
#[derive(Debug, Clone, PartialEq)]
pub struct IfdDirectory {
    group: TagGroup,
    entries: Vec<IfdEntry>,
    sub: BTreeMap<SubDirectory, IfdDirectory>,
}

impl Default for IfdDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl IfdDirectory {
    /// Create an empty top-level directory
    pub fn new() -> Self {
        Self::with_group(TagGroup::Image)
    }

    /// Create an empty directory whose tag IDs are read in `group`
    pub fn with_group(group: TagGroup) -> Self {
        Self {
            group,
            entries: Vec::new(),
            sub: BTreeMap::new(),
        }
    }

    /// Tag namespace of this directory
    pub fn group(&self) -> TagGroup {
        self.group
    }

    /// Number of entries, including entries without a decoded value
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries and every sub-directory is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.sub.values().all(IfdDirectory::is_empty)
    }

    /// All entries in write order
    pub fn entries(&self) -> &[IfdEntry] {
        &self.entries
    }

    /// `(tag, value)` pairs in write order, skipping entries without a value
    pub fn iter(&self) -> impl Iterator<Item = (u16, &IfdValue)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.value.as_ref().map(|value| (entry.tag, value)))
    }

    /// Tag IDs in write order
    pub fn tags(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.iter().map(|entry| entry.tag)
    }

    /// Registry entry for a tag ID as interpreted in this directory
    pub fn tag_info(&self, tag: u16) -> Option<&'static ExifTag> {
        tags::lookup(self.group, tag)
    }

    fn resolve(&self, key: TagKey) -> Option<(u16, Option<&'static ExifTag>)> {
        match key {
            TagKey::Id(id) => Some((id, self.tag_info(id))),
            TagKey::Name(name) => {
                tags::lookup_name_in(self.group, name).map(|tag| (tag.id, Some(tag)))
            }
        }
    }

    fn position(&self, tag: u16) -> Option<usize> {
        self.entries.iter().position(|entry| entry.tag == tag)
    }

    /// Check whether a tag is present (with or without a value)
    pub fn has<'a>(&self, key: impl Into<TagKey<'a>>) -> bool {
        self.get_entry(key).is_some()
    }

    /// Entry for a tag, distinguishing "absent" from "present without value"
    pub fn get_entry<'a>(&self, key: impl Into<TagKey<'a>>) -> Option<&IfdEntry> {
        let (tag, _) = self.resolve(key.into())?;
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    /// Value of a tag
    pub fn get<'a>(&self, key: impl Into<TagKey<'a>>) -> Option<&IfdValue> {
        self.get_entry(key)?.value.as_ref()
    }

    /// Mutable value of a tag
    pub fn get_mut<'a>(&mut self, key: impl Into<TagKey<'a>>) -> Option<&mut IfdValue> {
        let (tag, _) = self.resolve(key.into())?;
        self.entries
            .iter_mut()
            .find(|entry| entry.tag == tag)?
            .value
            .as_mut()
    }

    /// Set a tag, coercing untyped input through the registry
    ///
    /// Returns `false` and leaves the directory unchanged when the name is
    /// unknown or the input does not fit the tag's registered type. Use
    /// [`IfdDirectory::try_set`] to get the reason.
    pub fn set<'a>(&mut self, key: impl Into<TagKey<'a>>, input: impl Into<TagInput>) -> bool {
        match self.try_set(key, input) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("ignoring tag update: {}", e);
                false
            }
        }
    }

    /// Strict variant of [`IfdDirectory::set`]
    pub fn try_set<'a>(
        &mut self,
        key: impl Into<TagKey<'a>>,
        input: impl Into<TagInput>,
    ) -> Result<()> {
        let key = key.into();
        let (tag, info) = self
            .resolve(key)
            .ok_or_else(|| Error::UnknownTag(key.to_string()))?;

        let value = match input.into() {
            TagInput::Value(value) => value,
            input => {
                let info = info.ok_or_else(|| Error::UnknownTag(key.to_string()))?;
                coerce(info, input).ok_or(Error::TagCoercion {
                    tag,
                    kind: info.kind.name(),
                })?
            }
        };
        self.insert(tag, value);
        Ok(())
    }

    /// Store a typed value, replacing any existing entry in place
    pub fn insert(&mut self, tag: u16, value: IfdValue) {
        self.insert_entry(IfdEntry {
            tag,
            value: Some(value),
        });
    }

    pub(crate) fn insert_entry(&mut self, entry: IfdEntry) {
        match self.position(entry.tag) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove a tag
    pub fn remove<'a>(&mut self, key: impl Into<TagKey<'a>>) -> Option<IfdEntry> {
        let (tag, _) = self.resolve(key.into())?;
        let index = self.position(tag)?;
        Some(self.entries.remove(index))
    }

    /// Remove all entries and sub-directories
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sub.clear();
    }

    /// Reorder entries by ascending tag ID, recursively
    pub fn sort_entries(&mut self) {
        self.entries.sort_by_key(|entry| entry.tag);
        self.sub.values_mut().for_each(IfdDirectory::sort_entries);
    }

    /// Deep-copy every entry and sub-directory of `other` into this directory
    pub fn copy_from(&mut self, other: &IfdDirectory) {
        for entry in &other.entries {
            self.insert_entry(entry.clone());
        }
        for (kind, sub) in &other.sub {
            self.sub_mut(*kind).copy_from(sub);
        }
    }

    // -------------------------------------------------------------------------
    // Sub-directories
    // -------------------------------------------------------------------------

    /// Nested directory, if present
    pub fn sub(&self, kind: SubDirectory) -> Option<&IfdDirectory> {
        self.sub.get(&kind)
    }

    /// Nested directory, created empty if absent
    pub fn sub_mut(&mut self, kind: SubDirectory) -> &mut IfdDirectory {
        self.sub
            .entry(kind)
            .or_insert_with(|| IfdDirectory::with_group(kind.group()))
    }

    /// Nested directory without creating it
    pub fn lookup_sub_mut(&mut self, kind: SubDirectory) -> Option<&mut IfdDirectory> {
        self.sub.get_mut(&kind)
    }

    /// Nested directory by name (`"exif"`, `"gps"`, `"interop"`)
    pub fn sub_by_name(&self, name: &str) -> Option<&IfdDirectory> {
        self.sub(SubDirectory::from_name(name)?)
    }

    /// Check whether a nested directory is present
    pub fn has_sub(&self, kind: SubDirectory) -> bool {
        self.sub.contains_key(&kind)
    }

    /// Attach a nested directory, returning the one it replaces
    pub fn insert_sub(&mut self, kind: SubDirectory, directory: IfdDirectory) -> Option<IfdDirectory> {
        self.sub.insert(kind, directory)
    }

    /// Detach a nested directory
    pub fn remove_sub(&mut self, kind: SubDirectory) -> Option<IfdDirectory> {
        self.sub.remove(&kind)
    }

    /// Nested directories in write order
    pub fn subs(&self) -> impl Iterator<Item = (SubDirectory, &IfdDirectory)> {
        self.sub.iter().map(|(kind, sub)| (*kind, sub))
    }

    /// Make the pointer tags match the attached sub-directories
    ///
    /// Every present sub-directory gets a single-element LONG placeholder
    /// unless it already has a one-offset pointer; pointers to absent
    /// sub-directories are dropped. Applies recursively.
    pub fn sync_sub_pointers(&mut self) {
        for kind in SubDirectory::ALL {
            let tag = kind.pointer_tag();
            if self.has_sub(kind) {
                let valid = match self.get(tag) {
                    Some(IfdValue::Long(offsets)) => offsets.len() == 1,
                    Some(IfdValue::Ifd(_)) => true,
                    _ => false,
                };
                if !valid {
                    self.insert(tag, IfdValue::Long(vec![0]));
                }
            } else if self.position(tag).is_some() {
                self.remove(tag);
            }
        }
        self.sub.values_mut().for_each(IfdDirectory::sync_sub_pointers);
    }

    /// Point the sub-directory pointer for `kind` at `offset`
    pub(crate) fn set_sub_pointer(&mut self, kind: SubDirectory, offset: u32) {
        let value = match self.get(kind.pointer_tag()) {
            Some(IfdValue::Ifd(_)) => IfdValue::Ifd(offset),
            _ => IfdValue::Long(vec![offset]),
        };
        self.insert(kind.pointer_tag(), value);
    }

    // -------------------------------------------------------------------------
    // Size accounting
    // -------------------------------------------------------------------------

    /// Number of entries that will be written (entries with a value)
    pub fn value_count(&self) -> usize {
        self.iter().count()
    }

    /// Bytes of values too large to be stored inline
    pub fn overflow_size(&self) -> usize {
        self.iter()
            .map(|(_, value)| value.byte_size())
            .filter(|&size| size > 4)
            .sum()
    }

    /// Size of this directory's own block: count, entries, optional next
    /// pointer and overflow data
    pub fn block_size(&self, next_pointer: bool) -> usize {
        let pointer = if next_pointer { NEXT_POINTER_SIZE } else { 0 };
        ENTRY_COUNT_SIZE + ENTRY_SIZE * self.value_count() + pointer + self.overflow_size()
    }

    /// Total bytes written for this directory as a top-level IFD, including
    /// all nested directories
    pub fn byte_size(&self) -> usize {
        self.block_size(true) + self.nested_size()
    }

    /// Bytes written for the nested directories
    fn nested_size(&self) -> usize {
        self.sub
            .values()
            .map(|sub| sub.block_size(false) + sub.nested_size())
            .sum()
    }

    // -------------------------------------------------------------------------
    // Typed accessors
    // -------------------------------------------------------------------------

    fn int_tag(&self, tag: u16) -> Option<i64> {
        self.get(tag).map(|value| value.to_int(0))
    }

    fn text_tag(&self, tag: u16) -> Option<String> {
        self.get(tag).map(IfdValue::to_text)
    }

    fn set_dimension(&mut self, tag: u16, value: u32) {
        let value = match u16::try_from(value) {
            Ok(short) => IfdValue::Short(vec![short]),
            Err(_) => IfdValue::Long(vec![value]),
        };
        self.insert(tag, value);
    }

    /// ImageWidth
    pub fn image_width(&self) -> Option<u32> {
        self.int_tag(tags::IMAGE_WIDTH).map(|v| v as u32)
    }

    /// Set ImageWidth (SHORT, or LONG above 65535)
    pub fn set_image_width(&mut self, width: u32) {
        self.set_dimension(tags::IMAGE_WIDTH, width);
    }

    /// ImageHeight
    pub fn image_height(&self) -> Option<u32> {
        self.int_tag(tags::IMAGE_HEIGHT).map(|v| v as u32)
    }

    /// Set ImageHeight (SHORT, or LONG above 65535)
    pub fn set_image_height(&mut self, height: u32) {
        self.set_dimension(tags::IMAGE_HEIGHT, height);
    }

    /// Orientation (1-8, where 1 is normal)
    pub fn orientation(&self) -> Option<u16> {
        self.int_tag(tags::ORIENTATION).map(|v| v as u16)
    }

    pub fn set_orientation(&mut self, orientation: u16) {
        self.insert(tags::ORIENTATION, IfdValue::Short(vec![orientation]));
    }

    /// XResolution
    pub fn resolution_x(&self) -> Option<Rational> {
        self.get(tags::X_RESOLUTION).map(|value| value.to_rational(0))
    }

    pub fn set_resolution_x(&mut self, resolution: impl Into<Rational>) {
        self.insert(tags::X_RESOLUTION, IfdValue::Rational(vec![resolution.into()]));
    }

    /// YResolution
    pub fn resolution_y(&self) -> Option<Rational> {
        self.get(tags::Y_RESOLUTION).map(|value| value.to_rational(0))
    }

    pub fn set_resolution_y(&mut self, resolution: impl Into<Rational>) {
        self.insert(tags::Y_RESOLUTION, IfdValue::Rational(vec![resolution.into()]));
    }

    /// ResolutionUnit (1 = none, 2 = inch, 3 = centimeter)
    pub fn resolution_unit(&self) -> Option<u16> {
        self.int_tag(tags::RESOLUTION_UNIT).map(|v| v as u16)
    }

    pub fn set_resolution_unit(&mut self, unit: u16) {
        self.insert(tags::RESOLUTION_UNIT, IfdValue::Short(vec![unit]));
    }

    /// Check for a UserComment entry
    pub fn has_user_comment(&self) -> bool {
        self.has(tags::USER_COMMENT)
    }

    /// Decimal latitude from GPSLatitude/GPSLatitudeRef, negative for south
    pub fn gps_latitude(&self) -> Option<f64> {
        self.gps_coordinate(tags::GPS_LATITUDE, tags::GPS_LATITUDE_REF, 'S')
    }

    /// Store a decimal latitude as degrees/minutes/seconds
    pub fn set_gps_latitude(&mut self, latitude: f64) {
        let reference = if latitude < 0.0 { "S" } else { "N" };
        self.set_gps_coordinate(tags::GPS_LATITUDE, tags::GPS_LATITUDE_REF, reference, latitude);
    }

    /// Decimal longitude from GPSLongitude/GPSLongitudeRef, negative for west
    pub fn gps_longitude(&self) -> Option<f64> {
        self.gps_coordinate(tags::GPS_LONGITUDE, tags::GPS_LONGITUDE_REF, 'W')
    }

    /// Store a decimal longitude as degrees/minutes/seconds
    pub fn set_gps_longitude(&mut self, longitude: f64) {
        let reference = if longitude < 0.0 { "W" } else { "E" };
        self.set_gps_coordinate(tags::GPS_LONGITUDE, tags::GPS_LONGITUDE_REF, reference, longitude);
    }

    fn gps_coordinate(&self, tag: u16, reference_tag: u16, negative: char) -> Option<f64> {
        let value = self.get(tag)?;
        if value.count() < 3 {
            return None;
        }
        let degrees =
            value.to_double(0) + value.to_double(1) / 60.0 + value.to_double(2) / 3600.0;
        let reference = self.text_tag(reference_tag).unwrap_or_default();
        if reference.starts_with(negative) {
            Some(-degrees)
        } else {
            Some(degrees)
        }
    }

    fn set_gps_coordinate(&mut self, tag: u16, reference_tag: u16, reference: &str, value: f64) {
        let value = value.abs();
        let degrees = value.trunc();
        let minutes = ((value - degrees) * 60.0).trunc();
        let seconds = (value - degrees - minutes / 60.0) * 3600.0;
        self.insert(reference_tag, IfdValue::ascii(reference));
        self.insert(
            tag,
            IfdValue::Rational(vec![
                Rational::new(degrees as i64, 1),
                Rational::new(minutes as i64, 1),
                Rational::new((seconds * 1000.0).round() as i64, 1000),
            ]),
        );
    }
}

macro_rules! text_accessors {
    ($($get:ident, $set:ident, $tag:path, $doc:literal;)*) => {
        impl IfdDirectory {
            $(
                #[doc = $doc]
                pub fn $get(&self) -> Option<String> {
                    self.text_tag($tag)
                }

                #[doc = concat!("Set ", $doc)]
                pub fn $set(&mut self, text: &str) {
                    self.insert($tag, IfdValue::ascii(text));
                }
            )*
        }
    };
}

text_accessors! {
    image_description, set_image_description, tags::IMAGE_DESCRIPTION, "ImageDescription";
    make, set_make, tags::MAKE, "Make (camera manufacturer)";
    model, set_model, tags::MODEL, "Model (camera model)";
    software, set_software, tags::SOFTWARE, "Software";
    date_time, set_date_time, tags::DATE_TIME, "DateTime (`YYYY:MM:DD HH:MM:SS`)";
    artist, set_artist, tags::ARTIST, "Artist";
    copyright, set_copyright, tags::COPYRIGHT, "Copyright";
}

/// Coerce loosely typed input to the registered type of `info`
fn coerce(info: &ExifTag, input: TagInput) -> Option<IfdValue> {
    use IfdValueType as T;

    Some(match info.kind {
        T::Ascii => match input {
            TagInput::Text(text) => IfdValue::ascii(&text),
            _ => return None,
        },
        T::Undefined => match input {
            TagInput::Text(text) => IfdValue::Undefined(text.into_bytes()),
            TagInput::Bytes(bytes) => IfdValue::Undefined(bytes),
            other => IfdValue::Undefined(narrow(int_list(other)?)?),
        },
        T::Byte => match input {
            TagInput::Bytes(bytes) => IfdValue::Byte(bytes),
            other => IfdValue::Byte(narrow(int_list(other)?)?),
        },
        T::SByte => IfdValue::SByte(narrow(int_list(input)?)?),
        T::Short => IfdValue::Short(narrow(int_list(input)?)?),
        T::SShort => IfdValue::SShort(narrow(int_list(input)?)?),
        T::Long => IfdValue::Long(narrow(int_list(input)?)?),
        T::SLong => IfdValue::SLong(narrow(int_list(input)?)?),
        T::Single => IfdValue::Single(float_list(input)?.into_iter().map(|v| v as f32).collect()),
        T::Double => IfdValue::Double(float_list(input)?),
        T::Rational => {
            let values = rational_list(input, info.count)?;
            values
                .iter()
                .all(|r| fits::<u32>(r.numerator) && fits::<u32>(r.denominator))
                .then_some(IfdValue::Rational(values))?
        }
        T::SRational => {
            let values = rational_list(input, info.count)?;
            values
                .iter()
                .all(|r| fits::<i32>(r.numerator) && fits::<i32>(r.denominator))
                .then_some(IfdValue::SRational(values))?
        }
        T::Ifd => match input {
            TagInput::Int(offset) => IfdValue::Ifd(u32::try_from(offset).ok()?),
            _ => return None,
        },
    })
}

fn fits<T: TryFrom<i64>>(value: i64) -> bool {
    T::try_from(value).is_ok()
}

fn narrow<T: TryFrom<i64>>(values: Vec<i64>) -> Option<Vec<T>> {
    values.into_iter().map(|v| T::try_from(v).ok()).collect()
}

fn int_list(input: TagInput) -> Option<Vec<i64>> {
    match input {
        TagInput::Int(value) => Some(vec![value]),
        TagInput::Ints(values) => Some(values),
        TagInput::Bytes(bytes) => Some(bytes.into_iter().map(i64::from).collect()),
        _ => None,
    }
}

fn float_list(input: TagInput) -> Option<Vec<f64>> {
    match input {
        TagInput::Float(value) => Some(vec![value]),
        TagInput::Floats(values) => Some(values),
        TagInput::Int(value) => Some(vec![value as f64]),
        TagInput::Ints(values) => Some(values.into_iter().map(|v| v as f64).collect()),
        _ => None,
    }
}

/// Rationals from a `Rational`, a list of them, or flat `[n, d, n, d, ...]`
/// integers (one pair, or one pair per registered element)
fn rational_list(input: TagInput, count: u32) -> Option<Vec<Rational>> {
    match input {
        TagInput::Rational(value) => Some(vec![value]),
        TagInput::Rationals(values) => Some(values),
        TagInput::Int(value) => Some(vec![Rational::new(value, 1)]),
        TagInput::Ints(values) => {
            let pairs = values.len() / 2;
            if values.len() % 2 != 0 || (pairs != 1 && pairs != count as usize) {
                return None;
            }
            Some(
                values
                    .chunks_exact(2)
                    .map(|pair| Rational::new(pair[0], pair[1]))
                    .collect(),
            )
        }
        _ => None,
    }
}
