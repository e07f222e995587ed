//! TIFF/EXIF tag registry
//!
//! Static tables mapping tag IDs to canonical names and to the element type
//! and count the EXIF 2.32 / TIFF 6.0 specifications prescribe. The tables are
//! split by directory because GPS and Interoperability tags reuse small IDs
//! (e.g. 0x0001 is `GPSLatitudeRef` in a GPS IFD and `InteropIndex` in an
//! Interop IFD). IFD0/IFD1 and Exif IFD tags never collide and share one
//! namespace.

use crate::value::IfdValueType::{self, *};

// IFD0 (main image) tags
pub const IMAGE_WIDTH: u16 = 0x0100;
pub const IMAGE_HEIGHT: u16 = 0x0101;
pub const BITS_PER_SAMPLE: u16 = 0x0102;
pub const COMPRESSION: u16 = 0x0103;
pub const PHOTOMETRIC_INTERPRETATION: u16 = 0x0106;
pub const IMAGE_DESCRIPTION: u16 = 0x010E;
pub const MAKE: u16 = 0x010F;
pub const MODEL: u16 = 0x0110;
pub const STRIP_OFFSETS: u16 = 0x0111;
pub const ORIENTATION: u16 = 0x0112;
pub const SAMPLES_PER_PIXEL: u16 = 0x0115;
pub const ROWS_PER_STRIP: u16 = 0x0116;
pub const STRIP_BYTE_COUNTS: u16 = 0x0117;
pub const X_RESOLUTION: u16 = 0x011A;
pub const Y_RESOLUTION: u16 = 0x011B;
pub const RESOLUTION_UNIT: u16 = 0x0128;
pub const SOFTWARE: u16 = 0x0131;
pub const DATE_TIME: u16 = 0x0132;
pub const ARTIST: u16 = 0x013B;
pub const COPYRIGHT: u16 = 0x8298;

// Sub-IFD pointers
pub const EXIF_OFFSET: u16 = 0x8769;
pub const GPS_OFFSET: u16 = 0x8825;
pub const INTEROP_OFFSET: u16 = 0xA005;

// IFD1 (thumbnail) tags
pub const JPEG_INTERCHANGE_FORMAT: u16 = 0x0201;
pub const JPEG_INTERCHANGE_FORMAT_LENGTH: u16 = 0x0202;

// EXIF sub-IFD tags
pub const EXPOSURE_TIME: u16 = 0x829A;
pub const F_NUMBER: u16 = 0x829D;
pub const ISO_SPEED: u16 = 0x8827;
pub const EXIF_VERSION: u16 = 0x9000;
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const FOCAL_LENGTH: u16 = 0x920A;
pub const USER_COMMENT: u16 = 0x9286;

// GPS sub-IFD tags
pub const GPS_LATITUDE_REF: u16 = 0x0001;
pub const GPS_LATITUDE: u16 = 0x0002;
pub const GPS_LONGITUDE_REF: u16 = 0x0003;
pub const GPS_LONGITUDE: u16 = 0x0004;

/// Which directory a tag ID is interpreted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagGroup {
    /// IFD0, IFD1 and any further chained IFD
    Image,
    /// Exif sub-IFD
    Exif,
    /// GPS sub-IFD
    Gps,
    /// Interoperability sub-IFD
    Interop,
}

impl TagGroup {
    /// Lower-case group name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Exif => "exif",
            Self::Gps => "gps",
            Self::Interop => "interop",
        }
    }

    fn tables(self) -> &'static [&'static [ExifTag]] {
        match self {
            Self::Image | Self::Exif => &[IMAGE_TAGS, EXIF_TAGS],
            Self::Gps => &[GPS_TAGS],
            Self::Interop => &[INTEROP_TAGS],
        }
    }
}

/// Registry entry for a known tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExifTag {
    /// Tag ID
    pub id: u16,
    /// Canonical name (e.g. `"ImageWidth"`)
    pub name: &'static str,
    /// Element type the specification prescribes
    pub kind: IfdValueType,
    /// Element count, 0 when variable
    pub count: u32,
    /// Directory the tag belongs to
    pub group: TagGroup,
}

const fn tag(id: u16, name: &'static str, kind: IfdValueType, count: u32) -> ExifTag {
    ExifTag {
        id,
        name,
        kind,
        count,
        group: TagGroup::Image,
    }
}

const fn exif(id: u16, name: &'static str, kind: IfdValueType, count: u32) -> ExifTag {
    ExifTag {
        group: TagGroup::Exif,
        ..tag(id, name, kind, count)
    }
}

const fn gps(id: u16, name: &'static str, kind: IfdValueType, count: u32) -> ExifTag {
    ExifTag {
        group: TagGroup::Gps,
        ..tag(id, name, kind, count)
    }
}

const fn interop(id: u16, name: &'static str, kind: IfdValueType, count: u32) -> ExifTag {
    ExifTag {
        group: TagGroup::Interop,
        ..tag(id, name, kind, count)
    }
}

/// Look up a tag by ID as interpreted in `group`
pub fn lookup(group: TagGroup, id: u16) -> Option<&'static ExifTag> {
    group
        .tables()
        .iter()
        .flat_map(|table| table.iter())
        .find(|tag| tag.id == id)
}

/// Look up a tag by its canonical name
pub fn lookup_name(name: &str) -> Option<&'static ExifTag> {
    [IMAGE_TAGS, EXIF_TAGS, GPS_TAGS, INTEROP_TAGS]
        .into_iter()
        .flatten()
        .find(|tag| tag.name == name)
}

/// Look up a tag by name among the tags a directory of `group` can hold
///
/// Image and Exif directories share one namespace.
pub fn lookup_name_in(group: TagGroup, name: &str) -> Option<&'static ExifTag> {
    group
        .tables()
        .iter()
        .flat_map(|table| table.iter())
        .find(|tag| tag.name == name)
}

/// Canonical name of a tag, if registered
pub fn tag_name(group: TagGroup, id: u16) -> Option<&'static str> {
    lookup(group, id).map(|tag| tag.name)
}

/// All registered tags of a group
pub fn tags(group: TagGroup) -> impl Iterator<Item = &'static ExifTag> {
    group
        .tables()
        .iter()
        .flat_map(|table| table.iter())
        .filter(move |tag| tag.group == group)
}

const IMAGE_TAGS: &[ExifTag] = &[
    tag(0x00FE, "NewSubfileType", Long, 1),
    tag(0x00FF, "SubfileType", Short, 1),
    tag(IMAGE_WIDTH, "ImageWidth", Short, 1),
    tag(IMAGE_HEIGHT, "ImageHeight", Short, 1),
    tag(BITS_PER_SAMPLE, "BitsPerSample", Short, 3),
    tag(COMPRESSION, "Compression", Short, 1),
    tag(PHOTOMETRIC_INTERPRETATION, "PhotometricInterpretation", Short, 1),
    tag(0x0107, "Thresholding", Short, 1),
    tag(0x0108, "CellWidth", Short, 1),
    tag(0x0109, "CellLength", Short, 1),
    tag(0x010A, "FillOrder", Short, 1),
    tag(0x010D, "DocumentName", Ascii, 0),
    tag(IMAGE_DESCRIPTION, "ImageDescription", Ascii, 0),
    tag(MAKE, "Make", Ascii, 0),
    tag(MODEL, "Model", Ascii, 0),
    tag(STRIP_OFFSETS, "StripOffsets", Long, 0),
    tag(ORIENTATION, "Orientation", Short, 1),
    tag(SAMPLES_PER_PIXEL, "SamplesPerPixel", Short, 1),
    tag(ROWS_PER_STRIP, "RowsPerStrip", Long, 1),
    tag(STRIP_BYTE_COUNTS, "StripByteCounts", Long, 0),
    tag(0x0118, "MinSampleValue", Short, 1),
    tag(0x0119, "MaxSampleValue", Short, 1),
    tag(X_RESOLUTION, "XResolution", Rational, 1),
    tag(Y_RESOLUTION, "YResolution", Rational, 1),
    tag(0x011C, "PlanarConfiguration", Short, 1),
    tag(0x011D, "PageName", Ascii, 0),
    tag(0x011E, "XPosition", Rational, 1),
    tag(0x011F, "YPosition", Rational, 1),
    tag(0x0122, "GrayResponseUnit", Short, 1),
    tag(0x0123, "GrayResponseCurve", Short, 0),
    tag(0x0124, "T4Options", Long, 1),
    tag(0x0125, "T6Options", Long, 1),
    tag(RESOLUTION_UNIT, "ResolutionUnit", Short, 1),
    tag(0x0129, "PageNumber", Short, 2),
    tag(0x012D, "TransferFunction", Short, 768),
    tag(SOFTWARE, "Software", Ascii, 0),
    tag(DATE_TIME, "DateTime", Ascii, 20),
    tag(ARTIST, "Artist", Ascii, 0),
    tag(0x013C, "HostComputer", Ascii, 0),
    tag(0x013D, "Predictor", Short, 1),
    tag(0x013E, "WhitePoint", Rational, 2),
    tag(0x013F, "PrimaryChromaticities", Rational, 6),
    tag(0x0140, "ColorMap", Short, 0),
    tag(0x0141, "HalftoneHints", Short, 2),
    tag(0x0142, "TileWidth", Long, 1),
    tag(0x0143, "TileLength", Long, 1),
    tag(0x0144, "TileOffsets", Long, 0),
    tag(0x0145, "TileByteCounts", Long, 0),
    tag(0x014A, "SubIFDs", Long, 0),
    tag(0x014C, "InkSet", Short, 1),
    tag(0x0151, "TargetPrinter", Ascii, 0),
    tag(0x0152, "ExtraSamples", Short, 0),
    tag(0x0153, "SampleFormat", Short, 1),
    tag(0x015B, "JPEGTables", Undefined, 0),
    tag(JPEG_INTERCHANGE_FORMAT, "JPEGInterchangeFormat", Long, 1),
    tag(JPEG_INTERCHANGE_FORMAT_LENGTH, "JPEGInterchangeFormatLength", Long, 1),
    tag(0x0211, "YCbCrCoefficients", Rational, 3),
    tag(0x0212, "YCbCrSubSampling", Short, 2),
    tag(0x0213, "YCbCrPositioning", Short, 1),
    tag(0x0214, "ReferenceBlackWhite", Rational, 6),
    tag(0x02BC, "ApplicationNotes", Byte, 0),
    tag(0x4746, "Rating", Short, 1),
    tag(0x4749, "RatingPercent", Short, 1),
    tag(COPYRIGHT, "Copyright", Ascii, 0),
    tag(0x83BB, "IPTC-NAA", Long, 0),
    tag(EXIF_OFFSET, "ExifOffset", Long, 1),
    tag(0x8773, "ICC_Profile", Undefined, 0),
    tag(GPS_OFFSET, "GPSOffset", Long, 1),
    tag(0x9C9B, "XPTitle", Byte, 0),
    tag(0x9C9C, "XPComment", Byte, 0),
    tag(0x9C9D, "XPAuthor", Byte, 0),
    tag(0x9C9E, "XPKeywords", Byte, 0),
    tag(0x9C9F, "XPSubject", Byte, 0),
    tag(0xC4A5, "PrintImageMatching", Undefined, 0),
];

const EXIF_TAGS: &[ExifTag] = &[
    exif(EXPOSURE_TIME, "ExposureTime", Rational, 1),
    exif(F_NUMBER, "FNumber", Rational, 1),
    exif(0x8822, "ExposureProgram", Short, 1),
    exif(0x8824, "SpectralSensitivity", Ascii, 0),
    exif(ISO_SPEED, "ISOSpeedRatings", Short, 0),
    exif(0x8828, "OECF", Undefined, 0),
    exif(0x8830, "SensitivityType", Short, 1),
    exif(0x8831, "StandardOutputSensitivity", Long, 1),
    exif(0x8832, "RecommendedExposureIndex", Long, 1),
    exif(EXIF_VERSION, "ExifVersion", Undefined, 4),
    exif(DATE_TIME_ORIGINAL, "DateTimeOriginal", Ascii, 20),
    exif(0x9004, "DateTimeDigitized", Ascii, 20),
    exif(0x9010, "OffsetTime", Ascii, 7),
    exif(0x9011, "OffsetTimeOriginal", Ascii, 7),
    exif(0x9012, "OffsetTimeDigitized", Ascii, 7),
    exif(0x9101, "ComponentsConfiguration", Undefined, 4),
    exif(0x9102, "CompressedBitsPerPixel", Rational, 1),
    exif(0x9201, "ShutterSpeedValue", SRational, 1),
    exif(0x9202, "ApertureValue", Rational, 1),
    exif(0x9203, "BrightnessValue", SRational, 1),
    exif(0x9204, "ExposureBiasValue", SRational, 1),
    exif(0x9205, "MaxApertureValue", Rational, 1),
    exif(0x9206, "SubjectDistance", Rational, 1),
    exif(0x9207, "MeteringMode", Short, 1),
    exif(0x9208, "LightSource", Short, 1),
    exif(0x9209, "Flash", Short, 1),
    exif(FOCAL_LENGTH, "FocalLength", Rational, 1),
    exif(0x9214, "SubjectArea", Short, 0),
    exif(0x927C, "MakerNote", Undefined, 0),
    exif(USER_COMMENT, "UserComment", Undefined, 0),
    exif(0x9290, "SubSecTime", Ascii, 0),
    exif(0x9291, "SubSecTimeOriginal", Ascii, 0),
    exif(0x9292, "SubSecTimeDigitized", Ascii, 0),
    exif(0xA000, "FlashpixVersion", Undefined, 4),
    exif(0xA001, "ColorSpace", Short, 1),
    exif(0xA002, "ExifImageWidth", Short, 1),
    exif(0xA003, "ExifImageHeight", Short, 1),
    exif(0xA004, "RelatedSoundFile", Ascii, 13),
    exif(INTEROP_OFFSET, "InteropOffset", Long, 1),
    exif(0xA20B, "FlashEnergy", Rational, 1),
    exif(0xA20C, "SpatialFrequencyResponse", Undefined, 0),
    exif(0xA20E, "FocalPlaneXResolution", Rational, 1),
    exif(0xA20F, "FocalPlaneYResolution", Rational, 1),
    exif(0xA210, "FocalPlaneResolutionUnit", Short, 1),
    exif(0xA214, "SubjectLocation", Short, 2),
    exif(0xA215, "ExposureIndex", Rational, 1),
    exif(0xA217, "SensingMethod", Short, 1),
    exif(0xA300, "FileSource", Undefined, 1),
    exif(0xA301, "SceneType", Undefined, 1),
    exif(0xA302, "CFAPattern", Undefined, 0),
    exif(0xA401, "CustomRendered", Short, 1),
    exif(0xA402, "ExposureMode", Short, 1),
    exif(0xA403, "WhiteBalance", Short, 1),
    exif(0xA404, "DigitalZoomRatio", Rational, 1),
    exif(0xA405, "FocalLengthIn35mmFilm", Short, 1),
    exif(0xA406, "SceneCaptureType", Short, 1),
    exif(0xA407, "GainControl", Short, 1),
    exif(0xA408, "Contrast", Short, 1),
    exif(0xA409, "Saturation", Short, 1),
    exif(0xA40A, "Sharpness", Short, 1),
    exif(0xA40B, "DeviceSettingDescription", Undefined, 0),
    exif(0xA40C, "SubjectDistanceRange", Short, 1),
    exif(0xA420, "ImageUniqueID", Ascii, 33),
    exif(0xA430, "CameraOwnerName", Ascii, 0),
    exif(0xA431, "BodySerialNumber", Ascii, 0),
    exif(0xA432, "LensSpecification", Rational, 4),
    exif(0xA433, "LensMake", Ascii, 0),
    exif(0xA434, "LensModel", Ascii, 0),
    exif(0xA435, "LensSerialNumber", Ascii, 0),
    exif(0xA500, "Gamma", Rational, 1),
];

const GPS_TAGS: &[ExifTag] = &[
    gps(0x0000, "GPSVersionID", Byte, 4),
    gps(GPS_LATITUDE_REF, "GPSLatitudeRef", Ascii, 2),
    gps(GPS_LATITUDE, "GPSLatitude", Rational, 3),
    gps(GPS_LONGITUDE_REF, "GPSLongitudeRef", Ascii, 2),
    gps(GPS_LONGITUDE, "GPSLongitude", Rational, 3),
    gps(0x0005, "GPSAltitudeRef", Byte, 1),
    gps(0x0006, "GPSAltitude", Rational, 1),
    gps(0x0007, "GPSTimeStamp", Rational, 3),
    gps(0x0008, "GPSSatellites", Ascii, 0),
    gps(0x0009, "GPSStatus", Ascii, 2),
    gps(0x000A, "GPSMeasureMode", Ascii, 2),
    gps(0x000B, "GPSDOP", Rational, 1),
    gps(0x000C, "GPSSpeedRef", Ascii, 2),
    gps(0x000D, "GPSSpeed", Rational, 1),
    gps(0x000E, "GPSTrackRef", Ascii, 2),
    gps(0x000F, "GPSTrack", Rational, 1),
    gps(0x0010, "GPSImgDirectionRef", Ascii, 2),
    gps(0x0011, "GPSImgDirection", Rational, 1),
    gps(0x0012, "GPSMapDatum", Ascii, 0),
    gps(0x0013, "GPSDestLatitudeRef", Ascii, 2),
    gps(0x0014, "GPSDestLatitude", Rational, 3),
    gps(0x0015, "GPSDestLongitudeRef", Ascii, 2),
    gps(0x0016, "GPSDestLongitude", Rational, 3),
    gps(0x0017, "GPSDestBearingRef", Ascii, 2),
    gps(0x0018, "GPSDestBearing", Rational, 1),
    gps(0x0019, "GPSDestDistanceRef", Ascii, 2),
    gps(0x001A, "GPSDestDistance", Rational, 1),
    gps(0x001B, "GPSProcessingMethod", Undefined, 0),
    gps(0x001C, "GPSAreaInformation", Undefined, 0),
    gps(0x001D, "GPSDateStamp", Ascii, 11),
    gps(0x001E, "GPSDifferential", Short, 1),
    gps(0x001F, "GPSHPositioningError", Rational, 1),
];

const INTEROP_TAGS: &[ExifTag] = &[
    interop(0x0001, "InteropIndex", Ascii, 4),
    interop(0x0002, "InteropVersion", Undefined, 4),
    interop(0x1000, "RelatedImageFileFormat", Ascii, 0),
    interop(0x1001, "RelatedImageWidth", Short, 1),
    interop(0x1002, "RelatedImageHeight", Short, 1),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_by_id() {
        let width = lookup(TagGroup::Image, IMAGE_WIDTH).unwrap();
        assert_eq!(width.name, "ImageWidth");
        assert_eq!(width.kind, Short);

        // Exif tags resolve from either namespace of the shared table
        assert_eq!(tag_name(TagGroup::Image, EXIF_VERSION), Some("ExifVersion"));
        assert_eq!(tag_name(TagGroup::Exif, MAKE), Some("Make"));
        assert_eq!(lookup(TagGroup::Image, 0xFFFF), None);
    }

    #[test]
    fn test_colliding_ids_resolve_by_group() {
        assert_eq!(tag_name(TagGroup::Gps, 0x0001), Some("GPSLatitudeRef"));
        assert_eq!(tag_name(TagGroup::Interop, 0x0001), Some("InteropIndex"));
        assert_eq!(lookup(TagGroup::Gps, 0x0002).unwrap().kind, Rational);
        assert_eq!(lookup(TagGroup::Interop, 0x0002).unwrap().kind, Undefined);
        assert_eq!(lookup(TagGroup::Image, 0x0001), None);
    }

    #[test]
    fn test_lookup_by_name() {
        let xres = lookup_name("XResolution").unwrap();
        assert_eq!(xres.id, X_RESOLUTION);
        assert_eq!(xres.kind, Rational);
        assert_eq!(lookup_name("GPSLatitude").unwrap().group, TagGroup::Gps);
        assert_eq!(lookup_name("NoSuchTag"), None);
    }

    #[test]
    fn test_lookup_name_in_group() {
        assert_eq!(lookup_name_in(TagGroup::Exif, "Make").unwrap().id, MAKE);
        assert_eq!(lookup_name_in(TagGroup::Image, "ExifVersion").unwrap().id, EXIF_VERSION);
        assert_eq!(lookup_name_in(TagGroup::Gps, "GPSLatitudeRef").unwrap().id, 0x0001);
        assert_eq!(lookup_name_in(TagGroup::Interop, "GPSLatitudeRef"), None);
        assert_eq!(lookup_name_in(TagGroup::Gps, "InteropIndex"), None);
        assert_eq!(lookup_name_in(TagGroup::Image, "GPSLatitude"), None);
    }

    #[test]
    fn test_tables_are_unique() {
        for table in [IMAGE_TAGS, EXIF_TAGS, GPS_TAGS, INTEROP_TAGS] {
            let ids: HashSet<u16> = table.iter().map(|t| t.id).collect();
            assert_eq!(ids.len(), table.len());
        }
        let mut names = HashSet::new();
        for tag in [IMAGE_TAGS, EXIF_TAGS, GPS_TAGS, INTEROP_TAGS]
            .into_iter()
            .flatten()
        {
            assert!(names.insert(tag.name), "duplicate name {}", tag.name);
        }
        // Image and Exif tables are searched together and must not overlap
        let image: HashSet<u16> = IMAGE_TAGS.iter().map(|t| t.id).collect();
        assert!(EXIF_TAGS.iter().all(|t| !image.contains(&t.id)));
    }

    #[test]
    fn test_tags_by_group() {
        assert_eq!(tags(TagGroup::Interop).count(), INTEROP_TAGS.len());
        assert!(tags(TagGroup::Exif).all(|t| t.group == TagGroup::Exif));
        assert!(tags(TagGroup::Image).any(|t| t.id == EXIF_OFFSET));
    }
}
