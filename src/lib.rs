//! Reader and writer for TIFF Image File Directories (IFDs).
//!
//! IFDs are the container format of TIFF files and of the EXIF metadata
//! embedded in JPEG, PNG and WebP images. This crate reads and writes them
//! as a tree of typed values:
//!
//! - [`ExifData`]: top-level directories (`ifd0`, `ifd1`, ...) in chain order
//! - [`IfdDirectory`]: ordered tag entries plus the Exif, GPS and Interop
//!   sub-directories
//! - [`IfdValue`]: one of the 13 TIFF value types
//!
//! # Design Principles
//!
//! - **Tolerant reading**: damaged entries are kept as tag-only entries,
//!   cyclic or overlong directory chains are cut short, only a bad header
//!   is an error
//! - **Exact writing**: every offset is planned before a byte is written
//!   ([`layout`]), and emitted blocks are checked against the plan
//! - **Registry-driven coercion**: tags can be set by name from loosely typed
//!   input, converted to the type the EXIF standard registers for the tag
//!
//! # Quick Start
//!
//! ```
//! use exif_io::{ExifData, Rational};
//!
//! # fn main() -> exif_io::Result<()> {
//! let mut exif = ExifData::new();
//! let image = exif.image_directory_mut();
//! image.set("ImageWidth", 100u16);
//! image.set("XResolution", [72u32, 1]);
//! exif.exif_directory_mut().set("ExifVersion", "0231");
//!
//! let bytes = exif.to_bytes()?;
//!
//! let decoded = ExifData::from_bytes(&bytes).expect("valid header");
//! let image = decoded.image_directory().unwrap();
//! assert_eq!(image.image_width(), Some(100));
//! assert_eq!(image.resolution_x(), Some(Rational::new(72, 1)));
//! # Ok(())
//! # }
//! ```
//!
//! # Reading from JPEG
//!
//! ```no_run
//! # #[cfg(feature = "jpeg")]
//! # fn main() -> exif_io::Result<()> {
//! let jpeg = std::fs::read("image.jpg")?;
//! if let Some(exif) = exif_io::jpeg::read_exif(&jpeg)? {
//!     println!("{}", exif_io::ExifInfo::from_exif(&exif));
//!     print!("{}", exif);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "jpeg"))]
//! # fn main() {}
//! ```

pub mod buffer;
mod directory;
mod error;
mod exif;
mod info;
#[cfg(feature = "jpeg")]
pub mod jpeg;
pub mod layout;
mod reader;
pub mod tags;
mod value;

pub use buffer::{Endian, EndianScope, InputBuffer, OutputBuffer};
pub use directory::{IfdDirectory, IfdEntry, SubDirectory, TagInput, TagKey};
pub use error::{Error, Result};
pub use exif::{ExifData, IMAGE_DIRECTORY, THUMBNAIL_DIRECTORY};
pub use info::{parse_exif_info, parse_thumbnail_info, thumbnail_bytes, ExifInfo, ThumbnailInfo};
pub use layout::{apply_layout, compute_layout, emit, LayoutPlan, Placement};
pub use reader::{read_header, read_tiff, ReadOptions};
pub use tags::{ExifTag, TagGroup};
pub use value::{IfdValue, IfdValueType, Rational};

// Test utilities (available with test-utils feature or in tests)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
