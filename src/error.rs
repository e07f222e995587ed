//! Error types for exif-io

use std::io;

/// Result type for exif-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing IFD data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A read ran past the end of the input
    #[error("Unexpected end of data: needed {needed} bytes at offset {offset}")]
    UnexpectedEof { offset: usize, needed: usize },

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Tag name is not in the registry
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// Setter input cannot be coerced to the tag's registered type
    #[error("Cannot coerce value for tag 0x{tag:04X} to {kind}")]
    TagCoercion { tag: u16, kind: &'static str },

    /// Layout does not fit 32-bit TIFF offsets
    #[error("Data too large: {size} bytes does not fit a 32-bit TIFF offset")]
    TooLarge { size: usize },

    /// A typed value does not fit its on-disk encoding
    #[error("Value {value} out of range for {kind}")]
    ValueOutOfRange { kind: &'static str, value: String },

    /// Emitted bytes drifted from the computed layout
    #[error("Layout mismatch: planned offset {expected}, emitted at {actual}")]
    LayoutMismatch { expected: usize, actual: usize },
}
