//! Error types for thumbnail removal.
//!
//! Two kinds exist: [`FormatError`] when the bytes are not shaped like a
//! JPEG/EXIF/TIFF structure, and [`Error::System`] when reading or writing a
//! file fails. Match on [`Error`] to tell them apart.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The input cannot be processed as shaped. Never retriable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The stream does not start with the SOI marker (0xFFD8).
    #[error("not a JPEG file")]
    NotJpeg,

    /// A marker's high byte is not 0xFF.
    #[error("invalid JPEG marker 0x{0:04X}")]
    InvalidMarker(u16),

    /// A length-prefixed segment declares a length smaller than its own field.
    #[error("invalid segment length {length} for marker 0x{marker:04X}")]
    InvalidSegmentLength { marker: u16, length: u16 },

    /// The segment length (or its payload) runs past the end of the input.
    #[error("truncated segment 0x{marker:04X}: need {needed} bytes, {available} available")]
    TruncatedSegment {
        marker: u16,
        needed: usize,
        available: usize,
    },

    /// The APP1 payload does not start with `Exif\0\0`.
    #[error("invalid Exif header")]
    InvalidExifHeader,

    /// Fewer than 8 bytes of TIFF header follow the Exif signature.
    #[error("invalid TIFF header")]
    InvalidTiffHeader,

    /// The TIFF byte-order mark is neither `II` nor `MM`.
    #[error("unknown TIFF byte order 0x{0:04X}")]
    UnknownByteOrder(u16),

    /// IFD0 lies outside the Exif payload.
    #[error("invalid IFD0")]
    InvalidIfd0,

    /// The next-IFD field of IFD0, or the IFD1 it points to, lies outside the payload.
    #[error("invalid IFD1 offset")]
    InvalidIfd1Offset,
}

/// Top-level error, tagged by kind.
#[derive(Error, Debug)]
pub enum Error {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("{context}: {source}")]
    System {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Wrap an I/O failure with a short description of what was attempted.
    pub fn system(context: impl Into<String>, source: io::Error) -> Self {
        Error::System {
            context: context.into(),
            source,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Error::System { .. })
    }

    /// Short label used in reports: `"format"` or `"system"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Format(_) => "format",
            Error::System { .. } => "system",
        }
    }
}
