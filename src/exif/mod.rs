//! Exif payload handling.
//!
//! - [`strip_thumbnail`]: drop the IFD1 thumbnail directory from an APP1 payload
//! - [`inspect_exif`]: describe the IFD chain without changing anything
//! - [`read_exif`]: summarise existing metadata (camera, orientation, GPS)

mod reader;
mod thumbnail;

pub use reader::{ExifData, read_exif, read_exif_bytes};
pub use thumbnail::{
    ByteOrder, EXIF_SIGNATURE, RemovalOutcome, ThumbnailInfo, inspect_exif, strip_thumbnail,
};
