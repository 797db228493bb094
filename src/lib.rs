//! # exif-remove-thumbnail
//!
//! Remove the embedded thumbnail from the EXIF block of a JPEG while keeping every
//! other tag (camera, orientation, GPS, ...) and leaving the rest of the file
//! byte-for-byte unchanged.
//!
//! ## Quick Start
//!
//! The core is a pure function from bytes to bytes:
//!
//! ```rust,no_run
//! use exif_remove_thumbnail::remove_thumbnail;
//!
//! fn main() -> anyhow::Result<()> {
//!     let input = std::fs::read("photo.jpg")?;
//!     let (output, result) = remove_thumbnail(&input)?;
//!
//!     if result.had_thumbnail {
//!         println!(
//!             "Removed {} bytes ({} -> {})",
//!             result.thumbnail_size, result.before_size, result.after_size
//!         );
//!     }
//!     std::fs::write("photo.nothumb.jpg", output)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Files and Batches
//!
//! [`remove_thumbnail_file`] wraps the core with file I/O and tags failures as
//! [`Error::Format`] or [`Error::System`]. The [`pipeline`] module adds
//! directory walking, backups and dry runs driven by a [`config::Config`]:
//!
//! ```rust,no_run
//! use exif_remove_thumbnail::config::Config;
//! use exif_remove_thumbnail::pipeline::{collect_images, process_image};
//! use std::path::PathBuf;
//!
//! let config = Config::default();
//! for path in collect_images(&[PathBuf::from("./photos")], config.output.recursive) {
//!     let result = process_image(&path, &config);
//!     if let Some(err) = result.error {
//!         eprintln!("{}: {err}", path.display());
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`jpeg`]: JPEG segment scanner and the bytes-in/bytes-out transformation
//! - [`exif`]: Exif thumbnail stripping, inspection and metadata reading
//! - [`pipeline`]: File wrapper, image collection and batch processing
//! - [`config`]: Configuration types and loading/saving
//! - [`error`]: Tagged error model

pub mod config;
pub mod error;
pub mod exif;
pub mod jpeg;
pub mod pipeline;

pub use error::{Error, FormatError, Result};
pub use jpeg::{RemoveThumbnailResult, inspect, remove_thumbnail};
pub use pipeline::remove_thumbnail_file;
