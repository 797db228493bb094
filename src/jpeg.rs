//! JPEG segment scanning and the bytes-in/bytes-out thumbnail removal.
//!
//! The scanner walks the length-prefixed segments that precede the first
//! start-of-scan marker. Everything from SOS onward is entropy-coded data that
//! may contain marker-like byte pairs, so it is copied through untouched.

use serde::Serialize;

use crate::error::FormatError;
use crate::exif::{self, EXIF_SIGNATURE, ThumbnailInfo};

/// Marker codes the scanner cares about.
pub mod marker {
    pub const SOI: u16 = 0xFFD8;
    pub const SOS: u16 = 0xFFDA;
    pub const APP1: u16 = 0xFFE1;
}

/// One unit of the JPEG stream after SOI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A length-prefixed segment. `raw` covers marker, length and payload.
    Marked {
        marker: u16,
        raw: &'a [u8],
        payload: &'a [u8],
    },
    /// The SOS marker and every byte after it.
    Scan(&'a [u8]),
    /// A lone byte left where a marker was expected.
    Trailing(&'a [u8]),
}

impl<'a> Segment<'a> {
    /// The exact input bytes this segment spans.
    pub fn raw(&self) -> &'a [u8] {
        match *self {
            Segment::Marked { raw, .. } | Segment::Scan(raw) | Segment::Trailing(raw) => raw,
        }
    }

    /// The payload of an APP1 segment carrying Exif data.
    pub fn exif_payload(&self) -> Option<&'a [u8]> {
        match *self {
            Segment::Marked {
                marker: marker::APP1,
                payload,
                ..
            } if payload.starts_with(EXIF_SIGNATURE) => Some(payload),
            _ => None,
        }
    }
}

/// Iterator over the segments of a JPEG stream.
///
/// Yields at most one error, after which it is exhausted. Scanning also ends
/// after [`Segment::Scan`] or at the end of input.
pub struct Segments<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Segments<'a> {
    /// Check the SOI marker and position the scanner right after it.
    pub fn new(data: &'a [u8]) -> Result<Self, FormatError> {
        if data.len() < 2 || u16::from_be_bytes([data[0], data[1]]) != marker::SOI {
            return Err(FormatError::NotJpeg);
        }
        Ok(Self {
            data,
            pos: 2,
            done: false,
        })
    }

    fn next_segment(&mut self) -> Result<Option<Segment<'a>>, FormatError> {
        let rest = &self.data[self.pos..];
        match rest.len() {
            0 => return Ok(None),
            1 => return Ok(Some(Segment::Trailing(rest))),
            _ => {}
        }

        let code = u16::from_be_bytes([rest[0], rest[1]]);
        if code & 0xFF00 != 0xFF00 {
            return Err(FormatError::InvalidMarker(code));
        }
        if code == marker::SOS {
            return Ok(Some(Segment::Scan(rest)));
        }

        if rest.len() < 4 {
            return Err(FormatError::TruncatedSegment {
                marker: code,
                needed: 2,
                available: rest.len() - 2,
            });
        }
        let length = u16::from_be_bytes([rest[2], rest[3]]);
        if length < 2 {
            return Err(FormatError::InvalidSegmentLength {
                marker: code,
                length,
            });
        }
        let end = 2 + length as usize;
        if rest.len() < end {
            return Err(FormatError::TruncatedSegment {
                marker: code,
                needed: length as usize - 2,
                available: rest.len() - 4,
            });
        }

        self.pos += end;
        Ok(Some(Segment::Marked {
            marker: code,
            raw: &rest[..end],
            payload: &rest[4..end],
        }))
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<Segment<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_segment().transpose();
        if !matches!(item, Some(Ok(Segment::Marked { .. }))) {
            self.done = true;
        }
        item
    }
}

/// Outcome of removing the thumbnail from one JPEG stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemoveThumbnailResult {
    pub had_thumbnail: bool,
    /// Input length in bytes.
    pub before_size: usize,
    /// Output length in bytes.
    pub after_size: usize,
    /// Bytes removed from Exif payloads (0 if none).
    pub thumbnail_size: usize,
}

/// Remove the embedded Exif thumbnail from a JPEG byte stream.
///
/// Every segment other than the Exif APP1 is copied byte for byte. The Exif
/// segment is re-emitted in place with its length field recomputed. On error
/// no output is produced.
///
/// ```rust
/// use exif_remove_thumbnail::{FormatError, remove_thumbnail};
///
/// let png = b"\x89PNG\r\n\x1a\n";
/// assert_eq!(remove_thumbnail(png).unwrap_err(), FormatError::NotJpeg);
///
/// let jpeg = [0xFF, 0xD8, 0xFF, 0xDA, 0x12, 0x34, 0xFF, 0xD9];
/// let (out, result) = remove_thumbnail(&jpeg).unwrap();
/// assert_eq!(out, jpeg);
/// assert!(!result.had_thumbnail);
/// ```
pub fn remove_thumbnail(input: &[u8]) -> Result<(Vec<u8>, RemoveThumbnailResult), FormatError> {
    let segments = Segments::new(input)?;

    let mut output = Vec::with_capacity(input.len());
    output.extend_from_slice(&input[..2]);

    let mut result = RemoveThumbnailResult {
        before_size: input.len(),
        ..Default::default()
    };

    for segment in segments {
        let segment = segment?;
        let Some(payload) = segment.exif_payload() else {
            output.extend_from_slice(segment.raw());
            continue;
        };

        let (stripped, outcome) = exif::strip_thumbnail(payload)?;
        // Stripping never grows the payload, so the new length still fits.
        let length = (stripped.len() + 2) as u16;
        output.extend_from_slice(&marker::APP1.to_be_bytes());
        output.extend_from_slice(&length.to_be_bytes());
        output.extend_from_slice(&stripped);

        if outcome.had_thumbnail {
            result.had_thumbnail = true;
            result.thumbnail_size += outcome.thumbnail_size;
        }
    }

    result.after_size = output.len();
    Ok((output, result))
}

/// Report the thumbnail layout of the first Exif segment, if there is one.
pub fn inspect(input: &[u8]) -> Result<Option<ThumbnailInfo>, FormatError> {
    for segment in Segments::new(input)? {
        if let Some(payload) = segment?.exif_payload() {
            return exif::inspect_exif(payload).map(Some);
        }
    }
    Ok(None)
}
