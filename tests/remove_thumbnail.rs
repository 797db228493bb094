//! End-to-end behaviour of the bytes-in/bytes-out transformation on real JPEGs.

mod common;

use common::*;
use exif_remove_thumbnail::exif::read_exif_bytes;
use exif_remove_thumbnail::{FormatError, inspect, remove_thumbnail};
use image::ImageFormat;
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};
use nom_exif::{ExifIter, MediaParser, MediaSource};
use std::io::Cursor;

// SOI + APP1 marker + APP1 length
const APP1_PAYLOAD_START: usize = 6;
const EXIF_HEADER_LEN: usize = 6;

/// Number of tags nom-exif reports in the thumbnail directory.
fn ifd1_tag_count(jpeg: &[u8]) -> usize {
    let ms = MediaSource::seekable(Cursor::new(jpeg.to_vec())).unwrap();
    let mut parser = MediaParser::new();
    let iter: ExifIter = parser.parse(ms).unwrap();
    iter.filter(|entry| entry.ifd_index() == 1).count()
}

#[test]
fn thumbnail_is_removed() {
    for big_endian in [false, true] {
        let (input, thumb) = jpeg_with_thumbnail(big_endian);
        let (output, result) = remove_thumbnail(&input).unwrap();

        assert!(result.had_thumbnail);
        assert_eq!(result.thumbnail_size, IFD1_LEN + thumb.len());
        assert_eq!(result.before_size, input.len());
        assert_eq!(result.after_size, output.len());
        assert_eq!(result.after_size, result.before_size - result.thumbnail_size);

        let info = inspect(&output).unwrap().unwrap();
        assert_eq!(info.ifd1_offset, None);
        assert_eq!(info.ifd0_entries, 3);

        assert_eq!(ifd1_tag_count(&input), 2);
        assert_eq!(ifd1_tag_count(&output), 0);
    }
}

#[test]
fn bytes_outside_exif_are_untouched() {
    let (input, thumb) = jpeg_with_thumbnail(false);
    let (output, _) = remove_thumbnail(&input).unwrap();

    let new_end = APP1_PAYLOAD_START + EXIF_HEADER_LEN + TIFF_LEN_WITHOUT_THUMBNAIL;
    let old_end = new_end + IFD1_LEN + thumb.len();
    assert_eq!(&output[new_end..], &input[old_end..]);
    assert_eq!(&output[..2], &input[..2]);

    let length = u16::from_be_bytes([output[4], output[5]]) as usize;
    assert_eq!(length, EXIF_HEADER_LEN + TIFF_LEN_WITHOUT_THUMBNAIL + 2);
}

#[test]
fn metadata_survives() {
    let (input, _) = jpeg_with_thumbnail(true);
    let before = read_exif_bytes(&input).unwrap();
    assert!(before.has_gps);

    let (output, _) = remove_thumbnail(&input).unwrap();
    let after = read_exif_bytes(&output).unwrap();

    assert_eq!(after.make.as_deref(), Some("TestCam"));
    assert_eq!(after.make, before.make);
    assert_eq!(after.orientation.as_deref(), Some("6"));
    assert_eq!(after.orientation, before.orientation);
    assert!(after.has_gps);
    assert!((after.gps_latitude.unwrap() - LATITUDE).abs() < 1e-6);
    assert!((after.gps_longitude.unwrap() - LONGITUDE).abs() < 1e-6);
}

#[test]
fn output_is_a_valid_jpeg() {
    let (input, _) = jpeg_with_thumbnail(false);
    let (output, _) = remove_thumbnail(&input).unwrap();

    let jpeg = Jpeg::from_bytes(Bytes::from(output.clone())).unwrap();
    let exif = jpeg.exif().unwrap();
    assert_eq!(exif.len(), TIFF_LEN_WITHOUT_THUMBNAIL);

    let decoded = image::load_from_memory_with_format(&output, ImageFormat::Jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (WIDTH, HEIGHT));
}

#[test]
fn no_thumbnail_is_identity() {
    let input = jpeg_without_thumbnail();
    let (output, result) = remove_thumbnail(&input).unwrap();

    assert!(!result.had_thumbnail);
    assert_eq!(result.thumbnail_size, 0);
    assert_eq!(output, input);
    assert_eq!(result.after_size, result.before_size);
    assert!(read_exif_bytes(&output).unwrap().has_gps);
}

#[test]
fn no_exif_is_identity() {
    let input = base_jpeg();
    let (output, result) = remove_thumbnail(&input).unwrap();

    assert!(!result.had_thumbnail);
    assert_eq!(output, input);
    assert_eq!(inspect(&input).unwrap(), None);
}

#[test]
fn png_is_rejected() {
    assert_eq!(remove_thumbnail(&png()).unwrap_err(), FormatError::NotJpeg);
}

#[test]
fn truncated_jpeg_is_rejected() {
    let (mut input, _) = jpeg_with_thumbnail(false);
    input.truncate(100);
    assert!(matches!(
        remove_thumbnail(&input).unwrap_err(),
        FormatError::TruncatedSegment { marker: 0xFFE1, .. }
    ));
}

#[test]
fn unknown_byte_order_is_rejected() {
    let thumb = thumbnail_jpeg();
    let mut payload = exif_payload(false, Some(&thumb));
    payload[6..8].copy_from_slice(b"XX");
    let input = with_exif(&base_jpeg(), &payload);
    assert_eq!(
        remove_thumbnail(&input).unwrap_err(),
        FormatError::UnknownByteOrder(0x5858)
    );
}
