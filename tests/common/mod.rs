//! JPEG fixtures with hand-built Exif blocks.
//!
//! TIFF layout (offsets relative to the TIFF header):
//!
//! | offset | content |
//! |--------|---------|
//! | 0      | header, IFD0 at 8 |
//! | 8      | IFD0: Make, Orientation, GPSInfo (3 entries) |
//! | 50     | Make string |
//! | 58     | GPS IFD (4 entries) |
//! | 112    | GPS latitude / longitude rationals |
//! | 160    | IFD1 (JPEGInterchangeFormat, JPEGInterchangeFormatLength) |
//! | 190    | thumbnail JPEG |

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const MAKE: &[u8] = b"TestCam\0";
pub const TIFF_LEN_WITHOUT_THUMBNAIL: usize = 160;
pub const IFD1_LEN: usize = 30;
pub const LATITUDE: f64 = 35.675;
pub const LONGITUDE: f64 = 139.75;
pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 48;

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn gradient(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x * 4) as u8, (y * 4) as u8, 128])
    }))
}

pub fn base_jpeg() -> Vec<u8> {
    encode(&gradient(WIDTH, HEIGHT), ImageFormat::Jpeg)
}

pub fn thumbnail_jpeg() -> Vec<u8> {
    encode(&gradient(16, 12), ImageFormat::Jpeg)
}

pub fn png() -> Vec<u8> {
    encode(&gradient(8, 8), ImageFormat::Png)
}

struct Tiff {
    big_endian: bool,
    buf: Vec<u8>,
}

impl Tiff {
    fn u16(&mut self, v: u16) {
        let b = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        self.buf.extend_from_slice(&b);
    }

    fn u32(&mut self, v: u32) {
        let b = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        self.buf.extend_from_slice(&b);
    }

    fn short(&self, v: u16) -> [u8; 4] {
        let b = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        [b[0], b[1], 0, 0]
    }

    fn long(&self, v: u32) -> [u8; 4] {
        if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() }
    }

    fn entry(&mut self, tag: u16, typ: u16, count: u32, value: [u8; 4]) {
        self.u16(tag);
        self.u16(typ);
        self.u32(count);
        self.buf.extend_from_slice(&value);
    }
}

/// APP1 payload (`Exif\0\0` + TIFF) with camera and GPS tags, plus an IFD1
/// thumbnail directory when `thumbnail` is given.
pub fn exif_payload(big_endian: bool, thumbnail: Option<&[u8]>) -> Vec<u8> {
    let mut t = Tiff {
        big_endian,
        buf: Vec::new(),
    };
    t.buf.extend_from_slice(if big_endian { b"MM" } else { b"II" });
    t.u16(42);
    t.u32(8);

    let make_offset = t.long(50);
    let orientation = t.short(6);
    let gps_offset = t.long(58);
    t.u16(3);
    t.entry(0x010F, 2, MAKE.len() as u32, make_offset);
    t.entry(0x0112, 3, 1, orientation);
    t.entry(0x8825, 4, 1, gps_offset);
    t.u32(if thumbnail.is_some() { 160 } else { 0 });
    t.buf.extend_from_slice(MAKE);

    let lat_offset = t.long(112);
    let lon_offset = t.long(136);
    t.u16(4);
    t.entry(0x0001, 2, 2, *b"N\0\0\0");
    t.entry(0x0002, 5, 3, lat_offset);
    t.entry(0x0003, 2, 2, *b"E\0\0\0");
    t.entry(0x0004, 5, 3, lon_offset);
    t.u32(0);
    for (num, den) in [(35, 1), (40, 1), (30, 1), (139, 1), (45, 1), (0, 1)] {
        t.u32(num);
        t.u32(den);
    }
    assert_eq!(t.buf.len(), TIFF_LEN_WITHOUT_THUMBNAIL);

    if let Some(thumb) = thumbnail {
        let thumb_offset = t.long(190);
        let thumb_len = t.long(thumb.len() as u32);
        t.u16(2);
        t.entry(0x0201, 4, 1, thumb_offset);
        t.entry(0x0202, 4, 1, thumb_len);
        t.u32(0);
        assert_eq!(t.buf.len(), TIFF_LEN_WITHOUT_THUMBNAIL + IFD1_LEN);
        t.buf.extend_from_slice(thumb);
    }

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&t.buf);
    payload
}

/// Insert an APP1 segment right after SOI.
pub fn with_exif(jpeg: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// A real JPEG whose Exif block carries a thumbnail; returns the file and the thumbnail bytes.
pub fn jpeg_with_thumbnail(big_endian: bool) -> (Vec<u8>, Vec<u8>) {
    let thumb = thumbnail_jpeg();
    let data = with_exif(&base_jpeg(), &exif_payload(big_endian, Some(&thumb)));
    (data, thumb)
}

pub fn jpeg_without_thumbnail() -> Vec<u8> {
    with_exif(&base_jpeg(), &exif_payload(false, None))
}
