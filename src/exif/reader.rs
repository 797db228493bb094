use anyhow::{Context, Result};
use nom_exif::*;
use std::io::Cursor;
use std::path::Path;

/// Existing EXIF data extracted from an image.
#[derive(Debug, Clone, Default)]
pub struct ExifData {
    pub make: Option<String>,
    pub model: Option<String>,
    pub orientation: Option<String>,
    pub has_gps: bool,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
}

/// Read existing EXIF data from an image file.
pub fn read_exif(path: &Path) -> Result<ExifData> {
    let bytes = std::fs::read(path).context("Failed to open image file")?;
    let data = read_exif_bytes(&bytes)?;
    if data.make.is_none() && data.model.is_none() && !data.has_gps {
        log::debug!("No camera or GPS EXIF data found in {}", path.display());
    }
    Ok(data)
}

/// Read existing EXIF data from an in-memory image.
///
/// Images without EXIF yield [`ExifData::default`].
pub fn read_exif_bytes(bytes: &[u8]) -> Result<ExifData> {
    let ms = MediaSource::seekable(Cursor::new(bytes.to_vec()))
        .context("Failed to open image data")?;

    let mut parser = MediaParser::new();
    let iter: ExifIter = match parser.parse(ms) {
        Ok(iter) => iter,
        Err(_) => return Ok(ExifData::default()),
    };

    // Parse GPS info before converting to Exif (consumes the iterator)
    let gps_info = iter.parse_gps_info().ok().flatten();
    let exif: Exif = iter.into();

    let mut data = ExifData {
        make: exif.get(ExifTag::Make).and_then(entry_to_string),
        model: exif.get(ExifTag::Model).and_then(entry_to_string),
        orientation: exif.get(ExifTag::Orientation).and_then(entry_to_string),
        ..Default::default()
    };

    // GPS: use nom-exif's built-in GPS parser
    if let Some(gps) = gps_info {
        data.has_gps = true;
        data.gps_latitude = Some(latlng_to_decimal(&gps.latitude, gps.latitude_ref));
        data.gps_longitude = Some(latlng_to_decimal(&gps.longitude, gps.longitude_ref));
    }

    Ok(data)
}

/// Convert an EntryValue to an Option<String>.
fn entry_to_string(val: &EntryValue) -> Option<String> {
    let s = val.to_string();
    let s = s.trim().trim_matches('"').trim_end_matches('\0').to_string();
    if s.is_empty() { None } else { Some(s) }
}

/// Convert a nom-exif LatLng (3 URationals: deg, min, sec) to decimal degrees.
fn latlng_to_decimal(latlng: &LatLng, reference: char) -> f64 {
    let degrees = latlng.0.0 as f64 / latlng.0.1 as f64;
    let minutes = latlng.1.0 as f64 / latlng.1.1 as f64;
    let seconds = latlng.2.0 as f64 / latlng.2.1 as f64;

    let coord = degrees + minutes / 60.0 + seconds / 3600.0;
    if reference == 'S' || reference == 'W' { -coord } else { coord }
}
