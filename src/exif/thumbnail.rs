use crate::error::FormatError;

/// Identifier code at the start of every Exif APP1 payload.
pub const EXIF_SIGNATURE: &[u8; 6] = b"Exif\0\0";

// The TIFF structure starts right after the signature; all IFD offsets are relative to it.
const TIFF_START: usize = EXIF_SIGNATURE.len();
const TIFF_HEADER_LEN: usize = 8;
const IFD_ENTRY_LEN: usize = 12;

/// Byte order of a TIFF structure, selected once from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `II` (0x4949)
    LittleEndian,
    /// `MM` (0x4D4D)
    BigEndian,
}

impl ByteOrder {
    /// Parse the 2-byte TIFF byte-order mark.
    pub fn from_mark(mark: [u8; 2]) -> Result<Self, FormatError> {
        match &mark {
            b"II" => Ok(Self::LittleEndian),
            b"MM" => Ok(Self::BigEndian),
            _ => Err(FormatError::UnknownByteOrder(u16::from_be_bytes(mark))),
        }
    }

    /// Read a `u16` at `offset`, or `None` if it runs past the end of `data`.
    pub fn read_u16(self, data: &[u8], offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = data.get(offset..offset.checked_add(2)?)?.try_into().ok()?;
        Some(match self {
            Self::LittleEndian => u16::from_le_bytes(bytes),
            Self::BigEndian => u16::from_be_bytes(bytes),
        })
    }

    /// Read a `u32` at `offset`, or `None` if it runs past the end of `data`.
    pub fn read_u32(self, data: &[u8], offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = data.get(offset..offset.checked_add(4)?)?.try_into().ok()?;
        Some(match self {
            Self::LittleEndian => u32::from_le_bytes(bytes),
            Self::BigEndian => u32::from_be_bytes(bytes),
        })
    }

    pub fn encode_u16(self, val: u16) -> [u8; 2] {
        match self {
            Self::LittleEndian => val.to_le_bytes(),
            Self::BigEndian => val.to_be_bytes(),
        }
    }

    pub fn encode_u32(self, val: u32) -> [u8; 4] {
        match self {
            Self::LittleEndian => val.to_le_bytes(),
            Self::BigEndian => val.to_be_bytes(),
        }
    }
}

/// What a single Exif payload contributed to the overall result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub had_thumbnail: bool,
    /// Bytes removed from the payload (0 if there was no thumbnail).
    pub thumbnail_size: usize,
}

/// Read-only description of the IFD chain head of an Exif payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailInfo {
    pub byte_order: ByteOrder,
    /// Offset of IFD0, relative to the TIFF header.
    pub ifd0_offset: u32,
    pub ifd0_entries: u16,
    /// Offset of IFD1, relative to the TIFF header. `None` when IFD0 is the last directory.
    pub ifd1_offset: Option<u32>,
    /// Bytes from the start of IFD1 to the end of the payload.
    pub thumbnail_size: usize,
}

// Absolute positions inside the payload, resolved once and shared by strip and inspect.
struct IfdChain {
    info: ThumbnailInfo,
    next_ifd_field: usize,
    thumbnail_start: Option<usize>,
}

fn resolve(payload: &[u8]) -> Result<IfdChain, FormatError> {
    if !payload.starts_with(EXIF_SIGNATURE) {
        return Err(FormatError::InvalidExifHeader);
    }
    if payload.len() < TIFF_START + TIFF_HEADER_LEN {
        return Err(FormatError::InvalidTiffHeader);
    }

    let order = ByteOrder::from_mark([payload[TIFF_START], payload[TIFF_START + 1]])?;

    let ifd0_offset = order
        .read_u32(payload, TIFF_START + 4)
        .ok_or(FormatError::InvalidTiffHeader)?;
    let ifd0_pos = TIFF_START
        .checked_add(ifd0_offset as usize)
        .ok_or(FormatError::InvalidIfd0)?;
    let ifd0_entries = order
        .read_u16(payload, ifd0_pos)
        .ok_or(FormatError::InvalidIfd0)?;

    let next_ifd_field = ifd0_pos + 2 + ifd0_entries as usize * IFD_ENTRY_LEN;
    let ifd1_offset = order
        .read_u32(payload, next_ifd_field)
        .ok_or(FormatError::InvalidIfd1Offset)?;

    let thumbnail_start = if ifd1_offset == 0 {
        None
    } else {
        let start = TIFF_START
            .checked_add(ifd1_offset as usize)
            .ok_or(FormatError::InvalidIfd1Offset)?;
        // Truncating before the end of the next-IFD field would cut into IFD0 itself.
        if start >= payload.len() || start < next_ifd_field + 4 {
            return Err(FormatError::InvalidIfd1Offset);
        }
        Some(start)
    };

    Ok(IfdChain {
        info: ThumbnailInfo {
            byte_order: order,
            ifd0_offset,
            ifd0_entries,
            ifd1_offset: thumbnail_start.map(|_| ifd1_offset),
            thumbnail_size: thumbnail_start.map_or(0, |start| payload.len() - start),
        },
        next_ifd_field,
        thumbnail_start,
    })
}

/// Describe the thumbnail directory of an Exif payload without modifying anything.
///
/// Fails with the same [`FormatError`]s as [`strip_thumbnail`].
pub fn inspect_exif(payload: &[u8]) -> Result<ThumbnailInfo, FormatError> {
    resolve(payload).map(|chain| chain.info)
}

/// Remove the thumbnail directory (IFD1) from an Exif APP1 payload.
///
/// The next-IFD pointer of IFD0 is set to 0 and the payload is truncated at
/// the start of IFD1. Everything from IFD1 to the end of the payload counts as
/// thumbnail, which overcounts if unrelated data was laid out after IFD1.
///
/// Returns a new buffer; the input is never modified. Without a thumbnail the
/// returned payload equals the input.
pub fn strip_thumbnail(payload: &[u8]) -> Result<(Vec<u8>, RemovalOutcome), FormatError> {
    let chain = resolve(payload)?;

    let Some(start) = chain.thumbnail_start else {
        log::debug!("Exif IFD0 has no next directory, nothing to strip");
        return Ok((payload.to_vec(), RemovalOutcome::default()));
    };

    let mut stripped = payload[..start].to_vec();
    let field = chain.next_ifd_field;
    stripped[field..field + 4].copy_from_slice(&chain.info.byte_order.encode_u32(0));

    log::debug!(
        "Stripped IFD1 at payload offset {start} ({} bytes, {:?})",
        chain.info.thumbnail_size,
        chain.info.byte_order
    );

    Ok((
        stripped,
        RemovalOutcome {
            had_thumbnail: true,
            thumbnail_size: chain.info.thumbnail_size,
        },
    ))
}
