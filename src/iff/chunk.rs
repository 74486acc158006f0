//! Tagged chunk walking for the FORM container.

use core::fmt;

use enough::Stop;

use super::cursor::Cursor;
use crate::error::IffError;

/// Chunk tags this crate interprets. Everything else is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChunkId {
    /// Bitmap header (ILBM, PBM, ACBM, RGBN, RGB8).
    Bmhd,
    /// Colour map, RGB triplets.
    Cmap,
    /// Amiga viewport mode flags.
    Camg,
    /// Sliced HAM per-line palettes.
    Sham,
    /// Dynamic HAM/Hires per-line palettes.
    Ctbl,
    /// Extended bitmap info (greyscale mode).
    Xbmi,
    Body,
    /// ACBM contiguous bitplanes.
    Abit,
    /// DEEP global header.
    Dgbl,
    /// DEEP pixel element layout.
    Dpel,
    /// DEEP body location and size.
    Dloc,
    /// DEEP body.
    Dbod,
    /// TVPaint delta table.
    Tvdc,
    Other([u8; 4]),
}

impl ChunkId {
    pub(crate) fn from_tag(tag: [u8; 4]) -> Self {
        match &tag {
            b"BMHD" => Self::Bmhd,
            b"CMAP" => Self::Cmap,
            b"CAMG" => Self::Camg,
            b"SHAM" => Self::Sham,
            b"CTBL" => Self::Ctbl,
            b"XBMI" => Self::Xbmi,
            b"BODY" => Self::Body,
            b"ABIT" => Self::Abit,
            b"DGBL" => Self::Dgbl,
            b"DPEL" => Self::Dpel,
            b"DLOC" => Self::Dloc,
            b"DBOD" => Self::Dbod,
            b"TVDC" => Self::Tvdc,
            _ => Self::Other(tag),
        }
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag: &[u8; 4] = match self {
            Self::Bmhd => b"BMHD",
            Self::Cmap => b"CMAP",
            Self::Camg => b"CAMG",
            Self::Sham => b"SHAM",
            Self::Ctbl => b"CTBL",
            Self::Xbmi => b"XBMI",
            Self::Body => b"BODY",
            Self::Abit => b"ABIT",
            Self::Dgbl => b"DGBL",
            Self::Dpel => b"DPEL",
            Self::Dloc => b"DLOC",
            Self::Dbod => b"DBOD",
            Self::Tvdc => b"TVDC",
            Self::Other(tag) => tag,
        };
        for &b in tag {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// A chunk's tag and declared payload length.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChunkHeader {
    pub id: ChunkId,
    pub len: u32,
    /// Offset of the first payload byte.
    pub start: usize,
}

/// Walk chunks until one for which `is_data` holds, handing every other
/// chunk's payload to `visit`.
///
/// On success the cursor sits at the first payload byte of the data chunk,
/// which is returned. `None` means the input ran out first.
pub(crate) fn walk_chunks<'a>(
    cursor: &mut Cursor<'a>,
    stop: &dyn Stop,
    is_data: impl Fn(ChunkId) -> bool,
    mut visit: impl FnMut(ChunkId, &'a [u8]) -> Result<(), IffError>,
) -> Result<Option<ChunkHeader>, IffError> {
    while cursor.remaining() >= 8 {
        stop.check()?;
        let id = ChunkId::from_tag(cursor.read_array()?);
        let len = cursor.read_u32_be()?;
        let header = ChunkHeader {
            id,
            len,
            start: cursor.position(),
        };

        if is_data(id) {
            return Ok(Some(header));
        }

        let available = cursor.remaining().min(len as usize);
        let payload = cursor.take(available)?;
        if let ChunkId::Other(_) = id {
            log::debug!("skipping {id} chunk ({len} bytes)");
        } else {
            visit(id, payload)?;
        }
        skip_pad(cursor, len)?;
    }
    Ok(None)
}

/// Step over the even-alignment pad after an odd-length payload.
///
/// Some writers omit the pad byte. Chunk tags never start with a zero
/// byte, so a non-zero byte here is taken to be the next chunk.
fn skip_pad(cursor: &mut Cursor<'_>, len: u32) -> Result<(), IffError> {
    if len % 2 == 0 {
        return Ok(());
    }
    match cursor.peek_u8() {
        Some(0) => cursor.skip(1)?,
        Some(b) => log::debug!("missing pad byte after odd chunk, next byte {b:#04x}"),
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use enough::Unstoppable;

    fn walk(data: &[u8]) -> (Vec<(ChunkId, usize)>, Option<ChunkHeader>, usize) {
        let mut cursor = Cursor::new(data);
        let mut seen = Vec::new();
        let body = walk_chunks(
            &mut cursor,
            &Unstoppable,
            |id| id == ChunkId::Body,
            |id, payload| {
                seen.push((id, payload.len()));
                Ok(())
            },
        )
        .unwrap();
        (seen, body, cursor.position())
    }

    #[test]
    fn stops_at_body_and_skips_unknown() {
        let mut data = Vec::new();
        data.extend_from_slice(b"ANNO\0\0\0\x03abc\0");
        data.extend_from_slice(b"CMAP\0\0\0\x03\x01\x02\x03\0");
        data.extend_from_slice(b"BODY\0\0\0\x02\xaa\xbb");
        let (seen, body, pos) = walk(&data);
        assert_eq!(seen, [(ChunkId::Cmap, 3)]);
        let body = body.unwrap();
        assert_eq!(body.len, 2);
        assert_eq!(body.start, pos);
        assert_eq!(data[pos], 0xaa);
    }

    #[test]
    fn tolerates_missing_pad_byte() {
        let mut data = Vec::new();
        data.extend_from_slice(b"CMAP\0\0\0\x03\x01\x02\x03");
        data.extend_from_slice(b"BODY\0\0\0\x00");
        let (seen, body, _) = walk(&data);
        assert_eq!(seen, [(ChunkId::Cmap, 3)]);
        assert!(body.is_some());
    }

    #[test]
    fn pad_byte_is_consumed() {
        let mut cursor = Cursor::new(b"\0CMAP");
        skip_pad(&mut cursor, 3).unwrap();
        assert_eq!(cursor.position(), 1);
        skip_pad(&mut cursor, 3).unwrap();
        assert_eq!(cursor.position(), 1);
        skip_pad(&mut cursor, 4).unwrap();
        assert_eq!(cursor.position(), 1);

        let mut cursor = Cursor::new(b"\0\0");
        cursor.skip(2).unwrap();
        skip_pad(&mut cursor, 3).unwrap();
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn odd_chunk_at_end_of_input() {
        let (seen, body, pos) = walk(b"CMAP\0\0\0\x03\x01\x02\x03\0");
        assert_eq!(seen, [(ChunkId::Cmap, 3)]);
        assert!(body.is_none());
        assert_eq!(pos, 12);
    }

    #[test]
    fn exhausted_input_has_no_data_chunk() {
        let (seen, body, _) = walk(b"CMAP\0\0\0\x06\x01\x02");
        assert_eq!(seen, [(ChunkId::Cmap, 2)]);
        assert!(body.is_none());
    }

    #[test]
    fn displays_tags() {
        assert_eq!(alloc::format!("{}", ChunkId::Sham), "SHAM");
        assert_eq!(alloc::format!("{}", ChunkId::Other(*b"AN\x01O")), "AN?O");
    }
}
