//! `BMHD` bitmap header shared by ILBM and RGBN.

use super::cursor::Cursor;
use crate::error::IffError;

pub(crate) const BMHD_LEN: usize = 20;

/// Masking technique declared in the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Masking {
    None,
    /// An extra mask bitplane follows the colour planes.
    HasMask,
    /// `transparent_color` marks transparent pixels.
    TransparentColor,
    Lasso,
    Other(u8),
}

impl Masking {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::None,
            1 => Self::HasMask,
            2 => Self::TransparentColor,
            3 => Self::Lasso,
            other => Self::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct BitmapHeader {
    pub width: u16,
    pub height: u16,
    pub planes: u8,
    pub masking: Masking,
    pub compression: u8,
    pub transparent_color: u16,
}

impl BitmapHeader {
    pub(crate) fn parse(payload: &[u8]) -> Result<Self, IffError> {
        if payload.len() < BMHD_LEN {
            return Err(IffError::InvalidHeader(alloc::format!(
                "BMHD is {} bytes, expected {BMHD_LEN}",
                payload.len()
            )));
        }
        let mut c = Cursor::new(payload);
        let width = c.read_u16_be()?;
        let height = c.read_u16_be()?;
        // x, y origin
        c.skip(4)?;
        let planes = c.read_u8()?;
        let masking = Masking::from_u8(c.read_u8()?);
        let compression = c.read_u8()?;
        // pad1
        c.skip(1)?;
        let transparent_color = c.read_u16_be()?;
        // aspect and page size are display hints only

        log::trace!(
            "BMHD {width}x{height}, {planes} planes, masking {masking:?}, compression {compression}"
        );

        Ok(Self {
            width,
            height,
            planes,
            masking,
            compression,
            transparent_color,
        })
    }
}
