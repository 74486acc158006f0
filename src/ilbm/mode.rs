//! Mode resolution: turn what the walker collected into a fixed decode plan.
//!
//! Runs after the walker and before any pixel data is touched. Everything
//! rejected here fails the decode outright.

use super::context::IlbmContext;
use crate::error::IffError;
use crate::iff::bmhd::Masking;
use crate::info::IffForm;

/// CAMG bit for Extra Half-Brite.
const CAMG_EHB: u32 = 0x80;
/// CAMG bit for Hold-And-Modify.
const CAMG_HAM: u32 = 0x800;

/// How bitplane bytes are arranged in the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Layout {
    /// ILBM: each row holds one word-aligned line per plane, plane 0 first.
    Interleaved,
    /// PBM: one byte per pixel, rows padded to even length.
    Chunky,
    /// ACBM: each plane stored whole, one after the other.
    Contiguous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Compression {
    None,
    ByteRun1,
    Other(u8),
}

impl Compression {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::None,
            1 => Self::ByteRun1,
            other => Self::Other(other),
        }
    }
}

/// How a pixel's assembled index becomes a colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PixelMode {
    /// 24/32 planes: the index is the colour, red in the low byte.
    TrueColor,
    /// Palette lookup. With `half_brite` the top plane halves the colour.
    Indexed { half_brite: bool },
    /// Hold-And-Modify with `value_bits` data bits under 2 control bits.
    Ham { value_bits: u8 },
    /// XBMI greyscale: the index, widened to 8 bits, on all channels.
    Grey,
}

/// What the extra bitplanes beyond the colour map's index width mean.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExtraPlanes {
    None,
    HalfBrite,
    Ham,
}

/// The decode plan handed to the synthesizer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Resolved {
    pub width: u32,
    pub height: u32,
    pub planes: u8,
    pub layout: Layout,
    pub compression: Compression,
    pub mode: PixelMode,
    /// Colours addressable by the (mode-adjusted) index.
    pub colors: usize,
    /// Bits of the index that address the palette.
    pub color_bits: u8,
}

pub(crate) fn resolve(ctx: &IlbmContext) -> Result<Resolved, IffError> {
    let header = ctx
        .header
        .ok_or_else(|| IffError::InvalidHeader("missing BMHD chunk".into()))?;
    if header.width == 0 || header.height == 0 {
        return Err(IffError::InvalidHeader(alloc::format!(
            "image dimensions {}x{} must be positive",
            header.width,
            header.height
        )));
    }
    let planes = header.planes;
    if !matches!(planes, 1..=12 | 24 | 32) {
        return Err(IffError::UnsupportedVariant(alloc::format!(
            "{planes} bitplanes"
        )));
    }
    if header.masking == Masking::HasMask {
        return Err(IffError::UnsupportedVariant(
            "mask bitplane transparency".into(),
        ));
    }

    let layout = match ctx.form {
        IffForm::Pbm => Layout::Chunky,
        IffForm::Acbm => Layout::Contiguous,
        _ => Layout::Interleaved,
    };
    if layout == Layout::Chunky && planes > 8 {
        return Err(IffError::UnsupportedVariant(alloc::format!(
            "PBM with {planes} bitplanes"
        )));
    }

    let greyscale = match ctx.xbmi_mode {
        None | Some(0) => false,
        Some(1) if planes <= 8 => true,
        Some(mode) => {
            return Err(IffError::UnsupportedVariant(alloc::format!(
                "XBMI mode {mode} with {planes} bitplanes"
            )));
        }
    };

    let mut resolved = Resolved {
        width: u32::from(header.width),
        height: u32::from(header.height),
        planes,
        layout,
        compression: Compression::from_u8(header.compression),
        mode: PixelMode::Indexed { half_brite: false },
        colors: 0,
        color_bits: 0,
    };

    if planes > 12 {
        resolved.mode = PixelMode::TrueColor;
        log::trace!("{:?}: {planes}-bit truecolour", ctx.form);
        return Ok(resolved);
    }
    if greyscale {
        resolved.mode = PixelMode::Grey;
        resolved.colors = 1 << planes;
        resolved.color_bits = planes;
        return Ok(resolved);
    }

    let mut colors = ctx.cmap_len.filter(|&n| n > 0).unwrap_or(1 << planes);
    let mut color_bits = index_bits(colors);

    let extra = match ctx.camg {
        Some(camg) if camg & CAMG_HAM != 0 => ExtraPlanes::Ham,
        Some(camg) if camg & CAMG_EHB != 0 => ExtraPlanes::HalfBrite,
        Some(_) => ExtraPlanes::None,
        None if layout == Layout::Chunky => ExtraPlanes::None,
        None => infer_extra_planes(planes, color_bits),
    };

    resolved.mode = match extra {
        ExtraPlanes::None => PixelMode::Indexed { half_brite: false },
        ExtraPlanes::HalfBrite => {
            if planes < 2 {
                return Err(IffError::UnsupportedVariant(
                    "half-brite with a single bitplane".into(),
                ));
            }
            // the top plane is the half-brite flag, not an index bit
            if color_bits >= planes {
                colors /= 2;
                color_bits -= 1;
            }
            PixelMode::Indexed { half_brite: true }
        }
        ExtraPlanes::Ham => {
            if planes < 3 {
                return Err(IffError::UnsupportedVariant(alloc::format!(
                    "HAM with {planes} bitplanes"
                )));
            }
            let value_bits = planes - 2;
            if color_bits > value_bits {
                let excess = color_bits - value_bits;
                colors >>= excess;
                color_bits -= excess;
            }
            PixelMode::Ham { value_bits }
        }
    };
    resolved.colors = colors;
    resolved.color_bits = color_bits;

    Ok(resolved)
}

/// Bits needed to address `colors` palette entries.
fn index_bits(colors: usize) -> u8 {
    match colors {
        0 | 1 => 0,
        n => (usize::BITS - (n - 1).leading_zeros()) as u8,
    }
}

/// Guess the meaning of extra bitplanes when no CAMG chunk says.
///
/// This is guesswork against files in the wild, not a rule of the format.
/// Planes the colour map cannot address are assumed to be HAM control bits
/// when there are exactly two of them (HAM6 with 16 colours, HAM8 with 64),
/// and the half-brite flag otherwise.
pub(crate) fn infer_extra_planes(planes: u8, color_bits: u8) -> ExtraPlanes {
    if color_bits >= planes || planes < 2 {
        ExtraPlanes::None
    } else if planes >= 3 && color_bits == planes - 2 {
        ExtraPlanes::Ham
    } else {
        ExtraPlanes::HalfBrite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iff::cursor::Cursor;
    use alloc::vec::Vec;
    use enough::Unstoppable;

    /// Build a context by walking a synthetic chunk stream.
    fn ctx(
        form: IffForm,
        planes: u8,
        masking: u8,
        cmap: Option<usize>,
        camg: Option<u32>,
    ) -> IlbmContext {
        let mut data = Vec::new();
        let mut bmhd = [0u8; 20];
        bmhd[0..2].copy_from_slice(&16u16.to_be_bytes());
        bmhd[2..4].copy_from_slice(&2u16.to_be_bytes());
        bmhd[8] = planes;
        bmhd[9] = masking;
        data.extend_from_slice(b"BMHD\0\0\0\x14");
        data.extend_from_slice(&bmhd);
        if let Some(n) = cmap {
            data.extend_from_slice(b"CMAP");
            data.extend_from_slice(&((n * 3) as u32).to_be_bytes());
            data.extend((0..n * 3).map(|i| (i as u8) | 1));
            if n % 2 == 1 {
                data.push(0);
            }
        }
        if let Some(camg) = camg {
            data.extend_from_slice(b"CAMG\0\0\0\x04");
            data.extend_from_slice(&camg.to_be_bytes());
        }
        IlbmContext::walk(form, &mut Cursor::new(&data), &Unstoppable).unwrap()
    }

    fn ilbm(planes: u8, cmap: Option<usize>, camg: Option<u32>) -> Result<Resolved, IffError> {
        resolve(&ctx(IffForm::Ilbm, planes, 0, cmap, camg))
    }

    #[test]
    fn index_bits_rounds_up() {
        assert_eq!(index_bits(1), 0);
        assert_eq!(index_bits(2), 1);
        assert_eq!(index_bits(16), 4);
        assert_eq!(index_bits(17), 5);
        assert_eq!(index_bits(256), 8);
    }

    #[test]
    fn inference_table() {
        assert_eq!(infer_extra_planes(6, 4), ExtraPlanes::Ham);
        assert_eq!(infer_extra_planes(8, 6), ExtraPlanes::Ham);
        assert_eq!(infer_extra_planes(6, 5), ExtraPlanes::HalfBrite);
        assert_eq!(infer_extra_planes(6, 3), ExtraPlanes::HalfBrite);
        assert_eq!(infer_extra_planes(5, 5), ExtraPlanes::None);
        assert_eq!(infer_extra_planes(2, 0), ExtraPlanes::HalfBrite);
        assert_eq!(infer_extra_planes(1, 0), ExtraPlanes::None);
    }

    #[test]
    fn plain_palette() {
        let r = ilbm(4, Some(16), None).unwrap();
        assert_eq!(r.mode, PixelMode::Indexed { half_brite: false });
        assert_eq!((r.colors, r.color_bits), (16, 4));
        assert_eq!(r.layout, Layout::Interleaved);
    }

    #[test]
    fn ham6_inferred_from_16_colours() {
        let r = ilbm(6, Some(16), None).unwrap();
        assert_eq!(r.mode, PixelMode::Ham { value_bits: 4 });
        assert_eq!((r.colors, r.color_bits), (16, 4));
    }

    #[test]
    fn ehb_inferred_from_32_colours() {
        let r = ilbm(6, Some(32), None).unwrap();
        assert_eq!(r.mode, PixelMode::Indexed { half_brite: true });
        assert_eq!((r.colors, r.color_bits), (32, 5));
    }

    #[test]
    fn ehb_from_camg_halves_full_palette() {
        let r = ilbm(6, Some(64), Some(CAMG_EHB)).unwrap();
        assert_eq!(r.mode, PixelMode::Indexed { half_brite: true });
        assert_eq!((r.colors, r.color_bits), (32, 5));
    }

    #[test]
    fn ham_from_camg_culls_oversized_palette() {
        let r = ilbm(6, Some(64), Some(CAMG_HAM)).unwrap();
        assert_eq!(r.mode, PixelMode::Ham { value_bits: 4 });
        assert_eq!((r.colors, r.color_bits), (16, 4));
    }

    #[test]
    fn camg_without_flags_disables_inference() {
        let r = ilbm(6, Some(16), Some(0x4)).unwrap();
        assert_eq!(r.mode, PixelMode::Indexed { half_brite: false });
    }

    #[test]
    fn truecolour_planes() {
        assert_eq!(ilbm(24, None, None).unwrap().mode, PixelMode::TrueColor);
        assert_eq!(ilbm(32, None, None).unwrap().mode, PixelMode::TrueColor);
    }

    #[test]
    fn rejects_unsupported_plane_counts() {
        for planes in [0, 13, 16, 25] {
            assert!(
                matches!(ilbm(planes, None, None), Err(IffError::UnsupportedVariant(_))),
                "{planes} planes"
            );
        }
    }

    #[test]
    fn rejects_mask_plane() {
        let err = resolve(&ctx(IffForm::Ilbm, 4, 1, None, None));
        assert!(matches!(err, Err(IffError::UnsupportedVariant(_))));
        assert!(resolve(&ctx(IffForm::Ilbm, 4, 2, None, None)).is_ok());
    }

    #[test]
    fn pbm_is_chunky_and_never_inferred() {
        let r = resolve(&ctx(IffForm::Pbm, 8, 0, Some(64), None)).unwrap();
        assert_eq!(r.layout, Layout::Chunky);
        assert_eq!(r.mode, PixelMode::Indexed { half_brite: false });
        assert!(resolve(&ctx(IffForm::Pbm, 24, 0, None, None)).is_err());
    }

    #[test]
    fn missing_header() {
        let ctx = IlbmContext::walk(IffForm::Ilbm, &mut Cursor::new(&[]), &Unstoppable).unwrap();
        assert!(matches!(resolve(&ctx), Err(IffError::InvalidHeader(_))));
    }
}
