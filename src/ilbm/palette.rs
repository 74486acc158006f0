//! Colour maps and per-line palette tables.

use alloc::vec::Vec;

use crate::error::IffError;
use crate::iff::cursor::Cursor;

pub(crate) type Rgb = [u8; 3];

pub(crate) const BLACK: Rgb = [0, 0, 0];

/// Entries in one SHAM/CTBL line table.
const LINE_ENTRIES: usize = 16;

/// Widen a `bits`-wide value to 8 bits by repeating its bit pattern,
/// so all-ones maps to 0xFF and zero to zero.
pub(crate) fn replicate_bits(value: u32, bits: u8) -> u8 {
    match bits {
        0 => 0,
        8.. => (value >> (bits - 8)) as u8,
        _ => {
            let value = value & ((1 << bits) - 1);
            let mut acc = 0u32;
            let mut filled = 0;
            while filled < 8 {
                acc = (acc << bits) | value;
                filled += bits;
            }
            (acc >> (filled - 8)) as u8
        }
    }
}

/// Placeholder palette used until (or unless) a CMAP supplies colours.
pub(crate) fn grey_ramp(planes: u8) -> Vec<Rgb> {
    (0..1u32 << planes)
        .map(|i| {
            let v = replicate_bits(i, planes);
            [v, v, v]
        })
        .collect()
}

/// Read CMAP triplets, at most `max` of them.
pub(crate) fn read_cmap(payload: &[u8], max: usize) -> Vec<Rgb> {
    payload
        .chunks_exact(3)
        .take(max)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

/// Whether a colour map looks like 4-bit components stored in the high
/// nibble, as older Amiga writers produce.
///
/// Heuristic: some component is non-zero, but no component has any of its
/// low four bits set.
pub(crate) fn is_under_scaled(palette: &[Rgb]) -> bool {
    let bits = palette.iter().flatten().fold(0u8, |acc, &c| acc | c);
    bits != 0 && bits & 0x0f == 0
}

/// Bit-replicate the top `bits` of every component up to 8 bits.
pub(crate) fn extend_to_8_bits(palette: &mut [Rgb], bits: u8) {
    if bits == 0 || bits >= 8 {
        return;
    }
    for c in palette.iter_mut().flatten() {
        *c = replicate_bits(u32::from(*c >> (8 - bits)), bits);
    }
}

/// Bring an under-scaled colour map to full 8-bit range. A fixed point once
/// the low bits are populated.
pub(crate) fn normalize_depth(palette: &mut [Rgb]) {
    if is_under_scaled(palette) {
        log::trace!("CMAP has 4-bit components, extending to 8 bits");
        extend_to_8_bits(palette, 4);
    }
}

/// One `0x0RGB` word as 8-bit RGB.
fn rgb_from_word(word: u16) -> Rgb {
    let nibble = |shift: u16| {
        let v = ((word >> shift) & 0x0f) as u8;
        (v << 4) | v
    };
    [nibble(8), nibble(4), nibble(0)]
}

/// Read `0x0RGB` line tables of 16 colours each until the payload runs out.
pub(crate) fn read_line_palettes(payload: &[u8]) -> Result<Vec<Vec<Rgb>>, IffError> {
    let rows = payload.len() / (LINE_ENTRIES * 2);
    let mut c = Cursor::new(payload);
    let mut tables = Vec::with_capacity(rows);
    for _ in 0..rows {
        let table = (0..LINE_ENTRIES)
            .map(|_| c.read_u16_be().map(rgb_from_word))
            .collect::<Result<Vec<_>, _>>()?;
        tables.push(table);
    }
    Ok(tables)
}
