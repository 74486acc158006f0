//! Run-length codecs used by IFF pixel bodies.
//!
//! - ByteRun1 (PackBits): ILBM/PBM compression 1.
//! - Element runs: PackBits over fixed-size pixel tuples, DEEP compression 1.
//! - TVDC: nibble delta coding from TVPaint, DEEP compression 5.

use super::cursor::Cursor;
use crate::error::IffError;

/// Control byte that neither copies nor repeats.
const NOOP: i8 = -128;

/// Expand ByteRun1 data until `out` is full.
pub(crate) fn unpack_bits(cursor: &mut Cursor<'_>, out: &mut [u8]) -> Result<(), IffError> {
    unpack_runs(cursor, out, 1)
}

/// Expand PackBits-style runs of `group`-byte elements until `out` is full.
///
/// A control byte `n >= 0` copies `n + 1` elements verbatim, `n < 0` repeats
/// the next element `1 - n` times. A run that overshoots `out` is consumed
/// whole from the input and clipped, so the next call starts on a control byte.
pub(crate) fn unpack_runs(
    cursor: &mut Cursor<'_>,
    out: &mut [u8],
    group: usize,
) -> Result<(), IffError> {
    let mut filled = 0;
    while filled < out.len() {
        let control = cursor.read_i8()?;
        if control == NOOP {
            continue;
        }
        if control >= 0 {
            let src = cursor.take((control as usize + 1) * group)?;
            let n = src.len().min(out.len() - filled);
            out[filled..filled + n].copy_from_slice(&src[..n]);
            filled += n;
        } else {
            let count = 1 + usize::from(control.unsigned_abs());
            let value = cursor.take(group)?;
            for _ in 0..count {
                let n = group.min(out.len() - filled);
                if n == 0 {
                    break;
                }
                out[filled..filled + n].copy_from_slice(&value[..n]);
                filled += n;
            }
        }
    }
    Ok(())
}

/// Decode one TVDC-coded scanline of a single element into `out`.
///
/// Each nibble indexes `table`; a non-zero entry is added to a running byte
/// which is emitted. A zero entry takes the next nibble `n` and emits the
/// running byte `n + 1` times. The accumulator starts at zero and the line
/// ends on a byte boundary.
pub(crate) fn unpack_tvdc(
    cursor: &mut Cursor<'_>,
    table: &[i16; 16],
    out: &mut [u8],
) -> Result<(), IffError> {
    let mut nibbles = Nibbles {
        cursor,
        pending: None,
    };
    let mut acc = 0u8;
    let mut filled = 0;
    while filled < out.len() {
        let delta = table[usize::from(nibbles.next()?)];
        if delta != 0 {
            acc = acc.wrapping_add(delta as u8);
            out[filled] = acc;
            filled += 1;
        } else {
            let n = (usize::from(nibbles.next()?) + 1).min(out.len() - filled);
            out[filled..filled + n].fill(acc);
            filled += n;
        }
    }
    Ok(())
}

/// High-nibble-first reader. A dangling low nibble is dropped with it.
struct Nibbles<'c, 'a> {
    cursor: &'c mut Cursor<'a>,
    pending: Option<u8>,
}

impl Nibbles<'_, '_> {
    fn next(&mut self) -> Result<u8, IffError> {
        if let Some(lo) = self.pending.take() {
            return Ok(lo);
        }
        let b = self.cursor.read_u8()?;
        self.pending = Some(b & 0x0f);
        Ok(b >> 4)
    }
}
