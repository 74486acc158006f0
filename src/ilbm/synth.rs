//! Pixel synthesis: body bytes to RGBA rows.

use alloc::vec;

use enough::Stop;

use super::context::IlbmContext;
use super::mode::{Compression, Layout, PixelMode, Resolved};
use super::palette::{BLACK, Rgb, replicate_bits};
use crate::error::IffError;
use crate::iff::cursor::Cursor;
use crate::iff::rle;

/// Reads one row of plane (or chunky) bytes at a time.
#[derive(Debug)]
pub(crate) struct RowReader {
    layout: Layout,
    packed: bool,
    planes: usize,
    /// Bytes of one plane's line, rounded up to whole 16-bit words.
    plane_bytes: usize,
    row_len: usize,
    height: usize,
    body_start: usize,
}

impl RowReader {
    /// Fix the body reader for a plan. Unknown compression fails here,
    /// before any row is decoded.
    pub(crate) fn new(plan: &Resolved, body_start: usize) -> Result<Self, IffError> {
        let packed = match (plan.layout, plan.compression) {
            (_, Compression::Other(n)) => {
                return Err(IffError::UnsupportedVariant(alloc::format!(
                    "compression {n}"
                )));
            }
            (Layout::Contiguous, Compression::ByteRun1) => {
                return Err(IffError::UnsupportedVariant(
                    "compressed ACBM bitplanes".into(),
                ));
            }
            (_, Compression::ByteRun1) => true,
            (_, Compression::None) => false,
        };
        let width = plan.width as usize;
        let planes = usize::from(plan.planes);
        let plane_bytes = width.div_ceil(16) * 2;
        let row_len = match plan.layout {
            Layout::Chunky => width + (width & 1),
            Layout::Interleaved | Layout::Contiguous => planes * plane_bytes,
        };
        Ok(Self {
            layout: plan.layout,
            packed,
            planes,
            plane_bytes,
            row_len,
            height: plan.height as usize,
            body_start,
        })
    }

    fn read_row(&self, cursor: &mut Cursor<'_>, y: usize, row: &mut [u8]) -> Result<(), IffError> {
        if self.layout == Layout::Contiguous {
            for (p, line) in row.chunks_exact_mut(self.plane_bytes).enumerate() {
                let offset = (p * self.height + y)
                    .checked_mul(self.plane_bytes)
                    .and_then(|o| o.checked_add(self.body_start))
                    .ok_or(IffError::UnexpectedEof)?;
                cursor.set_position(offset)?;
                cursor.read_exact(line)?;
            }
            return Ok(());
        }
        if self.packed {
            rle::unpack_bits(cursor, row)
        } else {
            cursor.read_exact(row)
        }
    }
}

/// Decode rows into `out` (RGBA, zero-filled) until the image is complete
/// or an error stops it. `rows_done` counts fully written rows.
pub(crate) fn synthesize(
    ctx: &IlbmContext,
    plan: &Resolved,
    reader: &RowReader,
    cursor: &mut Cursor<'_>,
    out: &mut [u8],
    rows_done: &mut u32,
    stop: &dyn Stop,
) -> Result<(), IffError> {
    let width = plan.width as usize;
    let mut row = vec![0u8; reader.row_len];
    let mut indices = vec![0u32; width];

    for (y, out_row) in out.chunks_exact_mut(width * 4).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        reader.read_row(cursor, y, &mut row)?;
        match reader.layout {
            Layout::Chunky => {
                for (idx, &b) in indices.iter_mut().zip(&row) {
                    *idx = u32::from(b);
                }
            }
            Layout::Interleaved | Layout::Contiguous => {
                gather_indices(&row, reader.plane_bytes, reader.planes, &mut indices);
            }
        }
        paint_row(plan, row_palette(ctx, y), &indices, out_row);
        *rows_done += 1;
    }
    Ok(())
}

/// Assemble per-pixel indices from one row of plane lines; plane 0 is bit 0.
fn gather_indices(row: &[u8], plane_bytes: usize, planes: usize, indices: &mut [u32]) {
    indices.fill(0);
    for (p, line) in row.chunks_exact(plane_bytes).take(planes).enumerate() {
        for (x, idx) in indices.iter_mut().enumerate() {
            let bit = (line[x >> 3] >> (7 - (x & 7))) & 1;
            *idx |= u32::from(bit) << p;
        }
    }
}

/// Palette in effect for output row `y`.
///
/// A laced table covers rows `2n` and `2n + 1`; otherwise a table covers
/// its own row. Rows without a table use the CMAP palette.
fn row_palette(ctx: &IlbmContext, y: usize) -> &[Rgb] {
    if ctx.laced {
        if let Some(table) = ctx.line_palettes.get(y / 2) {
            return table;
        }
    }
    ctx.line_palettes
        .get(y)
        .map(|t| t.as_slice())
        .unwrap_or(ctx.palette.as_slice())
}

fn paint_row(plan: &Resolved, palette: &[Rgb], indices: &[u32], out: &mut [u8]) {
    let lookup = |i: u32| palette.get(i as usize).copied().unwrap_or(BLACK);
    let pixels = out.chunks_exact_mut(4).zip(indices);

    match plan.mode {
        PixelMode::TrueColor => {
            for (px, &i) in pixels {
                let [r, g, b, _] = i.to_le_bytes();
                px.copy_from_slice(&[r, g, b, 0xff]);
            }
        }
        PixelMode::Grey => {
            for (px, &i) in pixels {
                let v = replicate_bits(i, plan.planes);
                px.copy_from_slice(&[v, v, v, 0xff]);
            }
        }
        PixelMode::Indexed { half_brite: false } => {
            for (px, &i) in pixels {
                let [r, g, b] = lookup(i);
                px.copy_from_slice(&[r, g, b, 0xff]);
            }
        }
        PixelMode::Indexed { half_brite: true } => {
            let flag = plan.planes - 1;
            let mask = (1u32 << flag) - 1;
            for (px, &i) in pixels {
                let mut rgb = lookup(i & mask);
                if (i >> flag) & 1 == 1 {
                    rgb = rgb.map(|c| c >> 1);
                }
                let [r, g, b] = rgb;
                px.copy_from_slice(&[r, g, b, 0xff]);
            }
        }
        PixelMode::Ham { value_bits } => {
            let mask = (1u32 << value_bits) - 1;
            let mut held = BLACK;
            for (px, &i) in pixels {
                let value = i & mask;
                match (i >> value_bits) & 0b11 {
                    0 => held = lookup(value),
                    1 => held[2] = replicate_bits(value, value_bits),
                    2 => held[0] = replicate_bits(value, value_bits),
                    _ => held[1] = replicate_bits(value, value_bits),
                }
                let [r, g, b] = held;
                px.copy_from_slice(&[r, g, b, 0xff]);
            }
        }
    }
}
