use enough::Stop;

use crate::error::IffError;
use crate::iff::cursor::Cursor;
use crate::info::IffForm;

/// Word width of one run header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RunWord {
    /// RGBN: 16-bit `RRRR GGGG BBBB N CCC`.
    Rgb4,
    /// RGB8: 32-bit `R8 G8 B8 N C7`.
    Rgb8,
}

impl RunWord {
    /// Bitplane count the BMHD declares for this form.
    pub(crate) fn for_form(form: IffForm) -> Option<(Self, u8)> {
        match form {
            IffForm::Rgbn => Some((Self::Rgb4, 13)),
            IffForm::Rgb8 => Some((Self::Rgb8, 25)),
            _ => None,
        }
    }

    /// Read one run: its colour and pixel count. A count of zero marks the
    /// end of the body.
    fn read_run(self, cursor: &mut Cursor<'_>) -> Result<([u8; 3], usize), IffError> {
        let (rgb, count) = match self {
            Self::Rgb4 => {
                let w = cursor.read_u16_be()?;
                let nib = |shift: u16| ((w >> shift) & 0xf) as u8 * 0x11;
                ([nib(12), nib(8), nib(4)], usize::from(w & 0x7))
            }
            Self::Rgb8 => {
                let [r, g, b, c] = cursor.read_u32_be()?.to_be_bytes();
                ([r, g, b], usize::from(c & 0x7f))
            }
        };
        if count != 0 {
            return Ok((rgb, count));
        }
        let count = match cursor.read_u8()? {
            0 => usize::from(cursor.read_u16_be()?),
            n => usize::from(n),
        };
        Ok((rgb, count))
    }
}

/// Expand runs into `out` (RGBA, zero-filled). Runs continue across row
/// boundaries. `pixels_done` counts pixels written.
pub(crate) fn decode_runs(
    word: RunWord,
    width: usize,
    cursor: &mut Cursor<'_>,
    out: &mut [u8],
    pixels_done: &mut usize,
    stop: &dyn Stop,
) -> Result<(), IffError> {
    let total = out.len() / 4;
    let check_every = width.saturating_mul(16).max(1);
    let mut next_check = 0;

    while *pixels_done < total {
        if *pixels_done >= next_check {
            stop.check()?;
            next_check = *pixels_done + check_every;
        }
        let ([r, g, b], count) = word.read_run(cursor)?;
        if count == 0 {
            log::debug!("run terminator after {} of {total} pixels", *pixels_done);
            break;
        }
        let n = count.min(total - *pixels_done);
        let start = *pixels_done * 4;
        for px in out[start..start + n * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 0xff]);
        }
        *pixels_done += n;
    }
    Ok(())
}
