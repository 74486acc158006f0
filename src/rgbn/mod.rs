//! RGBN and RGB8 decoding (internal).
//!
//! Impulse's run-length truecolour forms: a BMHD followed by a BODY of
//! (colour, count) words, without bitplanes.

pub(crate) mod decode;

use alloc::vec;

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::IffError;
use crate::iff;
use crate::iff::bmhd::{BitmapHeader, Masking};
use crate::iff::chunk::{ChunkId, walk_chunks};
use crate::iff::cursor::Cursor;
use crate::info::{IffForm, ImageInfo};
use crate::limits::{Limits, check_output};
use decode::RunWord;

pub(crate) const FORMS: &[IffForm] = &[IffForm::Rgbn, IffForm::Rgb8];

/// BMHD compression id for Impulse run words.
const COMPRESSION_RUNS: u8 = 4;

/// Walk to BODY and return the header found on the way.
fn walk(
    form: IffForm,
    cursor: &mut Cursor<'_>,
    stop: &dyn Stop,
) -> Result<(Option<BitmapHeader>, bool), IffError> {
    let mut header = None;
    let body = walk_chunks(
        cursor,
        stop,
        |id| id == ChunkId::Body,
        |id, payload| {
            match id {
                ChunkId::Bmhd => header = Some(BitmapHeader::parse(payload)?),
                other => log::debug!("ignoring {other} chunk in {form:?}"),
            }
            Ok(())
        },
    )?;
    Ok((header, body.is_some()))
}

/// Decode an RGBN/RGB8 image to opaque RGBA8.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, IffError> {
    let (form, mut cursor) = iff::open_form(data, FORMS)?;
    let (header, has_body) = walk(form, &mut cursor, stop)?;
    let header = header.ok_or_else(|| IffError::InvalidHeader("missing BMHD chunk".into()))?;
    let (word, planes) = RunWord::for_form(form).ok_or(IffError::UnrecognizedFormat)?;

    if header.width == 0 || header.height == 0 {
        return Err(IffError::InvalidHeader(alloc::format!(
            "image dimensions {}x{} must be positive",
            header.width,
            header.height
        )));
    }
    if header.compression != COMPRESSION_RUNS || header.planes != planes {
        return Err(IffError::UnsupportedVariant(alloc::format!(
            "{form:?} with {} planes, compression {}",
            header.planes,
            header.compression
        )));
    }
    if !has_body {
        return Err(IffError::InvalidHeader(alloc::format!(
            "{form:?}: missing BODY chunk"
        )));
    }

    let (width, height) = (u32::from(header.width), u32::from(header.height));
    let out_bytes = check_output(limits, width, height)?;
    stop.check()?;
    let mut pixels = vec![0u8; out_bytes];
    let mut done = 0;
    let result = decode::decode_runs(
        word,
        width as usize,
        &mut cursor,
        &mut pixels,
        &mut done,
        stop,
    );
    let rows = (done / width as usize) as u32;
    iff::settle(result, form, rows, height)?;
    // a row the body stopped inside is not kept
    pixels[rows as usize * width as usize * 4..].fill(0);

    Ok(DecodeOutput::new(pixels, width, height, form, rows))
}

pub(crate) fn probe(data: &[u8]) -> Result<ImageInfo, IffError> {
    let (form, mut cursor) = iff::open_form(data, FORMS)?;
    let (header, _) = walk(form, &mut cursor, &enough::Unstoppable)?;
    let header = header.ok_or_else(|| IffError::InvalidHeader("missing BMHD chunk".into()))?;
    Ok(ImageInfo {
        form,
        width: u32::from(header.width),
        height: u32::from(header.height),
        bits_per_pixel: u16::from(header.planes),
        compression: u16::from(header.compression),
        masking: Some(header.masking),
        transparent_color: (header.masking == Masking::TransparentColor)
            .then_some(header.transparent_color),
    })
}
