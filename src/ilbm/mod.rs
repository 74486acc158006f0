//! ILBM, PBM and ACBM decoding (internal).
//!
//! All three share the BMHD/CMAP/CAMG chunk set and differ only in how the
//! body lays out bitplanes. Decoding runs in three fixed phases: the chunk
//! walker collects an [`IlbmContext`], [`mode::resolve`] turns it into a
//! decode plan, and [`synth::synthesize`] writes RGBA rows.

mod context;
mod mode;
mod palette;
mod synth;

use alloc::vec;

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::IffError;
use crate::iff::{self, bmhd::Masking};
use crate::info::{IffForm, ImageInfo};
use crate::limits::{Limits, check_output};
use context::IlbmContext;
use synth::RowReader;

pub(crate) const FORMS: &[IffForm] = &[IffForm::Ilbm, IffForm::Pbm, IffForm::Acbm];

/// Decode a bitplane IFF image to RGBA8.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, IffError> {
    let (form, mut cursor) = iff::open_form(data, FORMS)?;
    let ctx = IlbmContext::walk(form, &mut cursor, stop)?;
    let plan = mode::resolve(&ctx)?;
    let body = ctx.body.ok_or_else(|| {
        IffError::InvalidHeader(alloc::format!("{form:?}: missing BODY/ABIT chunk"))
    })?;
    let reader = RowReader::new(&plan, body.start)?;
    log::trace!(
        "{form:?}: {}x{} {:?}, {} colours over {} index bits, {} body {} bytes",
        plan.width,
        plan.height,
        plan.mode,
        plan.colors,
        plan.color_bits,
        body.id,
        body.len
    );

    let out_bytes = check_output(limits, plan.width, plan.height)?;
    stop.check()?;
    let mut pixels = vec![0u8; out_bytes];
    let mut rows = 0;
    let result = synth::synthesize(
        &ctx,
        &plan,
        &reader,
        &mut cursor,
        &mut pixels,
        &mut rows,
        stop,
    );
    iff::settle(result, form, rows, plan.height)?;

    Ok(DecodeOutput::new(pixels, plan.width, plan.height, form, rows))
}

/// Read the BMHD without decoding the body.
pub(crate) fn probe(data: &[u8]) -> Result<ImageInfo, IffError> {
    let (form, mut cursor) = iff::open_form(data, FORMS)?;
    let ctx = IlbmContext::walk(form, &mut cursor, &enough::Unstoppable)?;
    let header = ctx
        .header
        .ok_or_else(|| IffError::InvalidHeader("missing BMHD chunk".into()))?;
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
