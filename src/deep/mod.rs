//! DEEP and TVPP decoding (internal).
//!
//! Chunky truecolour: DPEL lists the per-pixel elements (R, G, B and
//! optionally A, 8 bits each), DBOD holds the rows raw, as whole-pixel
//! PackBits runs, or as TVDC delta lines per element.

pub(crate) mod decode;

use alloc::vec;

use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::IffError;
use crate::iff;
use crate::info::{IffForm, ImageInfo};
use crate::limits::{Limits, check_output};
use decode::{DeepContext, DeepPlan};

pub(crate) const FORMS: &[IffForm] = &[IffForm::Deep, IffForm::Tvpp];

/// Decode a DEEP/TVPP image to RGBA8. Alpha elements are kept only when
/// `want_opacity` is set.
pub(crate) fn decode(
    data: &[u8],
    want_opacity: bool,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, IffError> {
    let (form, mut cursor) = iff::open_form(data, FORMS)?;
    let ctx = DeepContext::walk(form, &mut cursor, stop)?;
    let plan = DeepPlan::resolve(&ctx, want_opacity)?;
    if ctx.body.is_none() {
        return Err(IffError::InvalidHeader(alloc::format!(
            "{form:?}: missing DBOD chunk"
        )));
    }
    log::trace!(
        "{form:?}: {}x{}, {} elements, {:?}",
        plan.width,
        plan.height,
        plan.channels.len(),
        plan.coding
    );

    let out_bytes = check_output(limits, plan.width, plan.height)?;
    stop.check()?;
    let mut pixels = vec![0u8; out_bytes];
    let mut rows = 0;
    let result = decode::decode_rows(&plan, &mut cursor, &mut pixels, &mut rows, stop);
    iff::settle(result, form, rows, plan.height)?;

    Ok(DecodeOutput::new(pixels, plan.width, plan.height, form, rows))
}

pub(crate) fn probe(data: &[u8]) -> Result<ImageInfo, IffError> {
    let (form, mut cursor) = iff::open_form(data, FORMS)?;
    let ctx = DeepContext::walk(form, &mut cursor, &enough::Unstoppable)?;
    let header = ctx
        .header
        .ok_or_else(|| IffError::InvalidHeader("missing DGBL chunk".into()))?;
    let (width, height) = match ctx.location {
        Some((w, h)) if w != 0 && h != 0 => (w, h),
        _ => (header.width, header.height),
    };
    Ok(ImageInfo {
        form,
        width: u32::from(width),
        height: u32::from(height),
        bits_per_pixel: ctx.elements.iter().map(|e| e.depth).fold(0, u16::saturating_add),
        compression: header.compression,
        masking: None,
        transparent_color: None,
    })
}
