use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::error::IffError;
use crate::iff::chunk::{ChunkHeader, ChunkId, walk_chunks};
use crate::iff::cursor::Cursor;
use crate::iff::rle;
use crate::info::IffForm;

/// DGBL: global image header.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GlobalHeader {
    pub width: u16,
    pub height: u16,
    pub compression: u16,
}

impl GlobalHeader {
    fn parse(payload: &[u8]) -> Result<Self, IffError> {
        let mut c = Cursor::new(payload);
        let width = c.read_u16_be()?;
        let height = c.read_u16_be()?;
        let compression = c.read_u16_be()?;
        log::trace!("DGBL {width}x{height}, compression {compression}");
        Ok(Self {
            width,
            height,
            compression,
        })
    }
}

/// DPEL element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ElementKind {
    Red,
    Green,
    Blue,
    Alpha,
    Other(u16),
}

impl ElementKind {
    fn from_u16(v: u16) -> Self {
        match v {
            1 => Self::Red,
            2 => Self::Green,
            3 => Self::Blue,
            4 => Self::Alpha,
            other => Self::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Element {
    pub kind: ElementKind,
    pub depth: u16,
}

/// Chunks gathered before DBOD.
#[derive(Debug, Default)]
pub(crate) struct DeepContext {
    pub header: Option<GlobalHeader>,
    pub elements: Vec<Element>,
    /// DLOC width and height.
    pub location: Option<(u16, u16)>,
    pub tvdc: Option<[i16; 16]>,
    pub body: Option<ChunkHeader>,
}

/// DPEL element counts beyond this are not a pixel layout we can decode.
const MAX_ELEMENTS: u32 = 16;

impl DeepContext {
    pub(crate) fn walk(
        form: IffForm,
        cursor: &mut Cursor<'_>,
        stop: &dyn Stop,
    ) -> Result<Self, IffError> {
        let mut ctx = Self::default();
        let body = walk_chunks(
            cursor,
            stop,
            |id| id == ChunkId::Dbod,
            |id, payload| ctx.read_chunk(form, id, payload),
        )?;
        ctx.body = body;
        Ok(ctx)
    }

    fn read_chunk(&mut self, form: IffForm, id: ChunkId, payload: &[u8]) -> Result<(), IffError> {
        let mut c = Cursor::new(payload);
        match id {
            ChunkId::Dgbl => self.header = Some(GlobalHeader::parse(payload)?),
            ChunkId::Dpel => {
                let count = c.read_u32_be()?;
                if count > MAX_ELEMENTS {
                    return Err(IffError::UnsupportedVariant(alloc::format!(
                        "{count} pixel elements"
                    )));
                }
                self.elements.clear();
                for _ in 0..count {
                    let kind = ElementKind::from_u16(c.read_u16_be()?);
                    let depth = c.read_u16_be()?;
                    self.elements.push(Element { kind, depth });
                }
                log::trace!("DPEL {:?}", self.elements);
            }
            ChunkId::Dloc => {
                let w = c.read_u16_be()?;
                let h = c.read_u16_be()?;
                log::trace!("DLOC {w}x{h}");
                self.location = Some((w, h));
            }
            ChunkId::Tvdc => {
                let mut table = [0i16; 16];
                for entry in &mut table {
                    *entry = c.read_i16_be()?;
                }
                self.tvdc = Some(table);
            }
            other => log::debug!("ignoring {other} chunk in {form:?}"),
        }
        Ok(())
    }
}

/// How DBOD rows are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BodyCoding {
    /// Interleaved element bytes, one pixel after another.
    Raw,
    /// PackBits over whole pixels.
    Runs,
    /// One TVDC line per element per row.
    Tvdc([i16; 16]),
}

/// Validated decode plan.
#[derive(Clone, Debug)]
pub(crate) struct DeepPlan {
    pub width: u32,
    pub height: u32,
    pub coding: BodyCoding,
    /// Output channel (0..4) for each element, `None` if discarded.
    pub channels: Vec<Option<usize>>,
}

impl DeepPlan {
    pub(crate) fn resolve(ctx: &DeepContext, want_opacity: bool) -> Result<Self, IffError> {
        let header = ctx
            .header
            .ok_or_else(|| IffError::InvalidHeader("missing DGBL chunk".into()))?;
        let (width, height) = match ctx.location {
            Some((w, h)) if w != 0 && h != 0 => (w, h),
            _ => (header.width, header.height),
        };
        if width == 0 || height == 0 {
            return Err(IffError::InvalidHeader(alloc::format!(
                "image dimensions {width}x{height} must be positive"
            )));
        }

        if !matches!(ctx.elements.len(), 3 | 4) {
            return Err(IffError::UnsupportedVariant(alloc::format!(
                "{} pixel elements",
                ctx.elements.len()
            )));
        }
        let channels = ctx
            .elements
            .iter()
            .map(|e| {
                if e.depth != 8 {
                    return Err(IffError::UnsupportedVariant(alloc::format!(
                        "{}-bit {:?} element",
                        e.depth,
                        e.kind
                    )));
                }
                match e.kind {
                    ElementKind::Red => Ok(Some(0)),
                    ElementKind::Green => Ok(Some(1)),
                    ElementKind::Blue => Ok(Some(2)),
                    ElementKind::Alpha => Ok(want_opacity.then_some(3)),
                    ElementKind::Other(t) => Err(IffError::UnsupportedVariant(alloc::format!(
                        "pixel element type {t}"
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let coding = match header.compression {
            0 => BodyCoding::Raw,
            1 => BodyCoding::Runs,
            5 => BodyCoding::Tvdc(ctx.tvdc.ok_or_else(|| {
                IffError::InvalidHeader("TVDC compression without a TVDC chunk".into())
            })?),
            n => {
                return Err(IffError::UnsupportedVariant(alloc::format!(
                    "DEEP compression {n}"
                )));
            }
        };

        Ok(Self {
            width: u32::from(width),
            height: u32::from(height),
            coding,
            channels,
        })
    }
}

/// Decode DBOD rows into `out` (RGBA, zero-filled). `rows_done` counts rows
/// fully written.
pub(crate) fn decode_rows(
    plan: &DeepPlan,
    cursor: &mut Cursor<'_>,
    out: &mut [u8],
    rows_done: &mut u32,
    stop: &dyn Stop,
) -> Result<(), IffError> {
    let width = plan.width as usize;
    let n = plan.channels.len();
    let mut row = vec![0u8; width * n];
    let mut line = vec![0u8; width];

    for (y, out_row) in out.chunks_exact_mut(width * 4).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        match plan.coding {
            BodyCoding::Raw => cursor.read_exact(&mut row)?,
            BodyCoding::Runs => rle::unpack_runs(cursor, &mut row, n)?,
            BodyCoding::Tvdc(ref table) => {
                for e in 0..n {
                    rle::unpack_tvdc(cursor, table, &mut line)?;
                    for (px, &v) in row.chunks_exact_mut(n).zip(&line) {
                        px[e] = v;
                    }
                }
            }
        }
        for (dst, src) in out_row.chunks_exact_mut(4).zip(row.chunks_exact(n)) {
            let mut rgba = [0, 0, 0, 0xff];
            for (&v, ch) in src.iter().zip(&plan.channels) {
                if let Some(ch) = *ch {
                    rgba[ch] = v;
                }
            }
            dst.copy_from_slice(&rgba);
        }
        *rows_done += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(compression: u16, elements: &[(u16, u16)]) -> DeepContext {
        DeepContext {
            header: Some(GlobalHeader {
                width: 2,
                height: 1,
                compression,
            }),
            elements: elements
                .iter()
                .map(|&(t, depth)| Element {
                    kind: ElementKind::from_u16(t),
                    depth,
                })
                .collect(),
            ..Default::default()
        }
    }

    const RGBA: &[(u16, u16)] = &[(1, 8), (2, 8), (3, 8), (4, 8)];

    #[test]
    fn alpha_follows_opacity_flag() {
        let plan = DeepPlan::resolve(&ctx(0, RGBA), true).unwrap();
        assert_eq!(plan.channels, [Some(0), Some(1), Some(2), Some(3)]);
        let plan = DeepPlan::resolve(&ctx(0, RGBA), false).unwrap();
        assert_eq!(plan.channels[3], None);
    }

    #[test]
    fn element_order_maps_to_channels() {
        let plan = DeepPlan::resolve(&ctx(0, &[(3, 8), (2, 8), (1, 8)]), true).unwrap();
        assert_eq!(plan.channels, [Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn rejects_unsupported_layouts() {
        let layouts: [&[(u16, u16)]; 3] = [
            &[(1, 8), (2, 8)],
            &[(1, 8), (2, 8), (3, 16)],
            &[(1, 8), (2, 8), (9, 8)],
        ];
        for elements in layouts {
            assert!(matches!(
                DeepPlan::resolve(&ctx(0, elements), true),
                Err(IffError::UnsupportedVariant(_))
            ));
        }
        assert!(matches!(
            DeepPlan::resolve(&ctx(3, RGBA), true),
            Err(IffError::UnsupportedVariant(_))
        ));
        assert!(matches!(
            DeepPlan::resolve(&ctx(5, RGBA), true),
            Err(IffError::InvalidHeader(_))
        ));
    }

    #[test]
    fn dloc_overrides_size() {
        let mut c = ctx(0, RGBA);
        c.location = Some((7, 3));
        let plan = DeepPlan::resolve(&c, true).unwrap();
        assert_eq!((plan.width, plan.height), (7, 3));
    }

    #[test]
    fn element_runs_repeat_whole_pixels() {
        let plan = DeepPlan::resolve(&ctx(1, &[(1, 8), (2, 8), (3, 8)]), true).unwrap();
        // repeat one RGB triple twice
        let body = [0xff, 1, 2, 3];
        let mut out = vec![0u8; 8];
        let mut rows = 0;
        decode_rows(&plan, &mut Cursor::new(&body), &mut out, &mut rows, &enough::Unstoppable)
            .unwrap();
        assert_eq!(out, [1, 2, 3, 0xff, 1, 2, 3, 0xff]);
        assert_eq!(rows, 1);
    }

    #[test]
    fn tvdc_decodes_each_element_line() {
        let mut c = ctx(5, &[(1, 8), (2, 8), (3, 8)]);
        let mut table = [0i16; 16];
        table[1] = 1;
        table[2] = 16;
        c.tvdc = Some(table);
        let plan = DeepPlan::resolve(&c, true).unwrap();
        // red: +1, +1; green: +16, repeat once; blue: repeat twice
        let body = [0x11, 0x20, 0x00, 0x01];
        let mut out = vec![0u8; 8];
        let mut rows = 0;
        decode_rows(&plan, &mut Cursor::new(&body), &mut out, &mut rows, &enough::Unstoppable)
            .unwrap();
        assert_eq!(out, [1, 16, 0, 0xff, 2, 16, 0, 0xff]);
    }
}
