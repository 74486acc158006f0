//! ILBM chunk walker: collects header, palettes and mode flags.

use alloc::vec::Vec;

use enough::Stop;

use super::palette::{self, Rgb};
use crate::error::IffError;
use crate::iff::bmhd::BitmapHeader;
use crate::iff::chunk::{ChunkHeader, ChunkId, walk_chunks};
use crate::iff::cursor::Cursor;
use crate::info::IffForm;

/// Upper bound on CMAP entries read before a BMHD says how many apply.
const MAX_CMAP_ENTRIES: usize = 1 << 12;

/// Everything the walker learned before the pixel data.
///
/// Built once per decode call and only read after [`IlbmContext::walk`].
#[derive(Debug)]
pub(crate) struct IlbmContext {
    pub form: IffForm,
    pub header: Option<BitmapHeader>,
    /// CMAP colours exactly as stored.
    cmap: Vec<Rgb>,
    /// Base palette: `2^planes` entries once a BMHD is seen, CMAP colours
    /// first and a grey ramp behind them.
    pub palette: Vec<Rgb>,
    /// Number of colours the CMAP supplied, capped at `2^planes`.
    pub cmap_len: Option<usize>,
    /// CAMG viewport mode, if the chunk was present.
    pub camg: Option<u32>,
    /// XBMI mode, if the chunk was present.
    pub xbmi_mode: Option<u16>,
    /// SHAM or CTBL tables, one per output line (or per two lines when laced).
    pub line_palettes: Vec<Vec<Rgb>>,
    /// Rows carried by a SHAM chunk.
    sham_rows: Option<usize>,
    /// Each line palette covers two output rows.
    pub laced: bool,
    /// BODY (or ABIT for ACBM). The walker stops at its first payload byte.
    pub body: Option<ChunkHeader>,
}

impl IlbmContext {
    fn new(form: IffForm) -> Self {
        Self {
            form,
            header: None,
            cmap: Vec::new(),
            palette: Vec::new(),
            cmap_len: None,
            camg: None,
            xbmi_mode: None,
            line_palettes: Vec::new(),
            sham_rows: None,
            laced: false,
            body: None,
        }
    }

    /// Walk chunks from just after the form type up to the pixel data.
    pub(crate) fn walk(
        form: IffForm,
        cursor: &mut Cursor<'_>,
        stop: &dyn Stop,
    ) -> Result<Self, IffError> {
        let mut ctx = Self::new(form);
        let data_id = if form == IffForm::Acbm {
            ChunkId::Abit
        } else {
            ChunkId::Body
        };
        let body = walk_chunks(cursor, stop, |id| id == data_id, |id, payload| {
            ctx.read_chunk(id, payload)
        })?;
        ctx.body = body;
        ctx.finish();
        Ok(ctx)
    }

    fn read_chunk(&mut self, id: ChunkId, payload: &[u8]) -> Result<(), IffError> {
        match id {
            ChunkId::Bmhd => {
                self.header = Some(BitmapHeader::parse(payload)?);
                self.rebuild_palette();
            }
            ChunkId::Cmap => {
                self.cmap = palette::read_cmap(payload, MAX_CMAP_ENTRIES);
                self.rebuild_palette();
            }
            ChunkId::Camg => {
                let camg = Cursor::new(payload).read_u32_be()?;
                log::trace!("CAMG {camg:#x}");
                self.camg = Some(camg);
            }
            ChunkId::Sham => {
                // version word, then one table per line
                let tables = palette::read_line_palettes(payload.get(2..).unwrap_or(&[]))?;
                self.sham_rows = Some(tables.len());
                self.line_palettes.extend(tables);
            }
            ChunkId::Ctbl => {
                let tables = palette::read_line_palettes(payload)?;
                self.line_palettes.extend(tables);
            }
            ChunkId::Xbmi => {
                let mode = Cursor::new(payload).read_u16_be()?;
                log::trace!("XBMI mode {mode}");
                self.xbmi_mode = Some(mode);
            }
            other => log::debug!("ignoring {other} chunk in {:?}", self.form),
        }
        Ok(())
    }

    /// Rebuild the base palette from the header's plane count and the CMAP.
    ///
    /// Depth normalisation only looks at the colours the planes can address,
    /// so stray entries past `2^planes` never decide it.
    fn rebuild_palette(&mut self) {
        let planes = match self.header {
            Some(h) if h.planes <= 12 => h.planes,
            Some(_) => {
                // truecolour planes carry colour directly
                self.palette.clear();
                self.cmap_len = None;
                return;
            }
            None => {
                self.palette.clone_from(&self.cmap);
                palette::normalize_depth(&mut self.palette);
                self.cmap_len = (!self.cmap.is_empty()).then_some(self.cmap.len());
                return;
            }
        };
        let mut pal = palette::grey_ramp(planes);
        let n = self.cmap.len().min(pal.len());
        pal[..n].copy_from_slice(&self.cmap[..n]);
        palette::normalize_depth(&mut pal[..n]);
        self.palette = pal;
        self.cmap_len = (!self.cmap.is_empty()).then_some(n);
    }

    fn finish(&mut self) {
        if let (Some(rows), Some(h)) = (self.sham_rows, self.header) {
            self.laced = rows > 0 && rows < usize::from(h.height);
        }
        log::trace!(
            "{:?}: CMAP {:?}, {} line palettes{}",
            self.form,
            self.cmap_len,
            self.line_palettes.len(),
            if self.laced { " (laced)" } else { "" },
        );
    }
}
