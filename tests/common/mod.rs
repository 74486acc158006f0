//! In-memory IFF file builder for integration tests.

#![allow(dead_code)]

/// Builds a `FORM` with a chosen form type and chunk list.
pub struct Iff {
    form: [u8; 4],
    chunks: Vec<u8>,
}

impl Iff {
    pub fn new(form: &[u8; 4]) -> Self {
        Self {
            form: *form,
            chunks: Vec::new(),
        }
    }

    /// Append a chunk, padded to even length.
    pub fn chunk(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.chunks.extend_from_slice(tag);
        self.chunks
            .extend_from_slice(&(payload.len() as u32).to_be_bytes());
        self.chunks.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            self.chunks.push(0);
        }
        self
    }

    /// Append a chunk without the pad byte, as some writers do.
    pub fn unpadded_chunk(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.chunks.extend_from_slice(tag);
        self.chunks
            .extend_from_slice(&(payload.len() as u32).to_be_bytes());
        self.chunks.extend_from_slice(payload);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = b"FORM".to_vec();
        out.extend_from_slice(&(self.chunks.len() as u32 + 4).to_be_bytes());
        out.extend_from_slice(&self.form);
        out.extend_from_slice(&self.chunks);
        out
    }
}

/// 20-byte BMHD payload.
pub fn bmhd(width: u16, height: u16, planes: u8, masking: u8, compression: u8) -> Vec<u8> {
    let mut p = vec![0u8; 20];
    p[0..2].copy_from_slice(&width.to_be_bytes());
    p[2..4].copy_from_slice(&height.to_be_bytes());
    p[8] = planes;
    p[9] = masking;
    p[10] = compression;
    // aspect 10:11
    p[14] = 10;
    p[15] = 11;
    p
}

pub fn cmap(colors: &[[u8; 3]]) -> Vec<u8> {
    colors.iter().flatten().copied().collect()
}

/// One interleaved ILBM row: each plane's bits, word-aligned, plane 0 first.
pub fn planar_row(indices: &[u32], planes: u8) -> Vec<u8> {
    let plane_bytes = indices.len().div_ceil(16) * 2;
    let mut row = vec![0u8; plane_bytes * usize::from(planes)];
    for p in 0..usize::from(planes) {
        for (x, &idx) in indices.iter().enumerate() {
            if (idx >> p) & 1 == 1 {
                row[p * plane_bytes + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    row
}

/// ByteRun1-pack a row using only literal runs of up to 128 bytes.
pub fn pack_literals(row: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for run in row.chunks(128) {
        out.push((run.len() - 1) as u8);
        out.extend_from_slice(run);
    }
    out
}

/// RGBA pixel at `(x, y)`.
pub fn px(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}
