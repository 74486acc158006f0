#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
}

fn form(tag: &[u8; 4], chunks: &[u8]) -> Vec<u8> {
    let mut out = b"FORM".to_vec();
    out.extend_from_slice(&(chunks.len() as u32 + 4).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(chunks);
    out
}

fn bmhd(w: u16, h: u16, planes: u8, compression: u8) -> Vec<u8> {
    let mut p = vec![0u8; 20];
    p[0..2].copy_from_slice(&w.to_be_bytes());
    p[2..4].copy_from_slice(&h.to_be_bytes());
    p[8] = planes;
    p[10] = compression;
    p
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // ILBM 4-plane 16x2, ByteRun1
    let mut c = Vec::new();
    chunk(&mut c, b"BMHD", &bmhd(16, 2, 4, 1));
    chunk(&mut c, b"CMAP", &(0..48).map(|i| i as u8 * 5).collect::<Vec<_>>());
    chunk(&mut c, b"BODY", &[0xf9, 0x00, 0x07, 1, 2, 3, 4, 5, 6, 7, 8]);
    fs::write(format!("{dir}/ilbm_4plane.iff"), form(b"ILBM", &c)).unwrap();

    // HAM6 with CAMG
    let mut c = Vec::new();
    chunk(&mut c, b"BMHD", &bmhd(16, 1, 6, 0));
    chunk(&mut c, b"CAMG", &0x800u32.to_be_bytes());
    chunk(&mut c, b"CMAP", &[0x10; 48]);
    chunk(&mut c, b"BODY", &[0x55; 12]);
    fs::write(format!("{dir}/ilbm_ham6.iff"), form(b"ILBM", &c)).unwrap();

    // PBM 3x2
    let mut c = Vec::new();
    chunk(&mut c, b"BMHD", &bmhd(3, 2, 8, 0));
    chunk(&mut c, b"BODY", &[1, 2, 3, 0, 4, 5, 6, 0]);
    fs::write(format!("{dir}/pbm_3x2.iff"), form(b"PBM ", &c)).unwrap();

    // ACBM 16x1, 2 planes
    let mut c = Vec::new();
    chunk(&mut c, b"BMHD", &bmhd(16, 1, 2, 0));
    chunk(&mut c, b"ABIT", &[0xf0, 0x0f, 0xaa, 0x55]);
    fs::write(format!("{dir}/acbm_2plane.iff"), form(b"ACBM", &c)).unwrap();

    // DEEP RGBA 2x1 with TVDC
    let mut c = Vec::new();
    chunk(&mut c, b"DGBL", &[0, 2, 0, 1, 0, 5, 1, 1]);
    chunk(&mut c, b"DPEL", &[0, 0, 0, 4, 0, 1, 0, 8, 0, 2, 0, 8, 0, 3, 0, 8, 0, 4, 0, 8]);
    let tvdc: Vec<u8> = (0..16i16).flat_map(|i| (i * 3 - 24).to_be_bytes()).collect();
    chunk(&mut c, b"TVDC", &tvdc);
    chunk(&mut c, b"DBOD", &[0x12, 0x34, 0x56, 0x78]);
    fs::write(format!("{dir}/deep_tvdc.iff"), form(b"DEEP", &c)).unwrap();

    // RGBN 4x1 with an extended count
    let mut c = Vec::new();
    chunk(&mut c, b"BMHD", &bmhd(4, 1, 13, 4));
    chunk(&mut c, b"BODY", &[0xf0, 0x01, 0x0f, 0x00, 3]);
    fs::write(format!("{dir}/rgbn_4x1.iff"), form(b"RGBN", &c)).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_form.bin"), b"FORM").unwrap();
    fs::write(format!("{dir}/no_chunks.bin"), b"FORM\0\0\0\x04ILBM").unwrap();
    fs::write(format!("{dir}/odd_chunk.bin"), b"FORM\0\0\0\x10ILBMANNO\0\0\0\x03abcB").unwrap();

    println!("Generated seed corpus in {dir}/");
}
