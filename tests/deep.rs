//! DEEP and TVPP decoding.

mod common;

use common::{Iff, px};
use enough::Unstoppable;
use zeniff::*;

const RGB: &[(u16, u16)] = &[(1, 8), (2, 8), (3, 8)];
const RGBA: &[(u16, u16)] = &[(1, 8), (2, 8), (3, 8), (4, 8)];

fn dgbl(width: u16, height: u16, compression: u16) -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(&width.to_be_bytes());
    p.extend_from_slice(&height.to_be_bytes());
    p.extend_from_slice(&compression.to_be_bytes());
    p.extend_from_slice(&[1, 1]);
    p
}

fn dpel(elements: &[(u16, u16)]) -> Vec<u8> {
    let mut p = (elements.len() as u32).to_be_bytes().to_vec();
    for &(kind, depth) in elements {
        p.extend_from_slice(&kind.to_be_bytes());
        p.extend_from_slice(&depth.to_be_bytes());
    }
    p
}

fn deep(form: &[u8; 4], header: Vec<u8>, elements: &[(u16, u16)], body: &[u8]) -> Vec<u8> {
    Iff::new(form)
        .chunk(b"DGBL", &header)
        .chunk(b"DPEL", &dpel(elements))
        .chunk(b"DBOD", body)
        .build()
}

#[test]
fn raw_rgb() {
    let data = deep(b"DEEP", dgbl(2, 1, 0), RGB, &[1, 2, 3, 4, 5, 6]);
    let image = decode_deep(&data, true, Unstoppable).unwrap();
    assert_eq!(image.form, IffForm::Deep);
    assert_eq!(image.pixels(), [1, 2, 3, 0xff, 4, 5, 6, 0xff]);
    assert!(image.is_complete());
}

#[test]
fn alpha_element_honours_opacity_flag() {
    let data = deep(b"DEEP", dgbl(1, 1, 0), RGBA, &[9, 8, 7, 0x40]);
    let kept = decode_deep(&data, true, Unstoppable).unwrap();
    assert_eq!(kept.pixels(), [9, 8, 7, 0x40]);
    let dropped = decode_deep(&data, false, Unstoppable).unwrap();
    assert_eq!(dropped.pixels(), [9, 8, 7, 0xff]);

    let via_request = DecodeRequest::new(&data)
        .with_opacity(false)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(via_request.pixels(), [9, 8, 7, 0xff]);
    assert_eq!(decode(&data, Unstoppable).unwrap().pixels(), [9, 8, 7, 0x40]);
}

#[test]
fn element_order_is_respected() {
    // B, G, R storage order
    let data = deep(b"DEEP", dgbl(1, 1, 0), &[(3, 8), (2, 8), (1, 8)], &[1, 2, 3]);
    let image = decode_deep(&data, true, Unstoppable).unwrap();
    assert_eq!(image.pixels(), [3, 2, 1, 0xff]);
}

#[test]
fn tvpp_element_runs() {
    // row 0: three copies of one pixel; row 1: literal of three pixels
    let body = [
        0xfe, 10, 20, 30, //
        0x02, 1, 1, 1, 2, 2, 2, 3, 3, 3,
    ];
    let data = deep(b"TVPP", dgbl(3, 2, 1), RGB, &body);
    let image = decode_deep(&data, true, Unstoppable).unwrap();
    assert_eq!(image.form, IffForm::Tvpp);
    for x in 0..3 {
        assert_eq!(px(image.pixels(), 3, x, 0), [10, 20, 30, 0xff]);
    }
    assert_eq!(px(image.pixels(), 3, 2, 1), [3, 3, 3, 0xff]);
}

#[test]
fn tvdc_delta_rows() {
    let mut table = [0i16; 16];
    table[1] = 1;
    table[2] = 16;
    let tvdc: Vec<u8> = table.iter().flat_map(|d| d.to_be_bytes()).collect();
    // per row: R line, G line, B line
    let body = [0x11, 0x22, 0x01, 0x12, 0x01, 0x22];
    let data = Iff::new(b"DEEP")
        .chunk(b"DGBL", &dgbl(2, 2, 5))
        .chunk(b"DPEL", &dpel(RGB))
        .chunk(b"TVDC", &tvdc)
        .chunk(b"DBOD", &body)
        .build();
    let image = decode_deep(&data, true, Unstoppable).unwrap();
    assert_eq!(px(image.pixels(), 2, 0, 0), [1, 16, 0, 0xff]);
    assert_eq!(px(image.pixels(), 2, 1, 0), [2, 32, 0, 0xff]);
    assert_eq!(px(image.pixels(), 2, 0, 1), [1, 0, 16, 0xff]);
    assert_eq!(px(image.pixels(), 2, 1, 1), [17, 0, 32, 0xff]);
}

#[test]
fn tvdc_without_table_fails() {
    let data = deep(b"DEEP", dgbl(1, 1, 5), RGB, &[0; 4]);
    assert!(matches!(
        decode_deep(&data, true, Unstoppable),
        Err(IffError::InvalidHeader(_))
    ));
}

#[test]
fn dloc_overrides_global_size() {
    let data = Iff::new(b"DEEP")
        .chunk(b"DGBL", &dgbl(640, 480, 0))
        .chunk(b"DPEL", &dpel(RGB))
        .chunk(b"DLOC", &[0, 2, 0, 1, 0, 0, 0, 0])
        .chunk(b"DBOD", &[1, 2, 3, 4, 5, 6])
        .build();
    let image = decode_deep(&data, true, Unstoppable).unwrap();
    assert_eq!((image.width, image.height), (2, 1));
    let info = ImageInfo::from_bytes(&data).unwrap();
    assert_eq!((info.width, info.height), (2, 1));
    assert_eq!(info.bits_per_pixel, 24);
    assert_eq!(info.masking, None);
}

#[test]
fn unsupported_layouts_fail() {
    for (compression, elements) in [
        (2, RGB),
        (0, &[(1, 8), (2, 8)][..]),
        (0, &[(1, 16), (2, 16), (3, 16)][..]),
    ] {
        let data = deep(b"DEEP", dgbl(1, 1, compression), elements, &[0; 8]);
        assert!(matches!(
            decode_deep(&data, true, Unstoppable),
            Err(IffError::UnsupportedVariant(_))
        ));
    }
}

#[test]
fn truncated_body_keeps_decoded_rows() {
    let data = deep(b"DEEP", dgbl(2, 2, 0), RGB, &[1, 2, 3, 4, 5, 6, 7, 8]);
    let image = decode_deep(&data, true, Unstoppable).unwrap();
    assert_eq!(image.pixels().len(), 16);
    assert_eq!(image.rows_decoded(), 1);
    assert!(!image.is_complete());
    assert_eq!(&image.pixels()[8..], &[0; 8]);
}

#[test]
fn missing_body_fails() {
    let data = Iff::new(b"DEEP")
        .chunk(b"DGBL", &dgbl(1, 1, 0))
        .chunk(b"DPEL", &dpel(RGB))
        .build();
    assert!(matches!(
        decode_deep(&data, true, Unstoppable),
        Err(IffError::InvalidHeader(_))
    ));
}

#[test]
fn ilbm_is_not_deep() {
    let data = Iff::new(b"ILBM").build();
    assert!(matches!(
        decode_deep(&data, true, Unstoppable),
        Err(IffError::UnrecognizedFormat)
    ));
}
