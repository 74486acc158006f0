#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Headers can declare 65535x65535; keep allocations small
    let limits = zeniff::Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };

    // Must never panic, and any output must be exactly width*height RGBA
    for opacity in [true, false] {
        if let Ok(image) = zeniff::DecodeRequest::new(data)
            .with_limits(&limits)
            .with_opacity(opacity)
            .decode(enough::Unstoppable)
        {
            assert_eq!(
                image.pixels().len(),
                image.width as usize * image.height as usize * 4
            );
            assert!(image.rows_decoded() <= image.height);
        }
    }

    let _ = zeniff::ImageInfo::from_bytes(data);
});
