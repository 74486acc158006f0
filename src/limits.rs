use crate::IffError;

/// Resource limits for decode operations.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size in bytes of the RGBA output buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check the dimensions a walker resolved, before anything is allocated.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), IffError> {
        let pixels = u64::from(width) * u64::from(height);
        exceeds("width", u64::from(width), self.max_width)?;
        exceeds("height", u64::from(height), self.max_height)?;
        exceeds("pixel count", pixels, self.max_pixels)
    }

    /// Check the RGBA output allocation against the memory limit.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), IffError> {
        exceeds("output allocation", bytes as u64, self.max_memory_bytes)
    }
}

fn exceeds(what: &str, value: u64, limit: Option<u64>) -> Result<(), IffError> {
    match limit {
        Some(max) if value > max => Err(IffError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

/// Size in bytes of a `width` x `height` RGBA8 buffer.
pub(crate) fn rgba_len(width: u32, height: u32) -> Result<usize, IffError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or(IffError::DimensionsTooLarge { width, height })
}

/// Apply optional limits to a resolved image size and return its RGBA length.
pub(crate) fn check_output(
    limits: Option<&Limits>,
    width: u32,
    height: u32,
) -> Result<usize, IffError> {
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }
    let out_bytes = rgba_len(width, height)?;
    if let Some(limits) = limits {
        limits.check_memory(out_bytes)?;
    }
    Ok(out_bytes)
}
