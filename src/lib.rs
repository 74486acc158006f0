//! # zeniff
//!
//! IFF bitmap image decoder: ILBM and its relatives, decoded to RGBA8.
//!
//! ## Supported Formats
//!
//! ### Bitplane forms
//! - **ILBM**: interleaved bitplanes, 1 to 12 planes indexed, 24/32 planes truecolour
//! - **PBM**: chunky 8-bit (Deluxe Paint PC)
//! - **ACBM**: contiguous bitplanes (`ABIT` chunk)
//! - Uncompressed and ByteRun1 bodies
//! - HAM6/HAM8, Extra Half-Brite, SHAM/CTBL per-line palettes, XBMI greyscale
//!
//! ### Truecolour forms
//! - **DEEP / TVPP**: 8-bit RGB(A) elements; raw, element-run and TVDC bodies
//! - **RGBN / RGB8**: Impulse run-length truecolour
//!
//! ## Damaged files
//!
//! A body that ends early still decodes: the rows read so far are returned
//! and the rest are zero (transparent black). Check
//! [`DecodeOutput::is_complete`] to tell. Runs that overshoot a row are
//! clipped rather than rejected.
//! Header problems (unknown plane counts, unsupported compression,
//! mask planes) fail the decode outright.
//!
//! ## Non-Goals
//!
//! - Encoding
//! - ANIM and other multi-image FORMs
//! - Mask-plane transparency
//! - Colour management
//!
//! ## Usage
//!
//! ```no_run
//! use zeniff::{DecodeRequest, ImageInfo, Unstoppable};
//!
//! let data: &[u8] = &[]; // your IFF bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width, info.height, info.form);
//!
//! let image = DecodeRequest::new(data).decode(Unstoppable)?;
//! assert_eq!(image.pixels().len(), image.width as usize * image.height as usize * 4);
//! # Ok::<(), zeniff::IffError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod deep;
mod error;
mod iff;
mod ilbm;
mod info;
mod limits;
mod rgbn;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use enough::{Stop, Unstoppable};
pub use error::IffError;
pub use iff::bmhd::Masking;
pub use info::{IffForm, ImageInfo};
pub use limits::Limits;

/// Decode any supported IFF image, detecting the form type.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, IffError> {
    DecodeRequest::new(data).decode(stop)
}

/// Decode an ILBM, PBM or ACBM image.
pub fn decode_ilbm(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, IffError> {
    ilbm::decode(data, None, &stop)
}

/// Decode a DEEP or TVPP image. With `want_opacity` false an alpha
/// element is read and discarded.
pub fn decode_deep(
    data: &[u8],
    want_opacity: bool,
    stop: impl Stop,
) -> Result<DecodeOutput, IffError> {
    deep::decode(data, want_opacity, None, &stop)
}

/// Decode an RGBN or RGB8 image.
pub fn decode_rgbn(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, IffError> {
    rgbn::decode(data, None, &stop)
}

/// Read and decode an ILBM, PBM or ACBM file.
#[cfg(feature = "std")]
pub fn load_ilbm(path: impl AsRef<std::path::Path>) -> Result<DecodeOutput, IffError> {
    decode_ilbm(&std::fs::read(path)?, Unstoppable)
}

/// Read and decode a DEEP or TVPP file.
#[cfg(feature = "std")]
pub fn load_deep(
    path: impl AsRef<std::path::Path>,
    want_opacity: bool,
) -> Result<DecodeOutput, IffError> {
    decode_deep(&std::fs::read(path)?, want_opacity, Unstoppable)
}

/// Read and decode an RGBN or RGB8 file.
#[cfg(feature = "std")]
pub fn load_rgbn(path: impl AsRef<std::path::Path>) -> Result<DecodeOutput, IffError> {
    decode_rgbn(&std::fs::read(path)?, Unstoppable)
}
