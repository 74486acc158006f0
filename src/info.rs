use crate::error::IffError;
use crate::iff::bmhd::Masking;

/// IFF form type, read from the four bytes after the `FORM` header.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IffForm {
    /// Interleaved bitplanes.
    Ilbm,
    /// Chunky 8-bit ("PBM "), as written by Deluxe Paint on PC.
    Pbm,
    /// Contiguous bitplanes in an `ABIT` chunk.
    Acbm,
    /// Deep (chunky truecolour with per-element layout).
    Deep,
    /// TVPaint flavour of DEEP.
    Tvpp,
    /// Impulse 12-bit RGB with run counts.
    Rgbn,
    /// Impulse 24-bit RGB with run counts.
    Rgb8,
}

impl IffForm {
    pub fn from_tag(tag: [u8; 4]) -> Option<Self> {
        match &tag {
            b"ILBM" => Some(Self::Ilbm),
            b"PBM " => Some(Self::Pbm),
            b"ACBM" => Some(Self::Acbm),
            b"DEEP" => Some(Self::Deep),
            b"TVPP" => Some(Self::Tvpp),
            b"RGBN" => Some(Self::Rgbn),
            b"RGB8" => Some(Self::Rgb8),
            _ => None,
        }
    }

    pub fn tag(self) -> [u8; 4] {
        match self {
            Self::Ilbm => *b"ILBM",
            Self::Pbm => *b"PBM ",
            Self::Acbm => *b"ACBM",
            Self::Deep => *b"DEEP",
            Self::Tvpp => *b"TVPP",
            Self::Rgbn => *b"RGBN",
            Self::Rgb8 => *b"RGB8",
        }
    }

    /// Detect the form from the first 12 bytes of a file.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.len() < 12 || &data[0..4] != b"FORM" {
            return None;
        }
        Self::from_tag([data[8], data[9], data[10], data[11]])
    }
}

/// Image metadata read from the header chunks, without decoding pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImageInfo {
    pub form: IffForm,
    pub width: u32,
    pub height: u32,
    /// Bitplanes for BMHD forms, summed element bits for DEEP.
    pub bits_per_pixel: u16,
    /// Compression identifier as stored in the file.
    pub compression: u16,
    /// BMHD masking (not present for DEEP).
    pub masking: Option<Masking>,
    /// Transparent colour index when masking says one is used.
    pub transparent_color: Option<u16>,
}

impl ImageInfo {
    /// Probe an IFF image's header chunks.
    pub fn from_bytes(data: &[u8]) -> Result<Self, IffError> {
        let form = IffForm::detect(data).ok_or(IffError::UnrecognizedFormat)?;
        match form {
            IffForm::Ilbm | IffForm::Pbm | IffForm::Acbm => crate::ilbm::probe(data),
            IffForm::Deep | IffForm::Tvpp => crate::deep::probe(data),
            IffForm::Rgbn | IffForm::Rgb8 => crate::rgbn::probe(data),
        }
    }
}
