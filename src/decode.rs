use alloc::vec::Vec;

use enough::Stop;
#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::IffError;
use crate::info::IffForm;
use crate::limits::Limits;

/// Decoded image: RGBA8, row-major, `width * height * 4` bytes.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub form: IffForm,
    rows_decoded: u32,
}

impl DecodeOutput {
    pub(crate) fn new(pixels: Vec<u8>, width: u32, height: u32, form: IffForm, rows: u32) -> Self {
        Self {
            pixels,
            width,
            height,
            form,
            rows_decoded: rows,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Rows fully decoded from the body. Rows past this point are zero.
    pub fn rows_decoded(&self) -> u32 {
        self.rows_decoded
    }

    /// Whether every row was decoded. Truncated or damaged bodies still
    /// produce output; this is how to tell.
    pub fn is_complete(&self) -> bool {
        self.rows_decoded >= self.height
    }

    /// Reinterpret pixel data as RGBA pixels.
    #[cfg(feature = "rgb")]
    pub fn as_rgba(&self) -> &[rgb::RGBA8] {
        self.pixels.as_pixels()
    }

    /// Zero-copy view as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::RGBA8> {
        imgref::ImgRef::new(self.as_rgba(), self.width as usize, self.height as usize)
    }

    /// Convert to an owned [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        imgref::ImgVec::new(
            self.as_rgba().to_vec(),
            self.width as usize,
            self.height as usize,
        )
    }
}

/// Decode request builder. Detects the form from the `FORM` header.
///
/// ```no_run
/// use zeniff::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your IFF bytes
/// let limits = Limits {
///     max_pixels: Some(64_000_000),
///     ..Default::default()
/// };
/// let image = DecodeRequest::new(data)
///     .with_limits(&limits)
///     .with_opacity(false)
///     .decode(Unstoppable)?;
/// println!("{}x{} {:?}", image.width, image.height, image.form);
/// # Ok::<(), zeniff::IffError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    want_opacity: bool,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            want_opacity: true,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Whether DEEP alpha elements are kept. When `false` (or for forms
    /// without alpha) every pixel is opaque.
    pub fn with_opacity(mut self, want_opacity: bool) -> Self {
        self.want_opacity = want_opacity;
        self
    }

    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, IffError> {
        let form = IffForm::detect(self.data).ok_or(IffError::UnrecognizedFormat)?;
        match form {
            IffForm::Ilbm | IffForm::Pbm | IffForm::Acbm => {
                crate::ilbm::decode(self.data, self.limits, &stop)
            }
            IffForm::Deep | IffForm::Tvpp => {
                crate::deep::decode(self.data, self.want_opacity, self.limits, &stop)
            }
            IffForm::Rgbn | IffForm::Rgb8 => crate::rgbn::decode(self.data, self.limits, &stop),
        }
    }
}
