use alloc::string::String;
use enough::StopReason;

/// Errors from IFF decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IffError {
    #[error("unrecognized FORM signature or form type")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl IffError {
    /// Whether a row loop may stop on this error and keep the rows it has.
    ///
    /// Only running out of bytes is recovered into a partial image.
    /// Cancellation and header errors propagate.
    pub(crate) fn is_recoverable(&self) -> bool {
        matches!(self, IffError::UnexpectedEof)
    }
}

impl From<StopReason> for IffError {
    fn from(r: StopReason) -> Self {
        IffError::Cancelled(r)
    }
}
