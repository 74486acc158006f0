//! FORM container plumbing shared by every variant.

pub(crate) mod bmhd;
pub(crate) mod chunk;
pub(crate) mod cursor;
pub(crate) mod rle;

use cursor::Cursor;

use crate::error::IffError;
use crate::info::IffForm;

/// Check the `FORM` envelope and return the form type, with the cursor
/// on the first chunk. Form types outside `accept` are rejected.
pub(crate) fn open_form<'a>(
    data: &'a [u8],
    accept: &[IffForm],
) -> Result<(IffForm, Cursor<'a>), IffError> {
    let mut cursor = Cursor::new(data);
    let signature: [u8; 4] = cursor.read_array()?;
    if &signature != b"FORM" {
        return Err(IffError::UnrecognizedFormat);
    }
    let form_len = cursor.read_u32_be()?;
    let tag: [u8; 4] = cursor.read_array()?;
    let form = IffForm::from_tag(tag)
        .filter(|f| accept.contains(f))
        .ok_or(IffError::UnrecognizedFormat)?;

    if form_len as usize > data.len() - 8 {
        log::debug!(
            "{form:?}: FORM declares {form_len} bytes, only {} present",
            data.len() - 8
        );
    }
    Ok((form, cursor))
}

/// Apply the partial-result policy at the end of a row loop.
///
/// Running out of input mid-image keeps the rows decoded so far and is
/// reported only through the log and `DecodeOutput::is_complete`. Anything
/// else propagates.
pub(crate) fn settle(
    result: Result<(), IffError>,
    form: IffForm,
    rows_done: u32,
    height: u32,
) -> Result<(), IffError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_recoverable() => {
            log::warn!("{form:?}: {e}; keeping {rows_done} of {height} rows");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
